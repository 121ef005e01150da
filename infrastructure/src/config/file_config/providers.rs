//! Provider configuration from TOML (`[providers]` section)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One OpenAI-compatible chat-completions endpoint.
///
/// The table key is the provider prefix used in model ids, so
/// `[providers.local]` serves `local:llama3`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Base URL up to (not including) `/chat/completions`.
    pub base_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Direct API key. Prefer `api_key_env`.
    pub api_key: Option<String>,
    /// Per-request timeout.
    pub timeout_seconds: u64,
    /// Output cap applied when a call does not set one.
    pub max_tokens: Option<u32>,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            timeout_seconds: 120,
            max_tokens: None,
        }
    }
}

impl FileProviderConfig {
    /// Resolve the API key: direct value first, then the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

/// All configured providers, keyed by prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileProvidersConfig(pub HashMap<String, FileProviderConfig>);

impl Default for FileProvidersConfig {
    fn default() -> Self {
        let mut providers = HashMap::new();
        providers.insert("openai".to_string(), FileProviderConfig::default());
        Self(providers)
    }
}

impl FileProvidersConfig {
    pub fn get(&self, name: &str) -> Option<&FileProviderConfig> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FileProviderConfig)> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_openai() {
        let providers = FileProvidersConfig::default();
        let openai = providers.get("openai").unwrap();
        assert_eq!(openai.base_url, "https://api.openai.com/v1");
        assert_eq!(openai.timeout_seconds, 120);
    }

    #[test]
    fn test_deserialize_custom_provider() {
        let toml_str = r#"
[local]
base_url = "http://localhost:11434/v1"
api_key = "unused"
timeout_seconds = 30
"#;
        let providers: FileProvidersConfig = toml::from_str(toml_str).unwrap();
        let local = providers.get("local").unwrap();
        assert_eq!(local.base_url, "http://localhost:11434/v1");
        assert_eq!(local.api_key_env, "OPENAI_API_KEY");
        assert_eq!(local.resolve_api_key().as_deref(), Some("unused"));
    }

    #[test]
    fn test_blank_direct_key_is_ignored() {
        let config = FileProviderConfig {
            api_key: Some("  ".into()),
            api_key_env: "ENSEMBLE_TEST_UNSET_KEY_VAR".into(),
            ..Default::default()
        };
        assert!(config.resolve_api_key().is_none());
    }
}
