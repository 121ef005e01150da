//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for the diagnostic log and the conversation logs.
    /// Unset means stderr only.
    pub dir: Option<PathBuf>,
    /// Write one `<run_id>.conversation.jsonl` per run into `dir`.
    pub conversation_log: bool,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            conversation_log: true,
        }
    }
}

impl FileLoggingConfig {
    /// `dir` with a leading `~` expanded.
    pub fn resolved_dir(&self) -> Option<PathBuf> {
        self.dir.as_ref().map(|dir| expand_home(dir))
    }
}

fn expand_home(path: &PathBuf) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.clone()),
        Err(_) => path.clone(),
    }
}
