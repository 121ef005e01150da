//! String-id model registry.
//!
//! Resolves ids of the form:
//!
//! | id | model |
//! |----|-------|
//! | `provider:model` | [`OpenAiCompatibleModel`] on `[providers.<provider>]` |
//! | `moa:mediator\|m1\|m2` | [`DebateModel`] over the resolved ensemble |
//! | `cepo:<id>` | [`BestOfNModel`] over the resolved model |
//! | `fallback:a\|b` | [`FallbackModel`] trying each in order |
//! | `mock:<text>` | [`EchoModel`] answering `<text>` |
//!
//! `moa:` and `fallback:` both split on `|`, so neither nests inside the
//! other; `cepo:` nests inside either.
//!
//! Every leaf model is wrapped with [`RunContext::metered`], so calls made
//! inside a debate or a best-of-N pipeline are accounted individually.

use super::fallback::FallbackModel;
use super::mock::EchoModel;
use super::openai_compat::OpenAiCompatibleModel;
use crate::config::{FileBestOfNConfig, FileConfig, FileDebateConfig, FileProvidersConfig, FileTiersConfig};
use ensemble_application::{
    BestOfNModel, DebateError, DebateModel, GatewayError, LanguageModel, ModelTiers, RunBestOfNUseCase,
    RunContext, RunDebateUseCase,
};
use ensemble_domain::{DebateSettings, DomainError, EnsembleSpec, ModelId, ModelTier};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("{0}")]
    Invalid(#[from] DomainError),

    #[error("Model id '{0}' has no provider prefix (expected provider:model)")]
    MissingProvider(String),

    #[error("Unknown provider '{provider}' in model id '{id}'")]
    UnknownProvider { provider: String, id: String },

    #[error("Debate rounds are not set: pass --rounds or set [debate] rounds")]
    MissingRounds,

    #[error("Debate ensemble is not set: pass --ensemble or set [debate] ensemble")]
    MissingEnsemble,

    #[error("No model configured for tier '{0}' (set [tiers])")]
    MissingTier(ModelTier),

    #[error(transparent)]
    Debate(#[from] DebateError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Builds models from string ids using the loaded configuration.
pub struct ModelRegistry {
    providers: FileProvidersConfig,
    tiers: FileTiersConfig,
    debate: FileDebateConfig,
    best_of_n: FileBestOfNConfig,
    client: reqwest::Client,
}

impl ModelRegistry {
    pub fn new(config: &FileConfig) -> Self {
        Self {
            providers: config.providers.clone(),
            tiers: config.tiers.clone(),
            debate: config.debate.clone(),
            best_of_n: config.best_of_n.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// Resolve a model id to a callable model bound to `ctx`.
    pub fn resolve(&self, id: &str, ctx: &RunContext) -> Result<Arc<dyn LanguageModel>, RegistryError> {
        let id = ModelId::new(id)?;
        let rest = id.name();
        debug!("Resolving model {}", id);

        match id.provider() {
            Some("moa") => {
                let engine = self.debate_engine(rest, ctx)?;
                Ok(Arc::new(DebateModel::new(engine, self.debate_settings()?)))
            }
            Some("cepo") => Ok(Arc::new(BestOfNModel::new(self.best_of_n_engine(rest, ctx)?))),
            Some("fallback") => {
                let models = rest
                    .split('|')
                    .map(|inner| self.resolve(inner, ctx))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Arc::new(FallbackModel::new(models)?))
            }
            Some("mock") => Ok(ctx.metered(Arc::new(EchoModel::new(rest)))),
            Some(provider) => {
                let config = self
                    .providers
                    .get(provider)
                    .ok_or_else(|| RegistryError::UnknownProvider {
                        provider: provider.to_string(),
                        id: id.to_string(),
                    })?;
                let model = OpenAiCompatibleModel::new(provider, rest, config, self.client.clone());
                Ok(ctx.metered(Arc::new(model)))
            }
            None => Err(RegistryError::MissingProvider(id.to_string())),
        }
    }

    /// Debate engine over `spec`, or over `[debate] ensemble` when `None`.
    pub fn debate_engine_for(
        &self,
        spec: Option<&str>,
        ctx: &RunContext,
    ) -> Result<RunDebateUseCase, RegistryError> {
        let spec = spec
            .or(self.debate.ensemble.as_deref())
            .ok_or(RegistryError::MissingEnsemble)?;
        self.debate_engine(spec, ctx)
    }

    fn debate_engine(&self, spec: &str, ctx: &RunContext) -> Result<RunDebateUseCase, RegistryError> {
        let spec = EnsembleSpec::parse(spec)?;
        let mediator = self.resolve(spec.mediator.as_str(), ctx)?;
        let members = spec
            .members
            .iter()
            .map(|m| self.resolve(m.as_str(), ctx))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RunDebateUseCase::new(mediator, members)?)
    }

    /// Settings for debates built by this registry.
    pub fn debate_settings(&self) -> Result<DebateSettings, RegistryError> {
        let settings = self
            .debate
            .settings()
            .ok_or(RegistryError::MissingRounds)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Best-of-N engine over `model`, or over `[best_of_n] model` when `None`.
    pub fn best_of_n_engine_for(
        &self,
        model: Option<&str>,
        ctx: &RunContext,
    ) -> Result<RunBestOfNUseCase, RegistryError> {
        match model.or(self.best_of_n.model.as_deref()) {
            Some(model) => self.best_of_n_engine(model, ctx),
            None => {
                let model = self.tier(ModelTier::Medium, ctx)?;
                let config = self.best_of_n.to_config();
                config.validate()?;
                Ok(RunBestOfNUseCase::new(model, config))
            }
        }
    }

    fn best_of_n_engine(&self, model: &str, ctx: &RunContext) -> Result<RunBestOfNUseCase, RegistryError> {
        let inner = self.resolve(model, ctx)?;
        let config = self.best_of_n.to_config();
        config.validate()?;
        Ok(RunBestOfNUseCase::new(inner, config))
    }

    /// Model for `tier`, falling back to the nearest configured tier.
    pub fn tier(&self, tier: ModelTier, ctx: &RunContext) -> Result<Arc<dyn LanguageModel>, RegistryError> {
        let id = self.tiers.resolve(tier).ok_or(RegistryError::MissingTier(tier))?;
        self.resolve(id, ctx)
    }

    /// All three tiers, for [`RunContext::with_tiers`].
    pub fn tiers(&self, ctx: &RunContext) -> Result<ModelTiers, RegistryError> {
        Ok(ModelTiers::new(
            self.tier(ModelTier::Easy, ctx)?,
            self.tier(ModelTier::Medium, ctx)?,
            self.tier(ModelTier::Hard, ctx)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ensemble_domain::{GenerationOptions, Message};

    fn config() -> FileConfig {
        let mut config = FileConfig::default();
        config.debate.rounds = Some(2);
        config.tiers.medium = Some("mock:medium".into());
        config
    }

    // ==================== Leaves ====================

    #[test]
    fn test_resolve_provider_model() {
        let registry = ModelRegistry::new(&config());
        let ctx = RunContext::new("run");
        let model = registry.resolve("openai:gpt-4o", &ctx).unwrap();
        assert_eq!(model.id(), "openai:gpt-4o");
    }

    #[test]
    fn test_unknown_provider() {
        let registry = ModelRegistry::new(&config());
        let ctx = RunContext::new("run");
        let err = registry.resolve("acme:big", &ctx).err().unwrap();
        assert!(matches!(err, RegistryError::UnknownProvider { .. }));
    }

    #[test]
    fn test_missing_provider_prefix() {
        let registry = ModelRegistry::new(&config());
        let ctx = RunContext::new("run");
        let err = registry.resolve("gpt-4o", &ctx).err().unwrap();
        assert!(matches!(err, RegistryError::MissingProvider(_)));
    }

    #[tokio::test]
    async fn test_mock_calls_are_metered() {
        let registry = ModelRegistry::new(&config());
        let ctx = RunContext::new("run");
        let model = registry.resolve("mock:hello", &ctx).unwrap();

        let text = model
            .generate_text(&[Message::user("hi")], &GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(text, "hello");
        assert_eq!(ctx.usage().calls, 1);
    }

    // ==================== Composites ====================

    #[tokio::test]
    async fn test_moa_counts_every_member_call() {
        let registry = ModelRegistry::new(&config());
        let ctx = RunContext::new("run");
        let model = registry.resolve("moa:mock:merged|mock:a|mock:b", &ctx).unwrap();
        assert_eq!(model.id(), "moa:mock:merged|mock:a|mock:b");

        let text = model
            .generate_text(&[Message::user("question")], &GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(text, "merged");
        // 2 members x 2 rounds + 1 mediation
        assert_eq!(ctx.usage().calls, 5);
    }

    #[test]
    fn test_moa_without_rounds() {
        let mut config = config();
        config.debate.rounds = None;
        let registry = ModelRegistry::new(&config);
        let ctx = RunContext::new("run");
        let err = registry.resolve("moa:mock:m|mock:a", &ctx).err().unwrap();
        assert!(matches!(err, RegistryError::MissingRounds));

        config.debate.rounds = Some(1);
        let registry = ModelRegistry::new(&config);
        assert!(registry.resolve("moa:mock:m|mock:a", &ctx).is_ok());
    }

    #[test]
    fn test_moa_malformed_spec() {
        let registry = ModelRegistry::new(&config());
        let ctx = RunContext::new("run");
        let err = registry.resolve("moa:mock:m||mock:a", &ctx).err().unwrap();
        assert!(matches!(err, RegistryError::Invalid(DomainError::InvalidEnsembleSpec { .. })));
    }

    #[test]
    fn test_cepo_and_fallback_ids() {
        let registry = ModelRegistry::new(&config());
        let ctx = RunContext::new("run");
        assert_eq!(registry.resolve("cepo:mock:x", &ctx).unwrap().id(), "cepo:mock:x");
        assert_eq!(
            registry.resolve("fallback:mock:a|mock:b", &ctx).unwrap().id(),
            "fallback:mock:a|mock:b"
        );
    }

    #[test]
    fn test_debate_engine_requires_ensemble() {
        let registry = ModelRegistry::new(&config());
        let ctx = RunContext::new("run");
        let err = registry.debate_engine_for(None, &ctx).err().unwrap();
        assert!(matches!(err, RegistryError::MissingEnsemble));
        assert!(registry.debate_engine_for(Some("mock:m|mock:a"), &ctx).is_ok());
    }

    // ==================== Tiers ====================

    #[test]
    fn test_tiers_fall_back_to_nearest() {
        let registry = ModelRegistry::new(&config());
        let ctx = RunContext::new("run");
        let tiers = registry.tiers(&ctx).unwrap();
        assert_eq!(tiers.get(ModelTier::Hard).id(), "mock:medium");
    }

    #[test]
    fn test_no_tiers_configured() {
        let registry = ModelRegistry::new(&FileConfig::default());
        let ctx = RunContext::new("run");
        let err = registry.tier(ModelTier::Easy, &ctx).err().unwrap();
        assert!(matches!(err, RegistryError::MissingTier(ModelTier::Easy)));
    }
}
