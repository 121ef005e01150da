//! Per-run context shared by the engines.

use super::metered::MeteredModel;
use super::usage::{UsageTotals, UsageTracker};
use crate::config::PricingTable;
use crate::ports::conversation_logger::{ConversationLogger, NoConversationLogger};
use crate::ports::llm_gateway::LanguageModel;
use ensemble_domain::ModelTier;
use std::sync::Arc;

/// Models available to a run, by capability tier.
#[derive(Clone)]
pub struct ModelTiers {
    pub easy: Arc<dyn LanguageModel>,
    pub medium: Arc<dyn LanguageModel>,
    pub hard: Arc<dyn LanguageModel>,
}

impl ModelTiers {
    pub fn new(
        easy: Arc<dyn LanguageModel>,
        medium: Arc<dyn LanguageModel>,
        hard: Arc<dyn LanguageModel>,
    ) -> Self {
        Self { easy, medium, hard }
    }

    /// Same model for every tier.
    pub fn uniform(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            easy: model.clone(),
            medium: model.clone(),
            hard: model,
        }
    }

    pub fn get(&self, tier: ModelTier) -> &Arc<dyn LanguageModel> {
        match tier {
            ModelTier::Easy => &self.easy,
            ModelTier::Medium => &self.medium,
            ModelTier::Hard => &self.hard,
        }
    }
}

/// Identity, accounting and logging for one orchestration run.
///
/// Engines never see this directly: every model they are handed has been
/// wrapped by [`RunContext::metered`], which reports back here.
pub struct RunContext {
    run_id: String,
    pricing: PricingTable,
    usage: Arc<UsageTracker>,
    logger: Arc<dyn ConversationLogger>,
    tiers: Option<ModelTiers>,
}

impl RunContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            pricing: PricingTable::default(),
            usage: Arc::new(UsageTracker::new()),
            logger: Arc::new(NoConversationLogger),
            tiers: None,
        }
    }

    pub fn with_pricing(mut self, pricing: PricingTable) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_tiers(mut self, tiers: ModelTiers) -> Self {
        self.tiers = Some(tiers);
        self
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn logger(&self) -> Arc<dyn ConversationLogger> {
        self.logger.clone()
    }

    pub fn usage(&self) -> UsageTotals {
        self.usage.totals()
    }

    /// Model configured for `tier`, if tiers were set.
    pub fn tier(&self, tier: ModelTier) -> Option<Arc<dyn LanguageModel>> {
        self.tiers.as_ref().map(|t| t.get(tier).clone())
    }

    /// Wrap a model so its calls are attributed to this run.
    pub fn metered(&self, model: Arc<dyn LanguageModel>) -> Arc<dyn LanguageModel> {
        let pricing = self.pricing.for_model(model.id());
        Arc::new(MeteredModel::new(
            model,
            self.run_id.clone(),
            pricing,
            self.usage.clone(),
            self.logger.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelPricing;
    use crate::ports::llm_gateway::GatewayError;
    use async_trait::async_trait;
    use ensemble_domain::{GenerationOptions, Message};

    struct Named(&'static str);

    #[async_trait]
    impl LanguageModel for Named {
        fn id(&self) -> &str {
            self.0
        }

        async fn generate_text(
            &self,
            _messages: &[Message],
            _options: &GenerationOptions,
        ) -> Result<String, GatewayError> {
            Ok("0123456789".to_string())
        }
    }

    #[tokio::test]
    async fn test_metered_models_share_totals() {
        let ctx = RunContext::new("run")
            .with_pricing(PricingTable::new().with_model("a", ModelPricing::new(0.0, 1_000_000.0)));
        let a = ctx.metered(Arc::new(Named("a")));
        let b = ctx.metered(Arc::new(Named("b")));

        a.generate_text(&[Message::user("x")], &GenerationOptions::default())
            .await
            .unwrap();
        b.generate_text(&[Message::user("x")], &GenerationOptions::default())
            .await
            .unwrap();

        let usage = ctx.usage();
        assert_eq!(usage.calls, 2);
        assert_eq!(usage.chars_out, 20);
        // only "a" is priced
        assert!((usage.cost - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_tiers() {
        let ctx = RunContext::new("run");
        assert!(ctx.tier(ModelTier::Medium).is_none());

        let ctx = ctx.with_tiers(ModelTiers::new(
            Arc::new(Named("e")),
            Arc::new(Named("m")),
            Arc::new(Named("h")),
        ));
        assert_eq!(ctx.tier(ModelTier::Hard).unwrap().id(), "h");
        assert_eq!(ctx.tier(ModelTier::Medium).unwrap().id(), "m");
    }
}
