//! Return risk and resolution scoring.
//!
//! The engine runs five independent analyzers (return frequency, sentiment,
//! image condition, item value, timing), sums their deltas on top of a
//! per-reason base score and derives the recommended resolution. Every
//! simulated collaborator draws from an injected [`RandomSource`], so a fixed
//! seed or sequence reproduces the same [`AnalysisResult`].

mod catalog;
pub(crate) mod damage;
pub(crate) mod exchange;
pub(crate) mod frequency;
pub(crate) mod policy;
mod random;
mod report;
pub(crate) mod sentiment;
pub(crate) mod signals;

pub use catalog::{
    CustomerHistory, ProductAlternatives, ScoringCatalog, StaticCustomerHistory,
    StaticProductAlternatives,
};
pub use damage::{detect_mismatch, ImageClassifier, ImageEvidence, SimulatedImageClassifier};
pub use policy::base_score;
pub use random::{RandomSource, SeededRandom, SequenceRandom, ThreadRandom};
pub use sentiment::{KeywordSentimentModel, SentimentModel, SentimentReading, SentimentRule};

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{AnalysisResult, FraudLevel, ReturnContext};
use damage::assess_damage;
use exchange::suggest_exchange;
use frequency::analyze_frequency;
use report::ReportInput;
use sentiment::analyze_sentiment;
use signals::{assess_timing, assess_value};

/// Bounds of the artificial "analysis in progress" pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyWindow {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl LatencyWindow {
    pub const fn standard() -> Self {
        Self {
            min_ms: 800,
            max_ms: 1_400,
        }
    }

    pub fn sample(&self) -> Duration {
        let millis = if self.max_ms > self.min_ms {
            rand::thread_rng().gen_range(self.min_ms..self.max_ms)
        } else {
            self.min_ms
        };
        Duration::from_millis(millis)
    }
}

/// Tunables for the scoring engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Adds the ±3 score jitter and the 0–4 confidence jitter.
    pub jitter: bool,
    /// Seeds every evaluation identically when set.
    pub seed: Option<u64>,
    pub simulated_latency: Option<LatencyWindow>,
}

impl ScoringConfig {
    pub fn seeded(seed: u64) -> Self {
        Self {
            jitter: true,
            seed: Some(seed),
            simulated_latency: None,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            jitter: true,
            seed: None,
            simulated_latency: Some(LatencyWindow::standard()),
        }
    }
}

/// Rejected engine input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

impl ScoringError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

/// Stateless evaluator combining the analyzers under the decision policy.
pub struct ScoringEngine {
    config: ScoringConfig,
    catalog: ScoringCatalog,
    sentiment: Arc<dyn SentimentModel>,
    classifier: Arc<dyn ImageClassifier>,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig, catalog: ScoringCatalog) -> Self {
        Self {
            config,
            catalog,
            sentiment: Arc::new(KeywordSentimentModel::standard()),
            classifier: Arc::new(SimulatedImageClassifier),
        }
    }

    pub fn with_sentiment_model(mut self, model: Arc<dyn SentimentModel>) -> Self {
        self.sentiment = model;
        self
    }

    pub fn with_image_classifier(mut self, classifier: Arc<dyn ImageClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Evaluate against the wall clock with the configured random source.
    pub fn evaluate(&self, context: &ReturnContext) -> Result<AnalysisResult, ScoringError> {
        let now = Utc::now();
        match self.config.seed {
            Some(seed) => self.evaluate_with(context, now, &mut SeededRandom::new(seed)),
            None => self.evaluate_with(context, now, &mut ThreadRandom),
        }
    }

    /// Same as [`ScoringEngine::evaluate`], after the configured processing pause.
    pub async fn evaluate_with_latency(
        &self,
        context: &ReturnContext,
    ) -> Result<AnalysisResult, ScoringError> {
        if let Some(window) = self.config.simulated_latency {
            tokio::time::sleep(window.sample()).await;
        }
        self.evaluate(context)
    }

    pub fn evaluate_with(
        &self,
        context: &ReturnContext,
        now: DateTime<Utc>,
        rng: &mut dyn RandomSource,
    ) -> Result<AnalysisResult, ScoringError> {
        context.validate(now)?;

        let frequency = analyze_frequency(self.catalog.history.as_ref(), &context.customer_id, rng);
        let sentiment = analyze_sentiment(self.sentiment.as_ref(), &context.reason_text);
        let evidence = ImageEvidence {
            has_image: context.has_image,
            reason: context.reason,
            reason_text: &context.reason_text,
        };
        let damage = assess_damage(self.classifier.as_ref(), &evidence, rng);
        let value = assess_value(context.product_price);
        let timing = assess_timing(context.order_date, now);
        let suggestion = Some(suggest_exchange(
            self.catalog.alternatives.as_ref(),
            context.reason,
            &context.product_name,
            context.product_price,
        ));

        let (score_jitter, confidence_jitter) = if self.config.jitter {
            let score = (rng.next_f64() * 6.0 - 3.0).floor() as i32;
            let confidence = ((rng.next_f64() * 5.0).floor() as u8).min(4);
            (score, confidence)
        } else {
            (0, 0)
        };

        let raw_score = policy::base_score(context.reason)
            + frequency.risk
            + sentiment.risk
            + damage.risk
            + value.score
            + timing.score
            + score_jitter;
        let fraud_score = policy::clamp_score(raw_score);
        let fraud_level = FraudLevel::from_score(fraud_score);
        let recommended_action =
            policy::recommend_action(fraud_score, context.reason, damage.mismatch);

        let mut risk_factors = Vec::with_capacity(damage.factors.len() + 4);
        risk_factors.push(frequency.factor);
        risk_factors.push(sentiment.factor);
        risk_factors.extend(damage.factors);
        risk_factors.push(value);
        risk_factors.push(timing);

        let confidence = policy::confidence(&risk_factors, fraud_score, confidence_jitter);
        let refund_loss_prevented = policy::refund_loss_prevented(
            recommended_action,
            suggestion.as_ref(),
            context.product_price,
        );

        let reasoning = report::render(&ReportInput {
            factors: &risk_factors,
            sentiment_score: sentiment.score,
            sentiment_tags: &sentiment.tags,
            classification: damage.classification,
            mismatch: damage.mismatch,
            past_returns: frequency.count,
            suggestion: suggestion.as_ref(),
            action: recommended_action,
            level: fraud_level,
            fraud_score,
            confidence,
            refund_loss_prevented,
        });

        debug!(
            reason = %context.reason,
            fraud_score,
            fraud_level = fraud_level.label(),
            action = recommended_action.label(),
            mismatch = damage.mismatch,
            "return evaluated"
        );

        Ok(AnalysisResult {
            fraud_score,
            fraud_level,
            recommended_action,
            confidence,
            reasoning,
            damage_classification: damage.classification,
            sentiment_score: sentiment.score,
            reason_image_mismatch: damage.mismatch,
            past_return_count: frequency.count,
            exchange_suggestion: suggestion,
            refund_loss_prevented,
            risk_factors,
        })
    }
}
