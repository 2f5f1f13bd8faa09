use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{
    AnalysisResult, FraudLevel, RecommendedAction, ReturnContext, ReturnSubmission,
};
use super::repository::{
    AlertError, AlertPublisher, RepositoryError, ReturnAlert, ReturnId, ReturnRecord,
    ReturnRepository, ReturnStats, ReturnStatus,
};
use super::scoring::{ScoringEngine, ScoringError};

pub const DEFAULT_BRAND_ID: &str = "brand-urbanstyle";

static RETURN_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_return_id() -> ReturnId {
    let id = RETURN_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ReturnId(format!("ret-{id:06}"))
}

/// Service composing the scoring engine, repository, and alert hooks.
pub struct ReturnsService<R, A> {
    repository: Arc<R>,
    alerts: Arc<A>,
    engine: Arc<ScoringEngine>,
}

impl<R, A> ReturnsService<R, A>
where
    R: ReturnRepository + 'static,
    A: AlertPublisher + 'static,
{
    pub fn new(repository: Arc<R>, alerts: Arc<A>, engine: ScoringEngine) -> Self {
        Self {
            repository,
            alerts,
            engine: Arc::new(engine),
        }
    }

    /// Score a submission without storing it.
    pub async fn analyze(
        &self,
        submission: &ReturnSubmission,
    ) -> Result<AnalysisResult, ReturnsServiceError> {
        let context = Self::context_for(submission)?;
        let analysis = self.engine.evaluate_with_latency(&context).await?;
        Ok(analysis)
    }

    /// Score and store a new return, then notify the seller when warranted.
    pub async fn submit(
        &self,
        submission: ReturnSubmission,
    ) -> Result<ReturnRecord, ReturnsServiceError> {
        let context = Self::context_for(&submission)?;
        let analysis = self.engine.evaluate_with_latency(&context).await?;

        let record = ReturnRecord {
            id: next_return_id(),
            order_id: submission.order_id.unwrap_or_default(),
            brand_id: submission
                .brand_id
                .filter(|brand| !brand.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BRAND_ID.to_string()),
            context,
            image_url: submission.image_url,
            is_video: submission.is_video,
            status: ReturnStatus::Pending,
            analysis,
            created_at: Utc::now(),
        };

        let stored = self.repository.insert(record)?;
        info!(
            return_id = %stored.id.0,
            fraud_score = stored.analysis.fraud_score,
            action = stored.analysis.recommended_action.label(),
            "return request stored"
        );

        self.publish_alerts(&stored)?;
        Ok(stored)
    }

    pub fn get(&self, id: &ReturnId) -> Result<ReturnRecord, ReturnsServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Newest first.
    pub fn list(&self, brand_id: Option<&str>) -> Result<Vec<ReturnRecord>, ReturnsServiceError> {
        let mut records = self.repository.list(brand_id)?;
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(records)
    }

    pub fn stats(&self, brand_id: Option<&str>) -> Result<ReturnStats, ReturnsServiceError> {
        let records = self.repository.list(brand_id)?;
        Ok(ReturnStats::from_records(&records))
    }

    /// Record the seller's decision on a stored return.
    pub fn update_status(
        &self,
        id: &ReturnId,
        status: ReturnStatus,
    ) -> Result<ReturnRecord, ReturnsServiceError> {
        let mut record = self.get(id)?;
        record.status = status;
        self.repository.update(record.clone())?;
        info!(return_id = %id.0, status = status.label(), "return status updated");
        Ok(record)
    }

    fn context_for(submission: &ReturnSubmission) -> Result<ReturnContext, ReturnsServiceError> {
        if let Some(field) = submission.missing_field() {
            return Err(ReturnsServiceError::MissingField(field));
        }
        submission
            .to_context(Utc::now())
            .ok_or(ReturnsServiceError::MissingField("return_reason_category"))
    }

    fn publish_alerts(&self, record: &ReturnRecord) -> Result<(), ReturnsServiceError> {
        let analysis = &record.analysis;

        if analysis.fraud_level == FraudLevel::High {
            warn!(
                return_id = %record.id.0,
                fraud_score = analysis.fraud_score,
                "high-risk return flagged"
            );
            let mut details = BTreeMap::new();
            details.insert("fraud_score".to_string(), analysis.fraud_score.to_string());
            details.insert(
                "recommended_action".to_string(),
                analysis.recommended_action.label().to_string(),
            );
            details.insert("customer".to_string(), record.context.customer_id.clone());
            self.alerts.publish(ReturnAlert {
                template: "high_risk_return".to_string(),
                return_id: record.id.clone(),
                details,
            })?;
        }

        if analysis.recommended_action == RecommendedAction::SuggestExchange {
            if let Some(suggestion) = &analysis.exchange_suggestion {
                let mut details = BTreeMap::new();
                details.insert("title".to_string(), suggestion.title.clone());
                details.insert("savings".to_string(), format!("{:.0}", suggestion.savings));
                self.alerts.publish(ReturnAlert {
                    template: "exchange_offered".to_string(),
                    return_id: record.id.clone(),
                    details,
                })?;
            }
        }

        Ok(())
    }
}

/// Error raised by the returns service.
#[derive(Debug, thiserror::Error)]
pub enum ReturnsServiceError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Alert(#[from] AlertError),
}
