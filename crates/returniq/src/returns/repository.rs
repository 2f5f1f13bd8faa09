use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{AnalysisResult, FraudLevel, RecommendedAction, ReturnContext};

/// Identifier wrapper for stored return requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReturnId(pub String);

/// Seller-side lifecycle of a return request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnStatus {
    Pending,
    Approved,
    Rejected,
    Exchanged,
}

impl ReturnStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Exchanged => "exchanged",
        }
    }
}

impl FromStr for ReturnStatus {
    type Err = String;

    /// Only seller decisions parse; `pending` is never set by hand.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "exchanged" => Ok(Self::Exchanged),
            _ => Err(format!("invalid status '{value}'")),
        }
    }
}

/// Stored return request with its engine verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnRecord {
    pub id: ReturnId,
    pub order_id: String,
    pub brand_id: String,
    pub context: ReturnContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub is_video: bool,
    pub status: ReturnStatus,
    pub analysis: AnalysisResult,
    pub created_at: DateTime<Utc>,
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait ReturnRepository: Send + Sync {
    fn insert(&self, record: ReturnRecord) -> Result<ReturnRecord, RepositoryError>;
    fn update(&self, record: ReturnRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ReturnId) -> Result<Option<ReturnRecord>, RepositoryError>;
    /// Records for one brand, or all brands when `brand_id` is `None`.
    fn list(&self, brand_id: Option<&str>) -> Result<Vec<ReturnRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound notification hook for seller dashboards.
pub trait AlertPublisher: Send + Sync {
    fn publish(&self, alert: ReturnAlert) -> Result<(), AlertError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnAlert {
    pub template: String,
    pub return_id: ReturnId,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("alert transport unavailable: {0}")]
    Transport(String),
}

/// Dashboard roll-up over stored returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReturnStats {
    pub total_returns: usize,
    pub pending: usize,
    pub high_risk: usize,
    pub average_fraud_score: f64,
    pub approve_refund: usize,
    pub suggest_exchange: usize,
    pub reject: usize,
    pub refund_loss_prevented: f64,
}

impl ReturnStats {
    pub fn from_records(records: &[ReturnRecord]) -> Self {
        let mut stats = Self {
            total_returns: records.len(),
            ..Self::default()
        };
        if records.is_empty() {
            return stats;
        }

        let mut score_total = 0u64;
        for record in records {
            let analysis = &record.analysis;
            score_total += u64::from(analysis.fraud_score);
            stats.refund_loss_prevented += analysis.refund_loss_prevented;
            if record.status == ReturnStatus::Pending {
                stats.pending += 1;
            }
            if analysis.fraud_level == FraudLevel::High {
                stats.high_risk += 1;
            }
            match analysis.recommended_action {
                RecommendedAction::ApproveRefund => stats.approve_refund += 1,
                RecommendedAction::SuggestExchange => stats.suggest_exchange += 1,
                RecommendedAction::Reject => stats.reject += 1,
            }
        }

        let average = score_total as f64 / records.len() as f64;
        stats.average_fraud_score = (average * 10.0).round() / 10.0;
        stats
    }
}
