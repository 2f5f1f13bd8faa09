//! Return intake, risk scoring, and seller review.

pub mod domain;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AnalysisResult, DamageClassification, ExchangeKind, ExchangeSuggestion, FraudLevel,
    RecommendedAction, ReturnContext, ReturnReasonCategory, ReturnSubmission, RiskCategory,
    RiskFactor, Severity,
};
pub use repository::{
    AlertError, AlertPublisher, RepositoryError, ReturnAlert, ReturnId, ReturnRecord,
    ReturnRepository, ReturnStats, ReturnStatus,
};
pub use router::returns_router;
pub use scoring::{ScoringCatalog, ScoringConfig, ScoringEngine, ScoringError};
pub use service::{ReturnsService, ReturnsServiceError, DEFAULT_BRAND_ID};
