use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::returns::domain::{ReturnContext, ReturnReasonCategory, ReturnSubmission};
use crate::returns::repository::{
    AlertError, AlertPublisher, RepositoryError, ReturnAlert, ReturnId, ReturnRecord,
    ReturnRepository,
};
use crate::returns::scoring::{ScoringCatalog, ScoringConfig, ScoringEngine};
use crate::returns::{returns_router, ReturnsService};

pub(super) const NEUTRAL_FIT_TEXT: &str =
    "The jacket fits too tight across the shoulders, I would like a bigger one.";
pub(super) const HOSTILE_TEXT: &str =
    "I want a refund immediately!! Product is totally fake. Will contact lawyer.";
pub(super) const CRACKED_TEXT: &str = "The screen arrived cracked in the box, photo attached.";
pub(super) const PLAIN_FAULT_TEXT: &str = "The speaker stopped working after a single afternoon.";

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 20, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn context(
    reason: ReturnReasonCategory,
    reason_text: &str,
    product_price: f64,
    days_ago: i64,
    has_image: bool,
    customer_id: &str,
) -> ReturnContext {
    ReturnContext::new(
        reason,
        reason_text,
        product_price,
        now() - Duration::days(days_ago),
        has_image,
        customer_id,
        "Premium Leather Jacket",
    )
}

/// Too-small jacket return from a first-time customer, ordered ten days ago.
pub(super) fn size_context() -> ReturnContext {
    context(
        ReturnReasonCategory::TooSmall,
        NEUTRAL_FIT_TEXT,
        5999.0,
        10,
        false,
        "emma@example.com",
    )
}

pub(super) fn hostile_context() -> ReturnContext {
    context(
        ReturnReasonCategory::ChangedMind,
        HOSTILE_TEXT,
        15999.0,
        10,
        false,
        "rachel@example.com",
    )
}

pub(super) fn cracked_context() -> ReturnContext {
    context(
        ReturnReasonCategory::Damaged,
        CRACKED_TEXT,
        7999.0,
        10,
        true,
        "sarah@example.com",
    )
}

pub(super) fn steady_config() -> ScoringConfig {
    ScoringConfig {
        jitter: false,
        seed: Some(1),
        simulated_latency: None,
    }
}

pub(super) fn steady_engine() -> ScoringEngine {
    ScoringEngine::new(steady_config(), ScoringCatalog::demo())
}

pub(super) fn submission() -> ReturnSubmission {
    ReturnSubmission {
        order_id: Some("ORD-1042".to_string()),
        customer_email: Some("emma@example.com".to_string()),
        product_name: Some("Premium Leather Jacket".to_string()),
        product_price: Some(5999.0),
        return_reason: Some(NEUTRAL_FIT_TEXT.to_string()),
        return_reason_category: Some(ReturnReasonCategory::TooSmall),
        order_date: Some(Utc::now() - Duration::days(10)),
        image_url: None,
        brand_id: Some("brand-urbanstyle".to_string()),
        is_video: false,
    }
}

pub(super) fn hostile_submission() -> ReturnSubmission {
    ReturnSubmission {
        order_id: Some("ORD-2210".to_string()),
        customer_email: Some("rachel@example.com".to_string()),
        product_name: Some("Smart Fitness Watch".to_string()),
        product_price: Some(15999.0),
        return_reason: Some(HOSTILE_TEXT.to_string()),
        return_reason_category: Some(ReturnReasonCategory::ChangedMind),
        order_date: Some(Utc::now() - Duration::days(10)),
        image_url: None,
        brand_id: Some("brand-techwave".to_string()),
        is_video: false,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<HashMap<ReturnId, ReturnRecord>>>,
}

impl ReturnRepository for MemoryRepository {
    fn insert(&self, record: ReturnRecord) -> Result<ReturnRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ReturnRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &ReturnId) -> Result<Option<ReturnRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self, brand_id: Option<&str>) -> Result<Vec<ReturnRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| brand_id.map_or(true, |brand| record.brand_id == brand))
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAlerts {
    events: Arc<Mutex<Vec<ReturnAlert>>>,
}

impl MemoryAlerts {
    pub(super) fn events(&self) -> Vec<ReturnAlert> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

impl AlertPublisher for MemoryAlerts {
    fn publish(&self, alert: ReturnAlert) -> Result<(), AlertError> {
        self.events
            .lock()
            .expect("alert mutex poisoned")
            .push(alert);
        Ok(())
    }
}

pub(super) struct ConflictRepository;

impl ReturnRepository for ConflictRepository {
    fn insert(&self, _record: ReturnRecord) -> Result<ReturnRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: ReturnRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &ReturnId) -> Result<Option<ReturnRecord>, RepositoryError> {
        Ok(None)
    }

    fn list(&self, _brand_id: Option<&str>) -> Result<Vec<ReturnRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl ReturnRepository for UnavailableRepository {
    fn insert(&self, _record: ReturnRecord) -> Result<ReturnRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: ReturnRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ReturnId) -> Result<Option<ReturnRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _brand_id: Option<&str>) -> Result<Vec<ReturnRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    ReturnsService<MemoryRepository, MemoryAlerts>,
    MemoryRepository,
    MemoryAlerts,
) {
    let repository = MemoryRepository::default();
    let alerts = MemoryAlerts::default();
    let service = ReturnsService::new(
        Arc::new(repository.clone()),
        Arc::new(alerts.clone()),
        steady_engine(),
    );
    (service, repository, alerts)
}

pub(super) fn router_with_service(
    service: ReturnsService<MemoryRepository, MemoryAlerts>,
) -> axum::Router {
    returns_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
