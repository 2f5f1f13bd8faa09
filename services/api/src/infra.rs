use chrono::{DateTime, NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use returniq::returns::{
    AlertError, AlertPublisher, RepositoryError, ReturnAlert, ReturnId, ReturnRecord,
    ReturnRepository,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryReturnRepository {
    records: Arc<Mutex<HashMap<ReturnId, ReturnRecord>>>,
}

impl ReturnRepository for InMemoryReturnRepository {
    fn insert(&self, record: ReturnRecord) -> Result<ReturnRecord, RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository lock poisoned".to_string()))?;
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ReturnRecord) -> Result<(), RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository lock poisoned".to_string()))?;
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &ReturnId) -> Result<Option<ReturnRecord>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository lock poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }

    fn list(&self, brand_id: Option<&str>) -> Result<Vec<ReturnRecord>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository lock poisoned".to_string()))?;
        Ok(guard
            .values()
            .filter(|record| brand_id.map_or(true, |brand| record.brand_id == brand))
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAlertPublisher {
    events: Arc<Mutex<Vec<ReturnAlert>>>,
}

impl AlertPublisher for InMemoryAlertPublisher {
    fn publish(&self, alert: ReturnAlert) -> Result<(), AlertError> {
        info!(
            template = %alert.template,
            return_id = %alert.return_id.0,
            "seller alert queued"
        );
        let mut guard = self
            .events
            .lock()
            .map_err(|_| AlertError::Transport("alert lock poisoned".to_string()))?;
        guard.push(alert);
        Ok(())
    }
}

impl InMemoryAlertPublisher {
    #[cfg(test)]
    pub(crate) fn events(&self) -> Vec<ReturnAlert> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

/// Order dates on the command line are calendar days, read as midnight UTC.
pub(crate) fn parse_date(raw: &str) -> Result<DateTime<Utc>, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
        .and_then(|date| {
            date.and_hms_opt(0, 0, 0)
                .map(|midnight| midnight.and_utc())
                .ok_or_else(|| format!("'{raw}' has no midnight"))
        })
}
