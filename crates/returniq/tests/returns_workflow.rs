//! End-to-end return intake through the public service facade and HTTP router.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use returniq::returns::{
        AlertError, AlertPublisher, RepositoryError, ReturnAlert, ReturnId, ReturnRecord,
        ReturnRepository, ReturnsService, ScoringCatalog, ScoringConfig, ScoringEngine,
    };

    #[derive(Default)]
    pub(super) struct InMemoryRepository {
        records: Mutex<HashMap<ReturnId, ReturnRecord>>,
    }

    impl ReturnRepository for InMemoryRepository {
        fn insert(&self, record: ReturnRecord) -> Result<ReturnRecord, RepositoryError> {
            let mut guard = self.records.lock().expect("lock");
            if guard.contains_key(&record.id) {
                return Err(RepositoryError::Conflict);
            }
            guard.insert(record.id.clone(), record.clone());
            Ok(record)
        }

        fn update(&self, record: ReturnRecord) -> Result<(), RepositoryError> {
            let mut guard = self.records.lock().expect("lock");
            match guard.get_mut(&record.id) {
                Some(existing) => {
                    *existing = record;
                    Ok(())
                }
                None => Err(RepositoryError::NotFound),
            }
        }

        fn fetch(&self, id: &ReturnId) -> Result<Option<ReturnRecord>, RepositoryError> {
            Ok(self.records.lock().expect("lock").get(id).cloned())
        }

        fn list(&self, brand_id: Option<&str>) -> Result<Vec<ReturnRecord>, RepositoryError> {
            let guard = self.records.lock().expect("lock");
            Ok(guard
                .values()
                .filter(|record| brand_id.map_or(true, |brand| record.brand_id == brand))
                .cloned()
                .collect())
        }
    }

    #[derive(Default)]
    pub(super) struct RecordingAlerts {
        pub(super) sent: Mutex<Vec<ReturnAlert>>,
    }

    impl AlertPublisher for RecordingAlerts {
        fn publish(&self, alert: ReturnAlert) -> Result<(), AlertError> {
            self.sent.lock().expect("lock").push(alert);
            Ok(())
        }
    }

    pub(super) fn engine() -> ScoringEngine {
        ScoringEngine::new(
            ScoringConfig {
                jitter: false,
                seed: Some(11),
                simulated_latency: None,
            },
            ScoringCatalog::demo(),
        )
    }

    pub(super) fn service() -> (
        Arc<ReturnsService<InMemoryRepository, RecordingAlerts>>,
        Arc<RecordingAlerts>,
    ) {
        let alerts = Arc::new(RecordingAlerts::default());
        let service = ReturnsService::new(
            Arc::new(InMemoryRepository::default()),
            Arc::clone(&alerts),
            engine(),
        );
        (Arc::new(service), alerts)
    }
}

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, TimeZone, Utc};
use returniq::returns::scoring::{SeededRandom, SequenceRandom};
use returniq::returns::{
    returns_router, DamageClassification, FraudLevel, RecommendedAction, ReturnContext,
    ReturnReasonCategory,
};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

fn post(uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request")
}

#[test]
fn engine_verdicts_cover_the_three_resolutions() {
    let engine = common::engine();
    let now = Utc
        .with_ymd_and_hms(2025, 11, 20, 9, 30, 0)
        .single()
        .expect("valid timestamp");

    let genuine = ReturnContext {
        reason: ReturnReasonCategory::Damaged,
        reason_text: "Box was crushed and the lamp inside is broken, photo attached.".to_string(),
        product_price: 2999.0,
        order_date: now - Duration::days(6),
        has_image: true,
        customer_id: "tom@example.com".to_string(),
        product_name: "Ceramic Desk Lamp".to_string(),
    };
    let verdict = engine
        .evaluate_with(&genuine, now, &mut SequenceRandom::constant(0.5))
        .expect("evaluates");
    assert_eq!(verdict.damage_classification, DamageClassification::Damaged);
    assert_eq!(verdict.fraud_level, FraudLevel::Low);
    assert_eq!(verdict.recommended_action, RecommendedAction::ApproveRefund);

    let fit = ReturnContext {
        reason: ReturnReasonCategory::TooLarge,
        reason_text: "The shoes run a full size large for me.".to_string(),
        product_price: 8999.0,
        order_date: now - Duration::days(9),
        has_image: false,
        customer_id: "lisa@example.com".to_string(),
        product_name: "Running Shoes Pro Max".to_string(),
    };
    let verdict = engine
        .evaluate_with(&fit, now, &mut SeededRandom::new(3))
        .expect("evaluates");
    assert_eq!(verdict.recommended_action, RecommendedAction::SuggestExchange);
    let suggestion = verdict.exchange_suggestion.expect("exchange offered");
    assert_eq!(
        suggestion.title,
        "Size Replacement: Running Shoes Pro Max (different size)"
    );

    let abusive = ReturnContext {
        reason: ReturnReasonCategory::ChangedMind,
        reason_text: "WORST purchase ever, this is a SCAM, give me my money back now!!!"
            .to_string(),
        product_price: 18999.0,
        order_date: now - Duration::hours(6),
        has_image: false,
        customer_id: "mike@example.com".to_string(),
        product_name: "Designer Sunglasses".to_string(),
    };
    let verdict = engine
        .evaluate_with(&abusive, now, &mut SeededRandom::new(3))
        .expect("evaluates");
    assert_eq!(verdict.fraud_score, 100);
    assert_eq!(verdict.recommended_action, RecommendedAction::Reject);
    assert_eq!(verdict.refund_loss_prevented, 18999.0);
    assert!(verdict
        .reasoning
        .ends_with("💰 Potential refund loss prevented: ₹18999"));
}

#[tokio::test]
async fn storefront_submission_flows_to_seller_review() {
    let (service, alerts) = common::service();
    let app = returns_router(service);

    let (status, created) = send(
        app.clone(),
        post(
            "/api/v1/returns",
            json!({
                "order_id": "ORD-7781",
                "customer_email": "nina@example.com",
                "product_name": "Organic Cotton T-Shirt",
                "product_price": 1499,
                "return_reason": "Ordered a medium but it is much too small across the chest.",
                "return_reason_category": "too_small",
                "order_date": (Utc::now() - Duration::days(12)).to_rfc3339(),
                "brand_id": "brand-threads",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["analysis"]["recommended_action"], "Suggest Exchange");
    assert_eq!(created["analysis"]["past_return_count"], 3);
    let id = created["id"].as_str().expect("id").to_string();

    let (status, listed) = send(
        app.clone(),
        Request::builder()
            .uri("/api/v1/returns?brand_id=brand-threads")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["returns"][0]["id"], id.as_str());
    assert_eq!(listed["stats"]["pending"], 1);
    assert_eq!(listed["stats"]["suggest_exchange"], 1);

    let (status, updated) = send(
        app.clone(),
        Request::builder()
            .method("PATCH")
            .uri(format!("/api/v1/returns/{id}"))
            .header("content-type", "application/json")
            .body(Body::from(json!({ "status": "exchanged" }).to_string()))
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "exchanged");

    let (status, fetched) = send(
        app,
        Request::builder()
            .uri(format!("/api/v1/returns/{id}"))
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["status"], "exchanged");

    let sent = alerts.sent.lock().expect("lock");
    assert!(sent
        .iter()
        .any(|alert| alert.template == "exchange_offered" && alert.return_id.0 == id));
}

#[tokio::test]
async fn analyze_endpoint_previews_without_storing() {
    let (service, alerts) = common::service();
    let app = returns_router(service);

    let (status, analysis) = send(
        app.clone(),
        post(
            "/api/v1/returns/analyze",
            json!({
                "order_id": "ORD-9001",
                "customer_email": "rachel@example.com",
                "product_name": "Smart Fitness Watch",
                "product_price": 15999,
                "return_reason": "I want a refund immediately!! Product is totally fake. Will contact lawyer.",
                "return_reason_category": "changed_mind",
                "order_date": (Utc::now() - Duration::days(10)).to_rfc3339(),
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(analysis["fraud_level"], "High");
    assert_eq!(analysis["recommended_action"], "Reject");

    let (_, listed) = send(
        app,
        Request::builder()
            .uri("/api/v1/returns")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(listed["stats"]["total_returns"], 0);
    assert!(alerts.sent.lock().expect("lock").is_empty());
}
