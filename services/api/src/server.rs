use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryAlertPublisher, InMemoryReturnRepository};
use crate::routes::with_return_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use returniq::config::AppConfig;
use returniq::error::AppError;
use returniq::returns::{ReturnsService, ScoringCatalog, ScoringEngine};
use returniq::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryReturnRepository::default());
    let alerts = Arc::new(InMemoryAlertPublisher::default());
    let engine = ScoringEngine::new(config.scoring.engine_config(), ScoringCatalog::demo());
    let returns_service = Arc::new(ReturnsService::new(repository, alerts, engine));

    let app = with_return_routes(returns_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        jitter = config.scoring.jitter,
        seeded = config.scoring.seed.is_some(),
        simulated_latency = config.scoring.simulated_latency,
        "returniq scoring service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
