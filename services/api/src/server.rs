use crate::cli::ServeArgs;
use crate::infra::{cors_layer, AppState};
use crate::routes::with_service_routes;
use antifraud::config::AppConfig;
use antifraud::error::AppError;
use antifraud::screening::{FraudScreeningService, TracingDecisionSink};
use antifraud::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
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

    let addr = config.server.socket_addr()?;
    let config = Arc::new(config);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        config: config.clone(),
    };

    let screening_service = Arc::new(FraudScreeningService::new(
        config.rules.clone(),
        Arc::new(TracingDecisionSink),
    ));

    let app = with_service_routes(screening_service)
        .layer(Extension(app_state))
        .layer(cors_layer(&config.cors))
        .layer(prometheus_layer);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        environment = config.environment.label(),
        policy = config.rules.policy.label(),
        cors_origins = ?config.cors.origin_labels(),
        %addr,
        "antifraud service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
