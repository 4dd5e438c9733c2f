use crate::infra::AppState;
use antifraud::calculators::calculator_router;
use antifraud::screening::{screening_router, DecisionSink, FraudScreeningService};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_service_routes<S>(service: Arc<FraudScreeningService<S>>) -> axum::Router
where
    S: DecisionSink + 'static,
{
    screening_router(service)
        .merge(calculator_router())
        .route("/", axum::routing::get(root_endpoint))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/config", axum::routing::get(config_endpoint))
}

pub(crate) async fn root_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    Json(json!({
        "name": state.config.app.name,
        "version": state.config.app.version,
        "environment": state.config.environment.label(),
        "status": "online",
    }))
}

pub(crate) async fn healthcheck(Extension(state): Extension<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "name": state.config.app.name,
        "version": state.config.app.version,
        "environment": state.config.environment.label(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Active rule thresholds and CORS origins, for operators checking a deployment.
pub(crate) async fn config_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    Json(json!({
        "environment": state.config.environment.label(),
        "rules": state.config.rules,
        "policy": state.config.rules.policy.label(),
        "corsOrigins": state.config.cors.origin_labels(),
    }))
}
