use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;

use super::domain::TransactionRequest;
use super::service::FraudScreeningService;
use super::sink::DecisionSink;
use crate::error::AppError;

/// Router builder exposing the transaction screening endpoint.
pub fn screening_router<S>(service: Arc<FraudScreeningService<S>>) -> Router
where
    S: DecisionSink + 'static,
{
    Router::new()
        .route("/api/v1/transactions/analyze", post(analyze_handler::<S>))
        .with_state(service)
}

pub(crate) async fn analyze_handler<S>(
    State(service): State<Arc<FraudScreeningService<S>>>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> Response
where
    S: DecisionSink + 'static,
{
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return AppError::from(rejection).into_response(),
    };

    match service.screen(request) {
        Ok(decision) => (StatusCode::OK, Json(decision)).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
    }
}
