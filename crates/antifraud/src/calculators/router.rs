use axum::{extract::rejection::JsonRejection, routing::post, Json, Router};

use super::documents::{validate_cpf, CpfRequest, CpfValidation};
use super::orders::{totals, OrderRequest, OrderTotals};
use super::shipping::{quote, ShippingQuote, ShippingRequest};
use crate::error::AppError;

/// Router builder exposing the calculator endpoints.
pub fn calculator_router() -> Router {
    Router::new()
        .route("/api/v1/shipping/quote", post(shipping_quote_endpoint))
        .route("/api/v1/orders/total", post(order_total_endpoint))
        .route("/api/v1/documents/cpf/validate", post(cpf_validate_endpoint))
}

pub(crate) async fn shipping_quote_endpoint(
    payload: Result<Json<ShippingRequest>, JsonRejection>,
) -> Result<Json<ShippingQuote>, AppError> {
    let Json(request) = payload?;
    let quote = quote(&request)?;
    tracing::info!(
        weight_kg = %request.weight_kg,
        distance_km = request.distance_km,
        cost = %quote.cost,
        "shipping_quoted"
    );
    Ok(Json(quote))
}

pub(crate) async fn order_total_endpoint(
    payload: Result<Json<OrderRequest>, JsonRejection>,
) -> Result<Json<OrderTotals>, AppError> {
    let Json(order) = payload?;
    let totals = totals(&order)?;
    tracing::info!(
        items = order.items.len(),
        subtotal = %totals.subtotal,
        discount = %totals.discount,
        total = %totals.total,
        "order_totaled"
    );
    Ok(Json(totals))
}

pub(crate) async fn cpf_validate_endpoint(
    payload: Result<Json<CpfRequest>, JsonRejection>,
) -> Result<Json<CpfValidation>, AppError> {
    let Json(request) = payload?;
    let validation = validate_cpf(&request.cpf);
    tracing::info!(valid = validation.valid, "cpf_validated");
    Ok(Json(validation))
}
