use antifraud::config::{AllowedOrigins, AppConfig, CorsConfig};
use antifraud::screening::{
    DecisionResult, DecisionSink, SinkError, TransactionRecord, ValidationError,
};
use axum::http::{header, Method};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tower_http::cors::{AllowOrigin, CorsLayer};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) config: Arc<AppConfig>,
}

pub(crate) fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = match &config.allowed_origins {
        AllowedOrigins::Any => AllowOrigin::any(),
        AllowedOrigins::List(origins) => AllowOrigin::list(origins.iter().cloned()),
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Outcome tally kept by the CLI demo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DecisionTally {
    pub(crate) approved: usize,
    pub(crate) blocked: usize,
    pub(crate) rejected: usize,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryDecisionSink {
    tally: Arc<Mutex<DecisionTally>>,
}

impl InMemoryDecisionSink {
    pub(crate) fn tally(&self) -> DecisionTally {
        match self.tally.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DecisionSink for InMemoryDecisionSink {
    fn record(
        &self,
        _transaction: &TransactionRecord,
        decision: &DecisionResult,
    ) -> Result<(), SinkError> {
        let mut guard = self
            .tally
            .lock()
            .map_err(|_| SinkError::Unavailable("tally mutex poisoned".to_string()))?;
        if decision.is_fraud {
            guard.blocked += 1;
        } else {
            guard.approved += 1;
        }
        Ok(())
    }

    fn rejected(&self, _error: &ValidationError) -> Result<(), SinkError> {
        let mut guard = self
            .tally
            .lock()
            .map_err(|_| SinkError::Unavailable("tally mutex poisoned".to_string()))?;
        guard.rejected += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use antifraud::screening::{FraudScreeningService, RuleConfig, TransactionRequest};
    use axum::body::Body;
    use axum::http::{HeaderValue, Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use rust_decimal::Decimal;
    use tower::ServiceExt;

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/ping")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn cors_layer_allows_listed_origins_only() {
        let config = CorsConfig {
            allowed_origins: AllowedOrigins::List(vec![HeaderValue::from_static(
                "https://dashboard.example",
            )]),
        };
        let router = Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(cors_layer(&config));

        let allowed = router
            .clone()
            .oneshot(preflight("https://dashboard.example"))
            .await
            .unwrap();
        assert_eq!(allowed.status(), StatusCode::OK);
        assert_eq!(
            allowed.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("https://dashboard.example"))
        );

        let denied = router.oneshot(preflight("https://evil.example")).await.unwrap();
        assert!(denied
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn cors_layer_accepts_any_origin_by_default() {
        let config = CorsConfig {
            allowed_origins: AllowedOrigins::Any,
        };
        let router = Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(cors_layer(&config));

        let response = router
            .oneshot(preflight("http://localhost:3000"))
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("*"))
        );
    }

    #[test]
    fn in_memory_sink_tallies_outcomes() {
        let sink = Arc::new(InMemoryDecisionSink::default());
        let service = FraudScreeningService::new(RuleConfig::default(), sink.clone());
        let request = |amount: i64| TransactionRequest {
            amount: Decimal::from(amount),
            hour_of_day: 12,
            distance_from_last_purchase_km: Decimal::ONE,
            transactions_today: 1,
            account_age_days: 200,
        };

        service.screen(request(20_000)).expect("blocked");
        service.screen(request(20)).expect("approved");
        service.screen(request(0)).expect_err("rejected");

        assert_eq!(
            sink.tally(),
            DecisionTally {
                approved: 1,
                blocked: 1,
                rejected: 1,
            }
        );
    }
}
