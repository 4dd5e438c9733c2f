use std::sync::{Arc, Mutex};

use axum::response::Response;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::screening::domain::{
    DecisionResult, TransactionRecord, TransactionRequest, ValidationError,
};
use crate::screening::evaluation::RuleConfig;
use crate::screening::service::FraudScreeningService;
use crate::screening::sink::{DecisionSink, SinkError};
use crate::screening::screening_router;

/// Daytime purchase that trips none of the rules.
pub(super) fn normal_request() -> TransactionRequest {
    TransactionRequest {
        amount: Decimal::new(500, 0),
        hour_of_day: 14,
        distance_from_last_purchase_km: Decimal::new(10, 0),
        transactions_today: 2,
        account_age_days: 100,
    }
}

pub(super) fn high_value_request() -> TransactionRequest {
    TransactionRequest {
        amount: Decimal::new(15_000, 0),
        hour_of_day: 14,
        distance_from_last_purchase_km: Decimal::new(50, 0),
        transactions_today: 3,
        account_age_days: 100,
    }
}

pub(super) fn night_volume_request() -> TransactionRequest {
    TransactionRequest {
        amount: Decimal::new(500, 0),
        hour_of_day: 3,
        distance_from_last_purchase_km: Decimal::new(10, 0),
        transactions_today: 6,
        account_age_days: 100,
    }
}

pub(super) fn distant_new_account_request() -> TransactionRequest {
    TransactionRequest {
        amount: Decimal::new(200, 0),
        hour_of_day: 14,
        distance_from_last_purchase_km: Decimal::new(850, 0),
        transactions_today: 1,
        account_age_days: 15,
    }
}

pub(super) fn record(request: TransactionRequest) -> TransactionRecord {
    TransactionRecord::try_from(request).expect("valid transaction")
}

pub(super) fn rule_config() -> RuleConfig {
    RuleConfig::default()
}

pub(super) fn build_service() -> (FraudScreeningService<MemorySink>, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::default());
    let service = FraudScreeningService::new(rule_config(), sink.clone());
    (service, sink)
}

pub(super) fn screening_router_with_service(
    service: FraudScreeningService<MemorySink>,
) -> axum::Router {
    screening_router(Arc::new(service))
}

#[derive(Debug, Clone, PartialEq)]
pub(super) enum SinkEvent {
    Decision {
        amount: Decimal,
        decision: DecisionResult,
    },
    Rejection(ValidationError),
}

#[derive(Default, Clone)]
pub(super) struct MemorySink {
    events: Arc<Mutex<Vec<SinkEvent>>>,
}

impl MemorySink {
    pub(super) fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().expect("sink mutex poisoned").clone()
    }
}

impl DecisionSink for MemorySink {
    fn record(
        &self,
        transaction: &TransactionRecord,
        decision: &DecisionResult,
    ) -> Result<(), SinkError> {
        self.events
            .lock()
            .expect("sink mutex poisoned")
            .push(SinkEvent::Decision {
                amount: transaction.amount(),
                decision: decision.clone(),
            });
        Ok(())
    }

    fn rejected(&self, error: &ValidationError) -> Result<(), SinkError> {
        self.events
            .lock()
            .expect("sink mutex poisoned")
            .push(SinkEvent::Rejection(error.clone()));
        Ok(())
    }
}

pub(super) struct UnavailableSink;

impl DecisionSink for UnavailableSink {
    fn record(
        &self,
        _transaction: &TransactionRecord,
        _decision: &DecisionResult,
    ) -> Result<(), SinkError> {
        Err(SinkError::Unavailable("log shipper offline".to_string()))
    }

    fn rejected(&self, _error: &ValidationError) -> Result<(), SinkError> {
        Err(SinkError::Unavailable("log shipper offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
