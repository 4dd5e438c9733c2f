use tracing::{info, warn};

use super::domain::{DecisionResult, TransactionRecord, ValidationError};

/// Observer for screening outcomes (structured logs, audit trails, test doubles).
pub trait DecisionSink: Send + Sync {
    fn record(
        &self,
        transaction: &TransactionRecord,
        decision: &DecisionResult,
    ) -> Result<(), SinkError>;

    fn rejected(&self, error: &ValidationError) -> Result<(), SinkError>;
}

/// Decision sink failure.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("decision sink unavailable: {0}")]
    Unavailable(String),
}

/// Emits one structured `tracing` event per screened transaction.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDecisionSink;

impl DecisionSink for TracingDecisionSink {
    fn record(
        &self,
        transaction: &TransactionRecord,
        decision: &DecisionResult,
    ) -> Result<(), SinkError> {
        let rules = decision
            .triggered_rules
            .iter()
            .map(|rule| rule.as_str())
            .collect::<Vec<_>>()
            .join(",");

        if decision.is_fraud {
            warn!(
                amount = %transaction.amount(),
                hour_of_day = transaction.hour_of_day(),
                confidence = %decision.confidence,
                rules = %rules,
                reason = %decision.reason,
                action = "blocked",
                "fraud_detected"
            );
        } else {
            info!(
                amount = %transaction.amount(),
                hour_of_day = transaction.hour_of_day(),
                confidence = %decision.confidence,
                rules = %rules,
                action = "approved",
                "transaction_approved"
            );
        }

        Ok(())
    }

    fn rejected(&self, error: &ValidationError) -> Result<(), SinkError> {
        info!(error = %error, "validation_failed");
        Ok(())
    }
}
