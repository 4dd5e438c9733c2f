use std::sync::Arc;

use tracing::warn;

use super::domain::{DecisionResult, TransactionRecord, TransactionRequest, ValidationError};
use super::evaluation::{RuleConfig, RuleEvaluator};
use super::sink::DecisionSink;

/// Service composing validation, the rule evaluator, and the decision sink.
pub struct FraudScreeningService<S> {
    evaluator: Arc<RuleEvaluator>,
    sink: Arc<S>,
}

impl<S> FraudScreeningService<S>
where
    S: DecisionSink + 'static,
{
    pub fn new(config: RuleConfig, sink: Arc<S>) -> Self {
        Self {
            evaluator: Arc::new(RuleEvaluator::new(config)),
            sink,
        }
    }

    pub fn config(&self) -> &RuleConfig {
        self.evaluator.config()
    }

    /// Validate a raw request and screen it. Rejections never reach the evaluator.
    pub fn screen(&self, request: TransactionRequest) -> Result<DecisionResult, ValidationError> {
        let record = match TransactionRecord::try_from(request) {
            Ok(record) => record,
            Err(error) => {
                if let Err(sink_error) = self.sink.rejected(&error) {
                    warn!(error = %sink_error, "decision sink failed to record rejection");
                }
                return Err(error);
            }
        };

        Ok(self.screen_record(&record))
    }

    /// Screen an already validated record.
    pub fn screen_record(&self, record: &TransactionRecord) -> DecisionResult {
        let decision = self.evaluator.evaluate(record);

        if let Err(sink_error) = self.sink.record(record, &decision) {
            warn!(error = %sink_error, "decision sink failed to record outcome");
        }

        decision
    }
}
