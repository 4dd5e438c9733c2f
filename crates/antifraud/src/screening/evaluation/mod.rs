mod config;
mod policy;
mod rules;

pub use config::{CombinationPolicy, RuleConfig};

use super::domain::{DecisionResult, TransactionRecord};
use policy::decide_outcome;

/// Apply the rule chain to a validated transaction.
///
/// Pure and total: no I/O, no logging, and the same inputs always produce the
/// same result.
pub fn evaluate(record: &TransactionRecord, config: &RuleConfig) -> DecisionResult {
    decide_outcome(record, config, &rules::chain(), &rules::signals())
}

/// Stateless evaluator bound to one immutable rule configuration.
#[derive(Debug, Clone)]
pub struct RuleEvaluator {
    config: RuleConfig,
}

impl RuleEvaluator {
    pub fn new(config: RuleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    pub fn evaluate(&self, record: &TransactionRecord) -> DecisionResult {
        evaluate(record, &self.config)
    }
}
