//! Transaction screening: validation, the fraud rule chain, and its HTTP surface.
//!
//! The evaluator is a pure function over a validated [`TransactionRecord`] and an
//! immutable [`RuleConfig`]. Logging is delegated to a [`DecisionSink`] owned by the
//! [`FraudScreeningService`], so the evaluator can be exercised without capturing logs.

pub mod domain;
pub mod evaluation;
pub mod router;
pub mod service;
pub mod sink;

#[cfg(test)]
mod tests;

pub use domain::{DecisionResult, RuleId, TransactionRecord, TransactionRequest, ValidationError};
pub use evaluation::{evaluate, CombinationPolicy, RuleConfig, RuleEvaluator};
pub use router::screening_router;
pub use service::FraudScreeningService;
pub use sink::{DecisionSink, SinkError, TracingDecisionSink};
