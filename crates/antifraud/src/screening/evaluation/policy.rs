use rust_decimal::Decimal;

use super::super::domain::{DecisionResult, TransactionRecord};
use super::config::{CombinationPolicy, RuleConfig};
use super::rules::{normal_confidence, Rule, Signal, NORMAL_REASON};

const BLOCKED_PREFIX: &str = "Transação bloqueada por suspeita de fraude";
const ALERTS_PREFIX: &str = "Transação aprovada com alertas";

pub(crate) fn decide_outcome(
    record: &TransactionRecord,
    config: &RuleConfig,
    rules: &[Rule],
    signals: &[Signal],
) -> DecisionResult {
    match config.policy {
        CombinationPolicy::FirstMatch => first_match(record, config, rules),
        CombinationPolicy::WeightedSum { cutoff } => weighted_sum(record, config, signals, cutoff),
    }
}

fn first_match(record: &TransactionRecord, config: &RuleConfig, rules: &[Rule]) -> DecisionResult {
    match rules.iter().find(|rule| rule.holds(record, config)) {
        Some(rule) => DecisionResult {
            is_fraud: true,
            confidence: rule.confidence,
            processed_amount: record.amount(),
            reason: rule.reason.to_string(),
            triggered_rules: vec![rule.id],
        },
        None => normal(record),
    }
}

fn weighted_sum(
    record: &TransactionRecord,
    config: &RuleConfig,
    signals: &[Signal],
    cutoff: Decimal,
) -> DecisionResult {
    let held: Vec<&Signal> = signals
        .iter()
        .filter(|signal| signal.holds(record, config))
        .collect();

    if held.is_empty() {
        return normal(record);
    }

    let score = held
        .iter()
        .map(|signal| signal.weight)
        .sum::<Decimal>()
        .min(Decimal::ONE);
    let reasons = held
        .iter()
        .map(|signal| signal.reason)
        .collect::<Vec<_>>()
        .join("; ");
    let triggered_rules = held.iter().map(|signal| signal.id).collect();

    if score >= cutoff {
        DecisionResult {
            is_fraud: true,
            confidence: score,
            processed_amount: record.amount(),
            reason: format!("{BLOCKED_PREFIX}: {reasons}"),
            triggered_rules,
        }
    } else {
        DecisionResult {
            is_fraud: false,
            confidence: Decimal::ONE - score,
            processed_amount: record.amount(),
            reason: format!("{ALERTS_PREFIX}: {reasons}"),
            triggered_rules,
        }
    }
}

fn normal(record: &TransactionRecord) -> DecisionResult {
    DecisionResult {
        is_fraud: false,
        confidence: normal_confidence(),
        processed_amount: record.amount(),
        reason: NORMAL_REASON.to_string(),
        triggered_rules: Vec::new(),
    }
}
