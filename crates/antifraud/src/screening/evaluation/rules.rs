use rust_decimal::Decimal;

use super::super::domain::{RuleId, TransactionRecord};
use super::config::RuleConfig;

pub(crate) const NORMAL_REASON: &str = "Transação dentro dos padrões normais";

pub(crate) fn normal_confidence() -> Decimal {
    Decimal::new(90, 2)
}

type Predicate = fn(&TransactionRecord, &RuleConfig) -> bool;

/// One link of the first-match chain.
pub(crate) struct Rule {
    pub id: RuleId,
    pub confidence: Decimal,
    pub reason: &'static str,
    predicate: Predicate,
}

impl Rule {
    pub fn holds(&self, record: &TransactionRecord, config: &RuleConfig) -> bool {
        (self.predicate)(record, config)
    }
}

/// Independent risk signal scored by the weighted policy.
pub(crate) struct Signal {
    pub id: RuleId,
    pub weight: Decimal,
    pub reason: &'static str,
    predicate: Predicate,
}

impl Signal {
    pub fn holds(&self, record: &TransactionRecord, config: &RuleConfig) -> bool {
        (self.predicate)(record, config)
    }
}

/// Rule chain in priority order. Priority also descends by confidence.
pub(crate) fn chain() -> [Rule; 3] {
    [
        Rule {
            id: RuleId::HighValue,
            confidence: Decimal::new(95, 2),
            reason: HIGH_VALUE_REASON,
            predicate: high_value,
        },
        Rule {
            id: RuleId::SuspiciousHourVolume,
            confidence: Decimal::new(85, 2),
            reason: "Múltiplas transações em horário suspeito (madrugada)",
            predicate: suspicious_hour_volume,
        },
        Rule {
            id: RuleId::DistanceNewAccount,
            confidence: Decimal::new(80, 2),
            reason: "Distância suspeita com conta recente",
            predicate: distance_new_account,
        },
    ]
}

/// Weighted signals; the weights sum to exactly 1.
pub(crate) fn signals() -> [Signal; 4] {
    [
        Signal {
            id: RuleId::HighValue,
            weight: Decimal::new(40, 2),
            reason: HIGH_VALUE_REASON,
            predicate: high_value,
        },
        Signal {
            id: RuleId::SuspiciousHour,
            weight: Decimal::new(30, 2),
            reason: "Transação em horário suspeito (madrugada)",
            predicate: suspicious_hour,
        },
        Signal {
            id: RuleId::LargeDistance,
            weight: Decimal::new(20, 2),
            reason: "Distância grande da última compra",
            predicate: large_distance,
        },
        Signal {
            id: RuleId::HighVolume,
            weight: Decimal::new(10, 2),
            reason: "Muitas transações no dia",
            predicate: high_volume,
        },
    ]
}

const HIGH_VALUE_REASON: &str = "Valor acima do threshold";

fn high_value(record: &TransactionRecord, config: &RuleConfig) -> bool {
    record.amount() > config.high_value_threshold
}

fn suspicious_hour(record: &TransactionRecord, config: &RuleConfig) -> bool {
    config.in_suspicious_window(record.hour_of_day())
}

fn large_distance(record: &TransactionRecord, config: &RuleConfig) -> bool {
    record.distance_from_last_purchase_km() > config.large_distance_threshold
}

fn high_volume(record: &TransactionRecord, config: &RuleConfig) -> bool {
    record.transactions_today() > config.high_volume_threshold
}

fn suspicious_hour_volume(record: &TransactionRecord, config: &RuleConfig) -> bool {
    suspicious_hour(record, config)
        && record.transactions_today() > config.transaction_count_threshold
}

fn distance_new_account(record: &TransactionRecord, config: &RuleConfig) -> bool {
    large_distance(record, config)
        && record.account_age_days() < config.new_account_age_threshold
}
