use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How the rules that hold for a transaction are combined into one decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CombinationPolicy {
    /// The highest-priority rule that holds decides alone.
    #[default]
    FirstMatch,
    /// Weights of every independent signal that holds are summed; fraud once
    /// the sum reaches `cutoff`.
    WeightedSum { cutoff: Decimal },
}

impl CombinationPolicy {
    pub fn default_cutoff() -> Decimal {
        Decimal::new(5, 1)
    }

    pub fn weighted() -> Self {
        Self::WeightedSum {
            cutoff: Self::default_cutoff(),
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::FirstMatch => "first_match",
            Self::WeightedSum { .. } => "weighted_sum",
        }
    }
}

/// Thresholds for the fraud rule chain, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleConfig {
    pub high_value_threshold: Decimal,
    pub suspicious_hour_start: u8,
    pub suspicious_hour_end: u8,
    pub large_distance_threshold: Decimal,
    pub new_account_age_threshold: u32,
    pub transaction_count_threshold: u32,
    /// Daily count above which the weighted policy adds its volume signal.
    pub high_volume_threshold: u32,
    pub policy: CombinationPolicy,
}

impl RuleConfig {
    /// Half-open window `[start, end)`; wraps midnight when `start > end`.
    pub fn in_suspicious_window(&self, hour_of_day: u8) -> bool {
        let (start, end) = (self.suspicious_hour_start, self.suspicious_hour_end);
        if start <= end {
            hour_of_day >= start && hour_of_day < end
        } else {
            hour_of_day >= start || hour_of_day < end
        }
    }

    pub fn with_policy(mut self, policy: CombinationPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            high_value_threshold: Decimal::new(10_000, 0),
            suspicious_hour_start: 0,
            suspicious_hour_end: 6,
            large_distance_threshold: Decimal::new(500, 0),
            new_account_age_threshold: 30,
            transaction_count_threshold: 5,
            high_volume_threshold: 10,
            policy: CombinationPolicy::FirstMatch,
        }
    }
}
