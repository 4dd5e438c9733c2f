use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const MAX_HOUR_OF_DAY: i64 = 23;

/// Transaction payload exactly as submitted, before any domain checks.
///
/// Counts are signed so that negative input can be parsed and rejected with a
/// precise message instead of a generic deserialization failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub amount: Decimal,
    pub hour_of_day: i64,
    pub distance_from_last_purchase_km: Decimal,
    pub transactions_today: i64,
    pub account_age_days: i64,
}

/// Validated transaction. Every field is within its domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    amount: Decimal,
    hour_of_day: u8,
    distance_from_last_purchase_km: Decimal,
    transactions_today: u32,
    account_age_days: u32,
}

impl TransactionRecord {
    pub fn new(
        amount: Decimal,
        hour_of_day: i64,
        distance_from_last_purchase_km: Decimal,
        transactions_today: i64,
        account_age_days: i64,
    ) -> Result<Self, ValidationError> {
        if amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount(amount));
        }

        if !(0..=MAX_HOUR_OF_DAY).contains(&hour_of_day) {
            return Err(ValidationError::HourOutOfRange(hour_of_day));
        }

        if distance_from_last_purchase_km < Decimal::ZERO {
            return Err(ValidationError::NegativeDistance(
                distance_from_last_purchase_km,
            ));
        }

        let transactions_today = checked_count("transactionsToday", transactions_today)?;
        let account_age_days = checked_count("accountAgeDays", account_age_days)?;

        Ok(Self {
            amount,
            hour_of_day: hour_of_day as u8,
            distance_from_last_purchase_km,
            transactions_today,
            account_age_days,
        })
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn hour_of_day(&self) -> u8 {
        self.hour_of_day
    }

    pub fn distance_from_last_purchase_km(&self) -> Decimal {
        self.distance_from_last_purchase_km
    }

    pub fn transactions_today(&self) -> u32 {
        self.transactions_today
    }

    pub fn account_age_days(&self) -> u32 {
        self.account_age_days
    }
}

impl TryFrom<TransactionRequest> for TransactionRecord {
    type Error = ValidationError;

    fn try_from(request: TransactionRequest) -> Result<Self, Self::Error> {
        Self::new(
            request.amount,
            request.hour_of_day,
            request.distance_from_last_purchase_km,
            request.transactions_today,
            request.account_age_days,
        )
    }
}

fn checked_count(field: &'static str, value: i64) -> Result<u32, ValidationError> {
    if value < 0 {
        return Err(ValidationError::NegativeCount { field, value });
    }

    u32::try_from(value).map_err(|_| ValidationError::CountOutOfRange { field, value })
}

/// Client input outside the declared domain of a transaction field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("amount must be greater than zero (found {0})")]
    NonPositiveAmount(Decimal),
    #[error("hourOfDay must be between 0 and 23 (found {0})")]
    HourOutOfRange(i64),
    #[error("distanceFromLastPurchaseKm must not be negative (found {0})")]
    NegativeDistance(Decimal),
    #[error("{field} must not be negative (found {value})")]
    NegativeCount { field: &'static str, value: i64 },
    #[error("{field} is out of range (found {value})")]
    CountOutOfRange { field: &'static str, value: i64 },
}

/// Identifiers for the fraud-indicating rules.
///
/// The first three form the first-match chain; the weighted policy scores
/// `HighValue` together with the independent signals that follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    HighValue,
    SuspiciousHourVolume,
    DistanceNewAccount,
    SuspiciousHour,
    LargeDistance,
    HighVolume,
}

impl RuleId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HighValue => "high_value",
            Self::SuspiciousHourVolume => "suspicious_hour_volume",
            Self::DistanceNewAccount => "distance_new_account",
            Self::SuspiciousHour => "suspicious_hour",
            Self::LargeDistance => "large_distance",
            Self::HighVolume => "high_volume",
        }
    }
}

/// Outcome of screening one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionResult {
    pub is_fraud: bool,
    pub confidence: Decimal,
    pub processed_amount: Decimal,
    pub reason: String,
    pub triggered_rules: Vec<RuleId>,
}

impl DecisionResult {
    pub fn summary(&self) -> String {
        let verdict = if self.is_fraud { "blocked" } else { "approved" };
        if self.triggered_rules.is_empty() {
            format!("{verdict} ({}): {}", self.confidence, self.reason)
        } else {
            let rules = self
                .triggered_rules
                .iter()
                .map(|rule| rule.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "{verdict} ({}): {} [{rules}]",
                self.confidence, self.reason
            )
        }
    }
}
