//! Small arithmetic services that sit next to the screening endpoint: shipping
//! quotes, order totals, and CPF format validation.

pub mod documents;
pub mod orders;
mod router;
pub mod shipping;

pub use router::calculator_router;

use rust_decimal::{Decimal, RoundingStrategy};

/// Invalid calculator input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalculatorError {
    #[error("weightKg must be greater than zero (found {0})")]
    NonPositiveWeight(Decimal),
    #[error("distanceKm must not be negative (found {0})")]
    NegativeDistance(i64),
    #[error("order must contain at least one item")]
    EmptyOrder,
    #[error("item '{item}' must have a quantity of at least 1 (found {quantity})")]
    InvalidQuantity { item: String, quantity: i64 },
    #[error("item '{item}' must not have a negative unit price (found {price})")]
    NegativePrice { item: String, price: Decimal },
    #[error("{0} exceeds the supported decimal range")]
    AmountOverflow(&'static str),
}

pub(crate) fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
