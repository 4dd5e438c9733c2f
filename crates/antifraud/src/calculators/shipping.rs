use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{round_money, CalculatorError};

/// Parcel description used to quote a shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingRequest {
    pub weight_kg: Decimal,
    pub distance_km: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingQuote {
    pub cost: Decimal,
}

fn rate_per_kg() -> Decimal {
    Decimal::new(10, 0)
}

fn rate_per_km() -> Decimal {
    Decimal::new(50, 2)
}

/// Flat tariff: 10.00 per kg plus 0.50 per km.
pub fn quote(request: &ShippingRequest) -> Result<ShippingQuote, CalculatorError> {
    if request.weight_kg <= Decimal::ZERO {
        return Err(CalculatorError::NonPositiveWeight(request.weight_kg));
    }
    if request.distance_km < 0 {
        return Err(CalculatorError::NegativeDistance(request.distance_km));
    }

    let cost = request
        .weight_kg
        .checked_mul(rate_per_kg())
        .zip(Decimal::from(request.distance_km).checked_mul(rate_per_km()))
        .and_then(|(weight, distance)| weight.checked_add(distance))
        .ok_or(CalculatorError::AmountOverflow("shipping cost"))?;

    Ok(ShippingQuote {
        cost: round_money(cost),
    })
}
