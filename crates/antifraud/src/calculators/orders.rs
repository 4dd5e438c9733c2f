use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{round_money, CalculatorError};

pub const DISCOUNT_COUPON: &str = "DESC10";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub coupon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

fn discount_rate(coupon: Option<&str>) -> Decimal {
    match coupon {
        Some(code) if code == DISCOUNT_COUPON => Decimal::new(10, 2),
        _ => Decimal::ZERO,
    }
}

/// Sum line items and apply the coupon discount, if any.
pub fn totals(order: &OrderRequest) -> Result<OrderTotals, CalculatorError> {
    if order.items.is_empty() {
        return Err(CalculatorError::EmptyOrder);
    }

    let mut subtotal = Decimal::ZERO;
    for item in &order.items {
        if item.quantity < 1 {
            return Err(CalculatorError::InvalidQuantity {
                item: item.name.clone(),
                quantity: item.quantity,
            });
        }
        if item.unit_price < Decimal::ZERO {
            return Err(CalculatorError::NegativePrice {
                item: item.name.clone(),
                price: item.unit_price,
            });
        }
        subtotal = item
            .unit_price
            .checked_mul(Decimal::from(item.quantity))
            .and_then(|line| subtotal.checked_add(line))
            .ok_or(CalculatorError::AmountOverflow("order subtotal"))?;
    }

    let discount = subtotal
        .checked_mul(discount_rate(order.coupon.as_deref()))
        .ok_or(CalculatorError::AmountOverflow("order discount"))?;
    let total = subtotal
        .checked_sub(discount)
        .ok_or(CalculatorError::AmountOverflow("order total"))?;

    Ok(OrderTotals {
        subtotal: round_money(subtotal),
        discount: round_money(discount),
        total: round_money(total),
    })
}
