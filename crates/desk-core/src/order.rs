//! Order types and the sell-order payload.

use crate::decimal::{Price, Qty};
use crate::error::{CoreError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Side of a contract. The daemon spells these capitalized on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Returns the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "Buy"),
            Self::Sell => write!(f, "Sell"),
        }
    }
}

/// Daemon-assigned order identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Create a fresh identifier (tests and local construction).
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The maker's currently outstanding sell order, as pushed on the `order`
/// channel. Replaced wholesale on every event; `None` on the wire means no
/// order is outstanding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub trading_pair: String,
    /// The maker's side (sell for this desk).
    pub position: OrderSide,
    pub price: Price,
    pub min_quantity: Qty,
    pub max_quantity: Qty,
    pub leverage: u8,
    pub liquidation_price: Price,
    pub creation_timestamp: DateTime<Utc>,
}

/// Locally constructed sell-order payload.
///
/// Exists only for the duration of one submission call; nothing is
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellOrderRequest {
    pub price: Price,
    pub min_quantity: Qty,
    pub max_quantity: Qty,
}

impl SellOrderRequest {
    /// Build a payload from the three editable fields, validating the
    /// obvious local mistakes before anything goes on the wire.
    pub fn new(price: Price, min_quantity: Qty, max_quantity: Qty) -> Result<Self> {
        if !price.is_positive() {
            return Err(CoreError::InvalidPrice(format!(
                "price must be positive, got {price}"
            )));
        }
        if !min_quantity.is_positive() || !max_quantity.is_positive() {
            return Err(CoreError::InvalidQuantity(
                "quantities must be positive".to_string(),
            ));
        }
        if min_quantity > max_quantity {
            return Err(CoreError::InvalidQuantity(format!(
                "min_quantity {min_quantity} exceeds max_quantity {max_quantity}"
            )));
        }
        Ok(Self {
            price,
            min_quantity,
            max_quantity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_sell_order_request_wire_shape() {
        let req = SellOrderRequest::new(
            Price::new(dec!(42000)),
            Qty::new(dec!(100)),
            Qty::new(dec!(1000)),
        )
        .unwrap();

        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({
                "price": "42000",
                "min_quantity": "100",
                "max_quantity": "1000"
            })
        );
    }

    #[test]
    fn test_sell_order_request_rejects_inverted_bounds() {
        let err = SellOrderRequest::new(
            Price::new(dec!(42000)),
            Qty::new(dec!(1000)),
            Qty::new(dec!(100)),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidQuantity(_)));
    }

    #[test]
    fn test_sell_order_request_rejects_zero_price() {
        let err =
            SellOrderRequest::new(Price::ZERO, Qty::new(dec!(100)), Qty::new(dec!(1000)))
                .unwrap_err();
        assert!(matches!(err, CoreError::InvalidPrice(_)));
    }

    #[test]
    fn test_order_side_opposite() {
        assert_eq!(OrderSide::Buy.opposite(), OrderSide::Sell);
        assert_eq!(OrderSide::Sell.opposite(), OrderSide::Buy);
    }

    #[test]
    fn test_order_deserializes_from_daemon_shape() {
        let value = json!({
            "id": "9e6e19fd-deac-4ac3-a59a-49c1a9c4f8d6",
            "trading_pair": "BTC/USD",
            "position": "Sell",
            "price": "42000",
            "min_quantity": "100",
            "max_quantity": "1000",
            "leverage": 2,
            "liquidation_price": "21000",
            "creation_timestamp": "2024-01-01T00:00:00Z"
        });

        let order: Order = serde_json::from_value(value).unwrap();
        assert_eq!(order.position, OrderSide::Sell);
        assert_eq!(order.min_quantity, Qty::new(dec!(100)));
    }
}
