//! Order lifecycle types

use crate::ids::{OrderId, Symbol, UserId};
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    Buy,
    /// Sell order (ask)
    Sell,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    /// Rests at its limit price if not immediately matched
    Limit,
    /// Executes against whatever liquidity is available, never rests
    Market,
}

/// Order status reported in match results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// Resting with no fills
    New,
    /// Partially filled
    Partial,
    /// Completely filled (terminal)
    Filled,
    /// Cancelled, or a market order with no liquidity (terminal)
    Cancelled,
}

impl OrderStatus {
    /// Check if status is terminal (no further transitions possible)
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Filled | OrderStatus::Cancelled)
    }
}

/// An order as the matching engine sees it
///
/// Identity fields are immutable after construction; only
/// `remaining_quantity` changes as fills are applied. `price` is `None`
/// exactly when the order is a market order, which never rests on the book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub symbol: Symbol,
    pub side: Side,
    pub order_type: OrderType,
    pub price: Option<Price>,
    pub quantity: Quantity,
    pub remaining_quantity: Quantity,
    pub created_at: i64, // Unix millis
}

impl Order {
    /// Create a new limit order
    pub fn new_limit(
        id: OrderId,
        user_id: UserId,
        symbol: Symbol,
        side: Side,
        price: Price,
        quantity: Quantity,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            user_id,
            symbol,
            side,
            order_type: OrderType::Limit,
            price: Some(price),
            quantity,
            remaining_quantity: quantity,
            created_at,
        }
    }

    /// Create a new market order
    pub fn new_market(
        id: OrderId,
        user_id: UserId,
        symbol: Symbol,
        side: Side,
        quantity: Quantity,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            user_id,
            symbol,
            side,
            order_type: OrderType::Market,
            price: None,
            quantity,
            remaining_quantity: quantity,
            created_at,
        }
    }

    /// Check if the order is completely filled
    pub fn is_filled(&self) -> bool {
        self.remaining_quantity.is_zero()
    }

    /// Check if the order has any fills
    pub fn has_fills(&self) -> bool {
        self.remaining_quantity < self.quantity
    }

    /// Apply a fill, clamped to the remaining quantity
    ///
    /// Returns the quantity actually filled.
    pub fn fill(&mut self, quantity: Quantity) -> Quantity {
        let actual = quantity.min(self.remaining_quantity);
        self.remaining_quantity = self.remaining_quantity - actual;
        actual
    }
}
