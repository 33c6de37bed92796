//! Trade execution types

use crate::ids::{OrderId, Symbol, TradeId, UserId};
use crate::numeric::{Price, Quantity};
use crate::order::{Order, Side};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An executed match between a resting maker order and an incoming taker
///
/// Trades always settle at the maker's resting price; any difference from
/// the taker's limit is price improvement for the taker. Fees are emitted
/// as zero and enriched downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub symbol: Symbol,

    pub price: Price,
    pub quantity: Quantity,
    /// Exact decimal product price × quantity
    pub quote_qty: Decimal,

    pub maker_order_id: OrderId,
    pub taker_order_id: OrderId,
    pub maker_user_id: UserId,
    pub taker_user_id: UserId,

    /// True iff the resting side of this trade was a bid
    pub is_buyer_maker: bool,

    pub maker_fee: Decimal,
    pub taker_fee: Decimal,

    pub executed_at: i64, // Unix millis
}

impl Trade {
    /// Create a trade from the matched maker/taker pair
    pub fn new(
        maker: &Order,
        taker: &Order,
        price: Price,
        quantity: Quantity,
        executed_at: i64,
    ) -> Self {
        Self {
            id: TradeId::new(),
            symbol: taker.symbol.clone(),
            price,
            quantity,
            quote_qty: price * quantity,
            maker_order_id: maker.id.clone(),
            taker_order_id: taker.id.clone(),
            maker_user_id: maker.user_id.clone(),
            taker_user_id: taker.user_id.clone(),
            is_buyer_maker: maker.side == Side::Buy,
            maker_fee: Decimal::ZERO,
            taker_fee: Decimal::ZERO,
            executed_at,
        }
    }
}
