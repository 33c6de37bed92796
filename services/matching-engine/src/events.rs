//! Match result and incremental update types

use serde::{Deserialize, Serialize};
use types::ids::OrderId;
use types::numeric::Quantity;
use types::order::OrderStatus;
use types::trade::Trade;

/// State change for one order touched by a match or cancel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    pub order_id: OrderId,
    pub remaining_qty: Quantity,
    pub status: OrderStatus,
}

/// Incremental book update: every price point touched by one command
///
/// Each entry is `[price, new_volume]` as decimal strings. Volume `"0"`
/// means the level was removed; consumers apply entries as absolute sets,
/// in strict `sequence` order per symbol. Bids are listed best first
/// (descending), asks ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderbookDelta {
    pub symbol: String,
    pub sequence: u64,
    pub bids: Vec<[String; 2]>,
    pub asks: Vec<[String; 2]>,
    pub timestamp: i64,
}

impl OrderbookDelta {
    /// Whether the delta touches no price points at all
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}

/// Everything produced by a single submit
///
/// Trades are in execution order. Order updates carry one entry per maker
/// fill, terminated by the taker's own update.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub trades: Vec<Trade>,
    pub order_updates: Vec<OrderUpdate>,
    pub delta: OrderbookDelta,
}
