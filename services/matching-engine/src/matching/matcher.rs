//! Top-level matcher
//!
//! Owns the symbol to order book map and runs the cross loop. Books are
//! created lazily on first use; the map is concurrent so first-touch
//! creation from two workers converges on one instance, and each book
//! carries its own reader/writer lock. Matching for one symbol is strictly
//! serial under that lock; different symbols match in parallel.

use std::collections::BTreeSet;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use types::errors::EngineError;
use types::ids::{OrderId, Symbol};
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderStatus, OrderType, Side};
use types::trade::Trade;

use crate::book::Orderbook;
use crate::events::{MatchResult, OrderUpdate, OrderbookDelta};
use crate::matching::crossing;
use crate::time;

/// The matching engine entry point
///
/// `submit` crosses an incoming order against the opposite side and rests
/// any limit remainder; `cancel` removes a resting order. Both report the
/// price points they touched as an incremental delta.
pub struct Matcher {
    books: DashMap<Symbol, Arc<RwLock<Orderbook>>>,
}

impl Matcher {
    /// Create a matcher with no books
    pub fn new() -> Self {
        Self {
            books: DashMap::new(),
        }
    }

    /// Resolve or create the book for a symbol
    fn book(&self, symbol: &Symbol) -> Arc<RwLock<Orderbook>> {
        self.books
            .entry(symbol.clone())
            .or_insert_with(|| Arc::new(RwLock::new(Orderbook::new(symbol.clone()))))
            .clone()
    }

    /// Submit an order and cross it against resting liquidity
    ///
    /// Trades execute at the maker's resting price, best level first and
    /// FIFO within a level. An unfilled limit remainder rests on its own
    /// side; a market remainder is discarded. The returned delta carries
    /// the post-match volume at every touched price, `"0"` where the level
    /// is gone.
    pub fn submit(&self, mut taker: Order) -> Result<MatchResult, EngineError> {
        let book = self.book(&taker.symbol);
        let mut ob = book.write();

        if ob.contains(&taker.id) {
            return Err(EngineError::DuplicateOrder {
                order_id: taker.id.to_string(),
            });
        }

        let mut trades: Vec<Trade> = Vec::new();
        let mut order_updates: Vec<OrderUpdate> = Vec::new();
        let mut touched_bids: BTreeSet<Price> = BTreeSet::new();
        let mut touched_asks: BTreeSet<Price> = BTreeSet::new();

        // Market orders carry no limit and cross any maker price
        let limit = taker.price;

        while !taker.is_filled() {
            let best = match taker.side {
                Side::Buy => ob.asks().best_price(),
                Side::Sell => ob.bids().best_price(),
            };
            let maker_price = match best {
                Some(price) => price,
                None => break,
            };
            if !crossing::crosses(taker.side, limit, maker_price) {
                break;
            }

            let front = match taker.side {
                Side::Buy => ob.asks().best().and_then(|l| l.front()),
                Side::Sell => ob.bids().best().and_then(|l| l.front()),
            };
            let maker = front.cloned().expect("non-empty best level has a front order");

            let trade_qty = taker.remaining_quantity.min(maker.remaining_quantity);
            trades.push(Trade::new(
                &maker,
                &taker,
                maker_price,
                trade_qty,
                time::unix_millis(),
            ));

            taker.fill(trade_qty);

            if trade_qty == maker.remaining_quantity {
                // Maker fully consumed: leaves the book, sequence advances
                let removed = ob.remove_order(&maker.id);
                assert!(removed.is_some(), "maker {} vanished during match", maker.id);
                order_updates.push(OrderUpdate {
                    order_id: maker.id.clone(),
                    remaining_qty: Quantity::zero(),
                    status: OrderStatus::Filled,
                });
            } else {
                let level = match taker.side {
                    Side::Buy => ob.asks_mut().level_mut(maker_price),
                    Side::Sell => ob.bids_mut().level_mut(maker_price),
                }
                .expect("crossed level present until its last order fills");
                if let Some(front) = level.front_mut() {
                    front.fill(trade_qty);
                }
                level.reduce_volume(trade_qty);
                order_updates.push(OrderUpdate {
                    order_id: maker.id.clone(),
                    remaining_qty: maker.remaining_quantity - trade_qty,
                    status: OrderStatus::Partial,
                });
            }

            match taker.side {
                Side::Buy => touched_asks.insert(maker_price),
                Side::Sell => touched_bids.insert(maker_price),
            };
        }

        let taker_status = if taker.is_filled() {
            OrderStatus::Filled
        } else {
            match taker.order_type {
                OrderType::Limit => {
                    let price = limit.ok_or(EngineError::MissingPrice)?;
                    match taker.side {
                        Side::Buy => touched_bids.insert(price),
                        Side::Sell => touched_asks.insert(price),
                    };
                    ob.add_order(taker.clone())?;
                    if trades.is_empty() {
                        OrderStatus::New
                    } else {
                        OrderStatus::Partial
                    }
                }
                OrderType::Market => {
                    if trades.is_empty() {
                        OrderStatus::Cancelled
                    } else {
                        OrderStatus::Partial
                    }
                }
            }
        };

        order_updates.push(OrderUpdate {
            order_id: taker.id.clone(),
            remaining_qty: taker.remaining_quantity,
            status: taker_status,
        });

        let delta = build_delta(&ob, &touched_bids, &touched_asks);

        Ok(MatchResult {
            trades,
            order_updates,
            delta,
        })
    }

    /// Cancel a resting order
    ///
    /// Returns the removed order and a single-point delta for its price,
    /// or None if the symbol or order is unknown (silent no-op).
    pub fn cancel(&self, symbol: &Symbol, order_id: &OrderId) -> Option<(Order, OrderbookDelta)> {
        let book = self.books.get(symbol)?.clone();
        let mut ob = book.write();

        let order = ob.remove_order(order_id)?;
        let price = order.price.expect("resting order has a price");

        let volume = ob.level_volume(order.side, price);
        let point = [price.to_string(), volume_string(volume)];
        let (bids, asks) = match order.side {
            Side::Buy => (vec![point], Vec::new()),
            Side::Sell => (Vec::new(), vec![point]),
        };

        let delta = OrderbookDelta {
            symbol: ob.symbol().to_string(),
            sequence: ob.sequence(),
            bids,
            asks,
            timestamp: time::unix_millis(),
        };
        Some((order, delta))
    }

    /// Handle to a symbol's book, if one exists
    pub fn orderbook(&self, symbol: &Symbol) -> Option<Arc<RwLock<Orderbook>>> {
        self.books.get(symbol).map(|entry| entry.clone())
    }

    /// Top levels of both sides of a symbol's book
    pub fn depth(
        &self,
        symbol: &Symbol,
        limit: usize,
    ) -> Option<(Vec<(Price, Quantity)>, Vec<(Price, Quantity)>)> {
        let book = self.books.get(symbol)?.clone();
        let ob = book.read();
        Some(ob.depth(limit))
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Read the post-match volume at every touched price
///
/// Bids are emitted best first (descending), asks ascending. A price whose
/// level no longer exists reports volume `"0"`.
fn build_delta(
    ob: &Orderbook,
    touched_bids: &BTreeSet<Price>,
    touched_asks: &BTreeSet<Price>,
) -> OrderbookDelta {
    let bids = touched_bids
        .iter()
        .rev()
        .map(|price| {
            [
                price.to_string(),
                volume_string(ob.level_volume(Side::Buy, *price)),
            ]
        })
        .collect();
    let asks = touched_asks
        .iter()
        .map(|price| {
            [
                price.to_string(),
                volume_string(ob.level_volume(Side::Sell, *price)),
            ]
        })
        .collect();

    OrderbookDelta {
        symbol: ob.symbol().to_string(),
        sequence: ob.sequence(),
        bids,
        asks,
        timestamp: time::unix_millis(),
    }
}

fn volume_string(volume: Option<Quantity>) -> String {
    match volume {
        Some(quantity) => quantity.to_string(),
        None => "0".to_string(),
    }
}
