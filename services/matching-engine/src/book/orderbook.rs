//! Per-symbol order book aggregate
//!
//! Ties the two sides together with an order-id locator so cancels find
//! their level without scanning, and a monotonic sequence counter that
//! advances on every successful add and remove. Downstream consumers use
//! the sequence to order incremental deltas per symbol.

use std::collections::HashMap;
use types::errors::EngineError;
use types::ids::{OrderId, Symbol};
use types::numeric::{Price, Quantity};
use types::order::{Order, Side};

use super::{AskBook, BidBook};

/// The order book for a single symbol
///
/// An order id appears in `orders` iff the order rests in exactly one
/// price level of exactly one side. Market orders never enter.
#[derive(Debug)]
pub struct Orderbook {
    symbol: Symbol,
    bids: BidBook,
    asks: AskBook,
    /// Locator: where each resting order lives
    orders: HashMap<OrderId, (Side, Price)>,
    sequence: u64,
}

impl Orderbook {
    /// Create a new empty book
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            bids: BidBook::new(),
            asks: AskBook::new(),
            orders: HashMap::new(),
            sequence: 0,
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Check whether an order with this id is resting
    pub fn contains(&self, order_id: &OrderId) -> bool {
        self.orders.contains_key(order_id)
    }

    /// Rest an order on its own side
    ///
    /// Rejects market orders (no price to rest at) and ids that are
    /// already resting. Increments the sequence on success.
    pub fn add_order(&mut self, order: Order) -> Result<(), EngineError> {
        let price = order.price.ok_or(EngineError::MissingPrice)?;
        if self.orders.contains_key(&order.id) {
            return Err(EngineError::DuplicateOrder {
                order_id: order.id.to_string(),
            });
        }

        self.orders.insert(order.id.clone(), (order.side, price));
        self.sequence += 1;

        match order.side {
            Side::Buy => self.bids.add(price, order),
            Side::Sell => self.asks.add(price, order),
        }
        Ok(())
    }

    /// Remove a resting order by id
    ///
    /// Idempotent for unknown ids. Increments the sequence on success.
    pub fn remove_order(&mut self, order_id: &OrderId) -> Option<Order> {
        let (side, price) = self.orders.remove(order_id)?;

        let removed = match side {
            Side::Buy => self.bids.remove(price, order_id),
            Side::Sell => self.asks.remove(price, order_id),
        };
        assert!(
            removed.is_some(),
            "order {order_id} indexed at {side:?} {price} but missing from the level"
        );

        self.sequence += 1;
        removed
    }

    /// Look up a resting order
    pub fn get_order(&self, order_id: &OrderId) -> Option<&Order> {
        let (side, price) = self.orders.get(order_id)?;
        match side {
            Side::Buy => self.bids.level(*price)?.get(order_id),
            Side::Sell => self.asks.level(*price)?.get(order_id),
        }
    }

    /// Best bid as (price, level volume)
    pub fn best_bid(&self) -> Option<(Price, Quantity)> {
        self.bids.best().map(|l| (l.price(), l.volume()))
    }

    /// Best ask as (price, level volume)
    pub fn best_ask(&self) -> Option<(Price, Quantity)> {
        self.asks.best().map(|l| (l.price(), l.volume()))
    }

    /// Top `limit` levels of both sides, best first
    pub fn depth(&self, limit: usize) -> (Vec<(Price, Quantity)>, Vec<(Price, Quantity)>) {
        (self.bids.top_n(limit), self.asks.top_n(limit))
    }

    /// Volume resting at a price on one side, if the level exists
    pub fn level_volume(&self, side: Side, price: Price) -> Option<Quantity> {
        match side {
            Side::Buy => self.bids.volume_at(price),
            Side::Sell => self.asks.volume_at(price),
        }
    }

    /// Current sequence number
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Number of resting orders across both sides
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    pub(crate) fn bids(&self) -> &BidBook {
        &self.bids
    }

    pub(crate) fn bids_mut(&mut self) -> &mut BidBook {
        &mut self.bids
    }

    pub(crate) fn asks(&self) -> &AskBook {
        &self.asks
    }

    pub(crate) fn asks_mut(&mut self) -> &mut AskBook {
        &mut self.asks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::UserId;

    fn order(id: &str, side: Side, price: u64, qty: &str) -> Order {
        Order::new_limit(
            OrderId::new(id),
            UserId::new("u1"),
            Symbol::new("BTCUSDT"),
            side,
            Price::from_u64(price),
            Quantity::parse(qty).unwrap(),
            1_708_123_456_789,
        )
    }

    #[test]
    fn test_add_and_lookup() {
        let mut book = Orderbook::new(Symbol::new("BTCUSDT"));
        book.add_order(order("a", Side::Buy, 100, "1.0")).unwrap();

        assert!(book.contains(&OrderId::new("a")));
        let resting = book.get_order(&OrderId::new("a")).unwrap();
        assert_eq!(resting.remaining_quantity, Quantity::parse("1.0").unwrap());
        assert_eq!(book.best_bid(), Some((Price::from_u64(100), Quantity::parse("1.0").unwrap())));
    }

    #[test]
    fn test_sequence_increments_on_add_and_remove() {
        let mut book = Orderbook::new(Symbol::new("BTCUSDT"));
        assert_eq!(book.sequence(), 0);

        book.add_order(order("a", Side::Buy, 100, "1.0")).unwrap();
        assert_eq!(book.sequence(), 1);

        book.add_order(order("b", Side::Sell, 101, "1.0")).unwrap();
        assert_eq!(book.sequence(), 2);

        book.remove_order(&OrderId::new("a")).unwrap();
        assert_eq!(book.sequence(), 3);
    }

    #[test]
    fn test_remove_unknown_leaves_sequence() {
        let mut book = Orderbook::new(Symbol::new("BTCUSDT"));
        book.add_order(order("a", Side::Buy, 100, "1.0")).unwrap();

        assert!(book.remove_order(&OrderId::new("missing")).is_none());
        assert_eq!(book.sequence(), 1);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut book = Orderbook::new(Symbol::new("BTCUSDT"));
        book.add_order(order("a", Side::Buy, 100, "1.0")).unwrap();

        let err = book.add_order(order("a", Side::Buy, 99, "2.0"));
        assert_eq!(
            err,
            Err(EngineError::DuplicateOrder {
                order_id: "a".to_string()
            })
        );
        assert_eq!(book.order_count(), 1);
        assert_eq!(book.sequence(), 1);
    }

    #[test]
    fn test_market_order_cannot_rest() {
        let mut book = Orderbook::new(Symbol::new("BTCUSDT"));
        let market = Order::new_market(
            OrderId::new("m"),
            UserId::new("u1"),
            Symbol::new("BTCUSDT"),
            Side::Buy,
            Quantity::parse("1.0").unwrap(),
            1_708_123_456_789,
        );

        assert_eq!(book.add_order(market), Err(EngineError::MissingPrice));
        assert_eq!(book.sequence(), 0);
    }

    #[test]
    fn test_remove_reindexes_both_structures() {
        let mut book = Orderbook::new(Symbol::new("BTCUSDT"));
        book.add_order(order("a", Side::Sell, 101, "1.0")).unwrap();

        let removed = book.remove_order(&OrderId::new("a")).unwrap();
        assert_eq!(removed.id, OrderId::new("a"));
        assert!(!book.contains(&OrderId::new("a")));
        assert!(book.best_ask().is_none());
        assert!(book.get_order(&OrderId::new("a")).is_none());
    }

    #[test]
    fn test_depth_both_sides() {
        let mut book = Orderbook::new(Symbol::new("BTCUSDT"));
        book.add_order(order("b1", Side::Buy, 99, "1.0")).unwrap();
        book.add_order(order("b2", Side::Buy, 98, "2.0")).unwrap();
        book.add_order(order("a1", Side::Sell, 101, "1.5")).unwrap();

        let (bids, asks) = book.depth(5);
        assert_eq!(bids.len(), 2);
        assert_eq!(bids[0].0, Price::from_u64(99));
        assert_eq!(asks.len(), 1);
        assert_eq!(asks[0].0, Price::from_u64(101));
    }
}
