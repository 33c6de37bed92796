//! Ask (sell-side) order book
//!
//! Price levels sorted so the lowest ask is the best, which is the natural
//! front of the `BTreeMap`.

use std::collections::BTreeMap;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::Order;

use super::price_level::PriceLevel;

/// Sell side of an order book
///
/// At each price level orders keep FIFO time priority. Empty levels are
/// dropped as soon as their last order leaves.
#[derive(Debug, Clone, Default)]
pub struct AskBook {
    levels: BTreeMap<Price, PriceLevel>,
}

impl AskBook {
    /// Create a new empty ask book
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// Insert an order at its price level, creating the level if needed
    pub fn add(&mut self, price: Price, order: Order) {
        self.levels
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price))
            .add(order);
    }

    /// Remove an order, dropping the level if it becomes empty
    pub fn remove(&mut self, price: Price, order_id: &OrderId) -> Option<Order> {
        let level = self.levels.get_mut(&price)?;
        let order = level.remove(order_id)?;
        if level.is_empty() {
            self.levels.remove(&price);
        }
        Some(order)
    }

    /// The best (lowest) ask level
    pub fn best(&self) -> Option<&PriceLevel> {
        self.levels.values().next()
    }

    /// The best ask price
    pub fn best_price(&self) -> Option<Price> {
        self.levels.keys().next().copied()
    }

    /// Mutable access to the best ask level
    pub(crate) fn best_mut(&mut self) -> Option<&mut PriceLevel> {
        self.levels.values_mut().next()
    }

    /// Level lookup by price
    pub fn level(&self, price: Price) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    /// Mutable level lookup by price
    pub(crate) fn level_mut(&mut self, price: Price) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&price)
    }

    /// Volume resting at a price, if the level exists
    pub fn volume_at(&self, price: Price) -> Option<Quantity> {
        self.levels.get(&price).map(|l| l.volume())
    }

    /// Top `n` levels, best first
    pub fn top_n(&self, n: usize) -> Vec<(Price, Quantity)> {
        self.levels
            .iter()
            .take(n)
            .map(|(price, level)| (*price, level.volume()))
            .collect()
    }

    /// Check if the side holds no levels
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Number of price levels
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}
