//! Price level with a FIFO order queue
//!
//! A price level holds every resting order at one price on one side, in
//! arrival order. Time priority within the level follows directly from the
//! queue discipline: fills always consume the front.

use std::collections::VecDeque;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::Order;

/// All resting orders at a single price
///
/// `volume` is maintained incrementally and always equals the sum of the
/// members' remaining quantities.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    price: Price,
    orders: VecDeque<Order>,
    volume: Quantity,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new(price: Price) -> Self {
        Self {
            price,
            orders: VecDeque::new(),
            volume: Quantity::zero(),
        }
    }

    /// The price shared by every order in this level
    pub fn price(&self) -> Price {
        self.price
    }

    /// Append an order at the back of the queue (time priority)
    pub fn add(&mut self, order: Order) {
        assert_eq!(
            order.price,
            Some(self.price),
            "order price does not match level price"
        );
        self.volume = self.volume + order.remaining_quantity;
        self.orders.push_back(order);
    }

    /// Remove an order by id, preserving the queue order of the rest
    ///
    /// Returns the removed order, or None if it is not in this level.
    pub fn remove(&mut self, order_id: &OrderId) -> Option<Order> {
        let position = self.orders.iter().position(|o| &o.id == order_id)?;
        let order = self.orders.remove(position)?;
        self.volume = self.volume - order.remaining_quantity;
        Some(order)
    }

    /// Peek at the front order without removing it
    pub fn front(&self) -> Option<&Order> {
        self.orders.front()
    }

    /// Mutable access to the front order
    ///
    /// Callers that reduce the front order's remaining quantity must pair
    /// the change with `reduce_volume`.
    pub fn front_mut(&mut self) -> Option<&mut Order> {
        self.orders.front_mut()
    }

    /// Look up an order by id
    pub fn get(&self, order_id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| &o.id == order_id)
    }

    /// Reduce the aggregate volume after a partial fill of a member order
    pub fn reduce_volume(&mut self, quantity: Quantity) {
        self.volume = self.volume - quantity;
    }

    /// Total remaining quantity across all orders at this level
    pub fn volume(&self) -> Quantity {
        self.volume
    }

    /// Check if the level holds no orders
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Number of orders at this level
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Iterate over the resting orders in queue order
    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }
}
