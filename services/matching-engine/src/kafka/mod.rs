//! Kafka transport boundary
//!
//! The engine consumes order commands from one topic and publishes trades
//! and book updates to two others, all keyed by symbol so per-symbol
//! ordering survives partitioning. The core never touches Kafka; these
//! modules translate between the wire contract and `Matcher` calls.

pub mod consumer;
pub mod producer;

pub use consumer::{CommandType, NewOrderPayload, OrderCommand};
pub use producer::{EventPublisher, TradeEvent};
