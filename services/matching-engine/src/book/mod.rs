//! Order book data structures
//!
//! One `Orderbook` per symbol, holding a bid side and an ask side. Each
//! side keeps its price levels in a `BTreeMap` so the best price is a
//! boundary lookup and iteration is deterministic.

pub mod ask_book;
pub mod bid_book;
pub mod orderbook;
pub mod price_level;

pub use ask_book::AskBook;
pub use bid_book::BidBook;
pub use orderbook::Orderbook;
pub use price_level::PriceLevel;
