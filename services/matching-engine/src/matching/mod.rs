//! Matching logic
//!
//! `crossing` holds the price predicate; `matcher` owns the books and runs
//! the cross loop.

pub mod crossing;
pub mod matcher;

pub use matcher::Matcher;
