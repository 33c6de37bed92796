//! Error taxonomy for the matching engine

use thiserror::Error;

/// Errors returned by the matching core and the command boundary
///
/// Unknown symbols and unknown orders on cancel are not errors: books are
/// created on demand, and cancelling a missing order is a silent no-op.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("duplicate order id: {order_id}")]
    DuplicateOrder { order_id: String },

    #[error("invalid price: {0}")]
    InvalidPrice(String),

    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("limit order missing price")]
    MissingPrice,

    #[error("malformed command: {0}")]
    MalformedCommand(String),
}
