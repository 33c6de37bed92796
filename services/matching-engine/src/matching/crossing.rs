//! Crossing predicate
//!
//! Decides whether an incoming taker can trade against a resting maker
//! price. A taker without a limit (market order) crosses any maker price;
//! there is no numeric infinity or zero sentinel.

use types::numeric::Price;
use types::order::Side;

/// Check whether the taker's price cap allows trading at `maker_price`
///
/// A buy crosses an ask at or below its limit; a sell crosses a bid at or
/// above its limit. `None` means no cap.
pub fn crosses(taker_side: Side, taker_limit: Option<Price>, maker_price: Price) -> bool {
    match (taker_side, taker_limit) {
        (_, None) => true,
        (Side::Buy, Some(limit)) => maker_price <= limit,
        (Side::Sell, Some(limit)) => maker_price >= limit,
    }
}
