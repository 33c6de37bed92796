//! End-to-end matching scenarios
//!
//! Drives the matcher through full submit/cancel flows and checks the
//! resulting trades, order updates, book state, and incremental deltas.
//!
//! Covered:
//! - Simple cross and partial taker rest
//! - Multi-level sweep with residual rest
//! - Market orders on empty and shallow books
//! - Time priority within a price level
//! - Delta faithfulness against the live book
//! - Quantity conservation across a sweep

use matching_engine::Matcher;
use types::ids::{OrderId, Symbol, UserId};
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderStatus, Side};

fn symbol() -> Symbol {
    Symbol::new("BTCUSDT")
}

fn limit(id: &str, user: &str, side: Side, price: &str, qty: &str) -> Order {
    Order::new_limit(
        OrderId::new(id),
        UserId::new(user),
        symbol(),
        side,
        Price::parse(price).unwrap(),
        Quantity::parse(qty).unwrap(),
        1_708_123_456_789,
    )
}

fn market(id: &str, user: &str, side: Side, qty: &str) -> Order {
    Order::new_market(
        OrderId::new(id),
        UserId::new(user),
        symbol(),
        side,
        Quantity::parse(qty).unwrap(),
        1_708_123_456_789,
    )
}

fn pair(price: &str, volume: &str) -> [String; 2] {
    [price.to_string(), volume.to_string()]
}

#[test]
fn simple_cross() {
    let matcher = Matcher::new();
    matcher.submit(limit("O1", "alice", Side::Sell, "100", "1.0")).unwrap();
    let result = matcher.submit(limit("O2", "bob", Side::Buy, "100", "1.0")).unwrap();

    assert_eq!(result.trades.len(), 1);
    let trade = &result.trades[0];
    assert_eq!(trade.price, Price::parse("100").unwrap());
    assert_eq!(trade.quantity, Quantity::parse("1.0").unwrap());
    assert_eq!(trade.maker_order_id, OrderId::new("O1"));
    assert_eq!(trade.taker_order_id, OrderId::new("O2"));
    assert_eq!(trade.maker_user_id, UserId::new("alice"));
    assert_eq!(trade.taker_user_id, UserId::new("bob"));
    assert!(!trade.is_buyer_maker);

    assert_eq!(result.delta.asks, vec![pair("100", "0")]);
    assert!(result.delta.bids.is_empty());

    let (bids, asks) = matcher.depth(&symbol(), 10).unwrap();
    assert!(bids.is_empty());
    assert!(asks.is_empty());
}

#[test]
fn partial_taker_rests() {
    let matcher = Matcher::new();
    matcher.submit(limit("O1", "alice", Side::Sell, "100", "1.0")).unwrap();
    let result = matcher.submit(limit("O2", "bob", Side::Buy, "100", "2.0")).unwrap();

    assert_eq!(result.trades.len(), 1);
    assert_eq!(result.trades[0].quantity, Quantity::parse("1.0").unwrap());

    // Taker rests with the residual on the bid side
    let book = matcher.orderbook(&symbol()).unwrap();
    let ob = book.read();
    let resting = ob.get_order(&OrderId::new("O2")).unwrap();
    assert_eq!(resting.remaining_quantity, Quantity::parse("1.0").unwrap());
    assert_eq!(
        ob.best_bid(),
        Some((Price::parse("100").unwrap(), Quantity::parse("1.0").unwrap()))
    );
    drop(ob);

    assert_eq!(result.delta.asks, vec![pair("100", "0")]);
    assert_eq!(result.delta.bids, vec![pair("100", "1.0")]);

    let taker_update = result.order_updates.last().unwrap();
    assert_eq!(taker_update.status, OrderStatus::Partial);
    assert_eq!(taker_update.remaining_qty, Quantity::parse("1.0").unwrap());
}

#[test]
fn multi_level_sweep_stops_at_limit() {
    let matcher = Matcher::new();
    matcher.submit(limit("O1", "alice", Side::Sell, "100", "1")).unwrap();
    matcher.submit(limit("O2", "bob", Side::Sell, "101", "1")).unwrap();
    matcher.submit(limit("O3", "carol", Side::Sell, "102", "1")).unwrap();

    let result = matcher.submit(limit("T", "dave", Side::Buy, "101", "2.5")).unwrap();

    assert_eq!(result.trades.len(), 2);
    assert_eq!(result.trades[0].price, Price::parse("100").unwrap());
    assert_eq!(result.trades[0].quantity, Quantity::parse("1").unwrap());
    assert_eq!(result.trades[1].price, Price::parse("101").unwrap());
    assert_eq!(result.trades[1].quantity, Quantity::parse("1").unwrap());

    // 102 never crosses; the residual 0.5 rests as a bid at 101
    let book = matcher.orderbook(&symbol()).unwrap();
    let ob = book.read();
    assert_eq!(
        ob.best_bid(),
        Some((Price::parse("101").unwrap(), Quantity::parse("0.5").unwrap()))
    );
    assert_eq!(
        ob.best_ask(),
        Some((Price::parse("102").unwrap(), Quantity::parse("1").unwrap()))
    );
    drop(ob);

    assert_eq!(result.delta.asks, vec![pair("100", "0"), pair("101", "0")]);
    assert_eq!(result.delta.bids, vec![pair("101", "0.5")]);
}

#[test]
fn market_buy_on_empty_book() {
    let matcher = Matcher::new();
    let result = matcher.submit(market("M", "alice", Side::Buy, "1.0")).unwrap();

    assert!(result.trades.is_empty());
    assert_eq!(result.order_updates.len(), 1);
    assert_eq!(result.order_updates[0].status, OrderStatus::Cancelled);
    assert!(result.delta.is_empty());

    let book = matcher.orderbook(&symbol()).unwrap();
    assert_eq!(book.read().sequence(), 0);
}

#[test]
fn market_sell_walks_the_book() {
    let matcher = Matcher::new();
    matcher.submit(limit("O1", "alice", Side::Buy, "99", "1")).unwrap();
    matcher.submit(limit("O2", "bob", Side::Buy, "98", "2")).unwrap();

    let result = matcher.submit(market("M", "carol", Side::Sell, "2.5")).unwrap();

    assert_eq!(result.trades.len(), 2);
    assert_eq!(result.trades[0].price, Price::parse("99").unwrap());
    assert_eq!(result.trades[0].quantity, Quantity::parse("1").unwrap());
    assert_eq!(result.trades[1].price, Price::parse("98").unwrap());
    assert_eq!(result.trades[1].quantity, Quantity::parse("1.5").unwrap());

    let taker_update = result.order_updates.last().unwrap();
    assert_eq!(taker_update.status, OrderStatus::Filled);

    let book = matcher.orderbook(&symbol()).unwrap();
    let ob = book.read();
    assert_eq!(
        ob.best_bid(),
        Some((Price::parse("98").unwrap(), Quantity::parse("0.5").unwrap()))
    );
    drop(ob);

    assert_eq!(result.delta.bids, vec![pair("99", "0"), pair("98", "0.5")]);
    assert!(result.delta.asks.is_empty());
}

#[test]
fn time_priority_within_level() {
    let matcher = Matcher::new();
    matcher.submit(limit("O1", "alice", Side::Sell, "100", "1")).unwrap();
    matcher.submit(limit("O2", "bob", Side::Sell, "100", "1")).unwrap();

    let first = matcher.submit(limit("T1", "carol", Side::Buy, "100", "1")).unwrap();
    assert_eq!(first.trades.len(), 1);
    assert_eq!(first.trades[0].maker_order_id, OrderId::new("O1"));

    let second = matcher.submit(limit("T2", "dave", Side::Buy, "100", "1")).unwrap();
    assert_eq!(second.trades.len(), 1);
    assert_eq!(second.trades[0].maker_order_id, OrderId::new("O2"));
}

#[test]
fn trades_execute_at_maker_price() {
    let matcher = Matcher::new();
    matcher.submit(limit("O1", "alice", Side::Sell, "100", "1")).unwrap();

    // Taker is willing to pay 105 but fills at the resting 100
    let result = matcher.submit(limit("T", "bob", Side::Buy, "105", "1")).unwrap();
    assert_eq!(result.trades[0].price, Price::parse("100").unwrap());
    assert_eq!(
        result.trades[0].quote_qty,
        Price::parse("100").unwrap() * Quantity::parse("1").unwrap()
    );
}

#[test]
fn quantity_conserved_across_sweep() {
    let matcher = Matcher::new();
    matcher.submit(limit("O1", "alice", Side::Sell, "100", "0.7")).unwrap();
    matcher.submit(limit("O2", "bob", Side::Sell, "100.5", "0.9")).unwrap();
    matcher.submit(limit("O3", "carol", Side::Sell, "101", "4")).unwrap();

    let original = Quantity::parse("3.1").unwrap();
    let result = matcher
        .submit(limit("T", "dave", Side::Buy, "101", "3.1"))
        .unwrap();

    let traded = result
        .trades
        .iter()
        .fold(Quantity::zero(), |acc, t| acc + t.quantity);
    let taker_update = result.order_updates.last().unwrap();
    assert_eq!(traded + taker_update.remaining_qty, original);
    assert_eq!(taker_update.status, OrderStatus::Filled);

    // O3 absorbed the tail and still rests with the rest
    let book = matcher.orderbook(&symbol()).unwrap();
    let ob = book.read();
    let o3 = ob.get_order(&OrderId::new("O3")).unwrap();
    assert_eq!(o3.remaining_quantity, Quantity::parse("2.5").unwrap());
}

#[test]
fn delta_matches_live_book_at_every_touched_price() {
    let matcher = Matcher::new();
    matcher.submit(limit("O1", "alice", Side::Sell, "100", "1")).unwrap();
    matcher.submit(limit("O2", "bob", Side::Sell, "101", "2")).unwrap();

    let result = matcher.submit(limit("T", "carol", Side::Buy, "101", "1.5")).unwrap();

    let book = matcher.orderbook(&symbol()).unwrap();
    let ob = book.read();
    for [price, volume] in &result.delta.asks {
        let live = ob
            .level_volume(Side::Sell, Price::parse(price).unwrap())
            .map(|q| q.to_string())
            .unwrap_or_else(|| "0".to_string());
        assert_eq!(volume, &live, "ask level {price} drifted from delta");
    }
    assert_eq!(result.delta.sequence, ob.sequence());
}

#[test]
fn cancel_emits_single_point_delta() {
    let matcher = Matcher::new();
    matcher.submit(limit("O1", "alice", Side::Sell, "100", "1")).unwrap();
    matcher.submit(limit("O2", "bob", Side::Sell, "100", "2")).unwrap();

    let (order, delta) = matcher.cancel(&symbol(), &OrderId::new("O1")).unwrap();
    assert_eq!(order.id, OrderId::new("O1"));

    // Level still holds O2; cancel below the top of a level must report
    // the surviving volume, not zero
    assert_eq!(delta.asks, vec![pair("100", "2")]);
    assert!(delta.bids.is_empty());

    let (_, delta) = matcher.cancel(&symbol(), &OrderId::new("O2")).unwrap();
    assert_eq!(delta.asks, vec![pair("100", "0")]);
}

#[test]
fn sequence_advances_only_on_book_mutation() {
    let matcher = Matcher::new();
    matcher.submit(limit("O1", "alice", Side::Sell, "100", "2")).unwrap();

    let book = matcher.orderbook(&symbol()).unwrap();
    assert_eq!(book.read().sequence(), 1);

    // Partial maker fill mutates a level in place, not the book index
    matcher.submit(limit("T", "bob", Side::Buy, "100", "0.5")).unwrap();
    assert_eq!(book.read().sequence(), 1);

    // Full consumption removes the maker
    matcher.submit(limit("T2", "carol", Side::Buy, "100", "1.5")).unwrap();
    assert_eq!(book.read().sequence(), 2);
}
