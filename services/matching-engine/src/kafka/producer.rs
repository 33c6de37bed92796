//! Outbound event publication
//!
//! Trades go to the trades topic, book updates to the updates topic, both
//! keyed by symbol. A submit's trades are published before its book
//! update, and in execution order; awaiting each delivery preserves that
//! ordering through librdkafka.

use std::time::Duration;

use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use serde::{Deserialize, Serialize};
use types::trade::Trade;

use crate::config::Config;
use crate::events::OrderbookDelta;

/// Trade as serialized onto the trades topic
///
/// Decimal fields are strings. Fees are `"0"`; fee enrichment happens
/// downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeEvent {
    pub trade_id: String,
    pub symbol: String,
    pub price: String,
    pub quantity: String,
    pub quote_qty: String,
    pub maker_order_id: String,
    pub taker_order_id: String,
    pub maker_user_id: String,
    pub taker_user_id: String,
    pub is_buyer_maker: bool,
    pub maker_fee: String,
    pub taker_fee: String,
    pub executed_at: i64,
}

impl From<&Trade> for TradeEvent {
    fn from(trade: &Trade) -> Self {
        Self {
            trade_id: trade.id.to_string(),
            symbol: trade.symbol.to_string(),
            price: trade.price.to_string(),
            quantity: trade.quantity.to_string(),
            quote_qty: trade.quote_qty.to_string(),
            maker_order_id: trade.maker_order_id.to_string(),
            taker_order_id: trade.taker_order_id.to_string(),
            maker_user_id: trade.maker_user_id.to_string(),
            taker_user_id: trade.taker_user_id.to_string(),
            is_buyer_maker: trade.is_buyer_maker,
            maker_fee: trade.maker_fee.to_string(),
            taker_fee: trade.taker_fee.to_string(),
            executed_at: trade.executed_at,
        }
    }
}

/// Publishes engine output to Kafka
pub struct EventPublisher {
    producer: FutureProducer,
    trades_topic: String,
    updates_topic: String,
}

impl EventPublisher {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", config.bootstrap_servers())
            .set("message.timeout.ms", "5000")
            .create()?;

        Ok(Self {
            producer,
            trades_topic: config.trades_topic.clone(),
            updates_topic: config.updates_topic.clone(),
        })
    }

    /// Publish trades in execution order, keyed by symbol
    pub async fn publish_trades(&self, trades: &[Trade]) -> anyhow::Result<()> {
        for trade in trades {
            let event = TradeEvent::from(trade);
            let payload = serde_json::to_vec(&event)?;
            self.producer
                .send(
                    FutureRecord::to(&self.trades_topic)
                        .key(event.symbol.as_str())
                        .payload(&payload),
                    Duration::from_secs(5),
                )
                .await
                .map_err(|(err, _)| anyhow::anyhow!("trade publish failed: {err}"))?;
        }
        Ok(())
    }

    /// Publish one incremental book update, keyed by symbol
    pub async fn publish_book_update(&self, delta: &OrderbookDelta) -> anyhow::Result<()> {
        let payload = serde_json::to_vec(delta)?;
        self.producer
            .send(
                FutureRecord::to(&self.updates_topic)
                    .key(delta.symbol.as_str())
                    .payload(&payload),
                Duration::from_secs(5),
            )
            .await
            .map_err(|(err, _)| anyhow::anyhow!("book update publish failed: {err}"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::{OrderId, Symbol, UserId};
    use types::numeric::{Price, Quantity};
    use types::order::{Order, Side};

    #[test]
    fn test_trade_event_wire_shape() {
        let maker = Order::new_limit(
            OrderId::new("m"),
            UserId::new("alice"),
            Symbol::new("BTCUSDT"),
            Side::Sell,
            Price::from_u64(100),
            Quantity::parse("1.0").unwrap(),
            1_708_123_456_789,
        );
        let taker = Order::new_limit(
            OrderId::new("t"),
            UserId::new("bob"),
            Symbol::new("BTCUSDT"),
            Side::Buy,
            Price::from_u64(100),
            Quantity::parse("1.0").unwrap(),
            1_708_123_456_790,
        );
        let trade = Trade::new(
            &maker,
            &taker,
            Price::from_u64(100),
            Quantity::parse("1.0").unwrap(),
            1_708_123_456_791,
        );

        let event = TradeEvent::from(&trade);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["symbol"], "BTCUSDT");
        assert_eq!(json["price"], "100");
        assert_eq!(json["quantity"], "1.0");
        assert_eq!(json["quoteQty"], "100.0");
        assert_eq!(json["makerOrderId"], "m");
        assert_eq!(json["takerUserId"], "bob");
        assert_eq!(json["isBuyerMaker"], false);
        assert_eq!(json["makerFee"], "0");
        assert_eq!(json["takerFee"], "0");
        assert_eq!(json["executedAt"], 1_708_123_456_791_i64);
    }
}
