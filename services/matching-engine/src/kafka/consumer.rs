//! Inbound command consumption
//!
//! Commands arrive on one topic, partitioned by symbol, so per-symbol
//! ordering is total. The loop is at-least-once: an offset is committed
//! only after the command's events are published. Redelivered commands are
//! recognized by commandId and republish their cached events instead of
//! re-matching, which would mint duplicate trades.

use std::collections::{HashMap, VecDeque};
use std::str::FromStr;

use rdkafka::config::ClientConfig;
use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::message::BorrowedMessage;
use rdkafka::Message;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::errors::EngineError;
use types::ids::{OrderId, Symbol, UserId};
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderType, Side};
use types::trade::Trade;

use crate::config::Config;
use crate::events::OrderbookDelta;
use crate::kafka::producer::EventPublisher;
use crate::matching::Matcher;

/// How many processed commandIds are remembered for redelivery dedup
const DEDUP_WINDOW: usize = 16_384;

/// Command kind discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CommandType {
    New,
    Cancel,
}

/// Inbound order command envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCommand {
    pub command_id: String,
    pub order_id: String,
    pub user_id: String,
    pub symbol: String,
    #[serde(rename = "type")]
    pub command_type: CommandType,
    pub timestamp: i64,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}

/// Payload of a NEW command
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderPayload {
    pub side: Side,
    pub order_type: OrderType,
    #[serde(default)]
    pub price: Option<String>,
    pub quantity: String,
    #[serde(default)]
    pub client_order_id: Option<String>,
}

/// Build a core order from a NEW command
///
/// `price` must be present and a positive decimal for LIMIT; it is
/// ignored for MARKET. Quantity must be a positive decimal.
pub fn build_order(command: &OrderCommand) -> Result<Order, EngineError> {
    let payload = command
        .payload
        .clone()
        .ok_or_else(|| EngineError::MalformedCommand("NEW command without payload".to_string()))?;
    let payload: NewOrderPayload = serde_json::from_value(payload)
        .map_err(|err| EngineError::MalformedCommand(err.to_string()))?;

    let symbol = Symbol::try_new(command.symbol.clone())
        .ok_or_else(|| EngineError::MalformedCommand("empty symbol".to_string()))?;
    let quantity = Decimal::from_str(&payload.quantity)
        .ok()
        .and_then(Quantity::try_new)
        .ok_or_else(|| EngineError::InvalidQuantity(payload.quantity.clone()))?;

    let order_id = OrderId::new(command.order_id.clone());
    let user_id = UserId::new(command.user_id.clone());

    match payload.order_type {
        OrderType::Limit => {
            let raw = payload.price.as_deref().ok_or(EngineError::MissingPrice)?;
            let price = Decimal::from_str(raw)
                .ok()
                .and_then(Price::try_new)
                .ok_or_else(|| EngineError::InvalidPrice(raw.to_string()))?;
            Ok(Order::new_limit(
                order_id,
                user_id,
                symbol,
                payload.side,
                price,
                quantity,
                command.timestamp,
            ))
        }
        OrderType::Market => Ok(Order::new_market(
            order_id,
            user_id,
            symbol,
            payload.side,
            quantity,
            command.timestamp,
        )),
    }
}

/// Create the command consumer and subscribe to the orders topic
///
/// Auto-commit is off: offsets are committed per message after its events
/// are out.
pub fn create_consumer(config: &Config) -> anyhow::Result<StreamConsumer> {
    let consumer: StreamConsumer = ClientConfig::new()
        .set("bootstrap.servers", config.bootstrap_servers())
        .set("group.id", &config.group_id)
        .set("enable.auto.commit", "false")
        .set("auto.offset.reset", "earliest")
        .create()?;
    consumer.subscribe(&[config.orders_topic.as_str()])?;
    Ok(consumer)
}

/// Events produced by an already-matched command
///
/// Kept in the dedup window so a redelivery republishes instead of
/// re-matching.
#[derive(Debug, Clone, Default)]
struct CachedEvents {
    trades: Vec<Trade>,
    delta: Option<OrderbookDelta>,
}

/// Bounded commandId → events map with FIFO eviction
struct DedupWindow {
    entries: HashMap<String, CachedEvents>,
    order: VecDeque<String>,
    capacity: usize,
}

impl DedupWindow {
    fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    fn get(&self, command_id: &str) -> Option<&CachedEvents> {
        self.entries.get(command_id)
    }

    fn insert(&mut self, command_id: String, events: CachedEvents) {
        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        if self.entries.insert(command_id.clone(), events).is_none() {
            self.order.push_back(command_id);
        }
    }
}

/// Consume commands until the task is cancelled or the consumer fails
pub async fn run(
    consumer: &StreamConsumer,
    matcher: &Matcher,
    publisher: &EventPublisher,
) -> anyhow::Result<()> {
    let mut window = DedupWindow::new(DEDUP_WINDOW);

    loop {
        let message = match consumer.recv().await {
            Ok(message) => message,
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch message");
                continue;
            }
        };

        let parsed = match message.payload() {
            Some(bytes) => serde_json::from_slice::<OrderCommand>(bytes)
                .map_err(|err| err.to_string()),
            None => Err("empty payload".to_string()),
        };
        let command = match parsed {
            Ok(command) => command,
            Err(err) => {
                // Poison pill: commit so it is not redelivered forever
                tracing::warn!(error = %err, "malformed command, skipping");
                commit(consumer, &message);
                continue;
            }
        };

        match process_command(matcher, publisher, &mut window, &command).await {
            Ok(()) => commit(consumer, &message),
            Err(err) => {
                // No commit: the command is redelivered and its cached
                // events republished without re-matching
                tracing::error!(
                    command_id = %command.command_id,
                    error = %err,
                    "publish failed, awaiting redelivery"
                );
            }
        }
    }
}

fn commit(consumer: &StreamConsumer, message: &BorrowedMessage<'_>) {
    if let Err(err) = consumer.commit_message(message, CommitMode::Async) {
        tracing::error!(error = %err, "failed to commit offset");
    }
}

/// Match (or recall) a command's events, then publish them
///
/// Trades go out before the book update. Rejected commands produce no
/// events but still occupy a dedup slot so their redelivery stays cheap.
async fn process_command(
    matcher: &Matcher,
    publisher: &EventPublisher,
    window: &mut DedupWindow,
    command: &OrderCommand,
) -> anyhow::Result<()> {
    let cached = match window.get(&command.command_id) {
        Some(events) => {
            tracing::debug!(
                command_id = %command.command_id,
                "duplicate delivery, republishing cached events"
            );
            events.clone()
        }
        None => {
            let events = match_command(matcher, command);
            window.insert(command.command_id.clone(), events.clone());
            events
        }
    };

    if !cached.trades.is_empty() {
        publisher.publish_trades(&cached.trades).await?;
    }
    if let Some(delta) = &cached.delta {
        publisher.publish_book_update(delta).await?;
    }
    Ok(())
}

fn match_command(matcher: &Matcher, command: &OrderCommand) -> CachedEvents {
    match command.command_type {
        CommandType::New => {
            let order = match build_order(command) {
                Ok(order) => order,
                Err(err) => {
                    tracing::warn!(
                        command_id = %command.command_id,
                        error = %err,
                        "invalid NEW command"
                    );
                    return CachedEvents::default();
                }
            };

            tracing::info!(
                order_id = %order.id,
                symbol = %order.symbol,
                side = ?order.side,
                "processing order"
            );

            match matcher.submit(order) {
                Ok(result) => {
                    let delta = if result.delta.is_empty() {
                        None
                    } else {
                        Some(result.delta)
                    };
                    CachedEvents {
                        trades: result.trades,
                        delta,
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        order_id = %command.order_id,
                        error = %err,
                        "order rejected"
                    );
                    CachedEvents::default()
                }
            }
        }
        CommandType::Cancel => {
            let symbol = match Symbol::try_new(command.symbol.clone()) {
                Some(symbol) => symbol,
                None => {
                    tracing::warn!(command_id = %command.command_id, "cancel with empty symbol");
                    return CachedEvents::default();
                }
            };
            match matcher.cancel(&symbol, &OrderId::new(command.order_id.clone())) {
                Some((order, delta)) => {
                    tracing::info!(order_id = %order.id, "order cancelled");
                    CachedEvents {
                        trades: Vec::new(),
                        delta: Some(delta),
                    }
                }
                // Unknown order: silent no-op
                None => CachedEvents::default(),
            }
        }
    }
}
