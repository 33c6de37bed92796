//! Environment configuration for the engine binary

use std::env;

/// Transport configuration, read from the environment with defaults
#[derive(Debug, Clone)]
pub struct Config {
    /// Kafka broker addresses
    pub brokers: Vec<String>,
    /// Topic carrying inbound order commands, partitioned by symbol
    pub orders_topic: String,
    /// Topic for executed trades
    pub trades_topic: String,
    /// Topic for incremental book updates
    pub updates_topic: String,
    /// Consumer group id
    pub group_id: String,
}

impl Config {
    /// Read configuration from the environment
    ///
    /// `KAFKA_BROKERS` is comma-separated; everything defaults to the
    /// local development setup when unset.
    pub fn from_env() -> Self {
        let brokers = env_or("KAFKA_BROKERS", "localhost:9092")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            brokers,
            orders_topic: env_or("KAFKA_ORDERS_TOPIC", "orders"),
            trades_topic: env_or("KAFKA_TRADES_TOPIC", "trades"),
            updates_topic: env_or("KAFKA_UPDATES_TOPIC", "orderbook-updates"),
            group_id: env_or("KAFKA_GROUP_ID", "matching-engine"),
        }
    }

    /// Broker list in librdkafka `bootstrap.servers` form
    pub fn bootstrap_servers(&self) -> String {
        self.brokers.join(",")
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
