use matching_engine::config::Config;
use matching_engine::kafka::consumer;
use matching_engine::kafka::EventPublisher;
use matching_engine::Matcher;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    tracing::info!(brokers = %config.bootstrap_servers(), "starting matching engine");

    let matcher = Matcher::new();
    let publisher = EventPublisher::new(&config)?;
    let kafka_consumer = consumer::create_consumer(&config)?;

    tracing::info!("matching engine started");

    tokio::select! {
        result = consumer::run(&kafka_consumer, &matcher, &publisher) => result?,
        _ = shutdown_signal() => {
            tracing::info!("shutting down");
        }
    }

    Ok(())
}

/// Completes on SIGINT or SIGTERM
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(err) => {
            tracing::error!(error = %err, "failed to install SIGTERM handler");
            std::future::pending::<()>().await;
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
}
