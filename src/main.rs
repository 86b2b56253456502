//! Vigil monitor daemon
//!
//! Run with: cargo run
//!
//! Environment variables:
//! - VIGIL_SMTP_HOST: SMTP relay hostname (required)
//! - VIGIL_SMTP_USER: relay username (required)
//! - VIGIL_SMTP_PASSWORD: relay password (required)
//! - VIGIL_SMTP_PORT: relay port (default: 587)
//! - VIGIL_ALERT_FROM / VIGIL_ALERT_TO: sender and recipient addresses
//! - RUST_LOG: log level (default: info)
//!
//! Everything else (thresholds, intervals, watched devices) is compiled in;
//! see `config.rs`.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vigil::alerts::{AlertDispatcher, Notifier, SmtpRelay};
use vigil::checks::data_presence::DataPresenceChecker;
use vigil::checks::resources::{CpuChecker, MemoryChecker, StorageChecker};
use vigil::config::{self, SmtpConfig};
use vigil::scheduler::Scheduler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vigil=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let smtp = SmtpConfig::from_env()?;

    tracing::info!("Vigil configuration:");
    tracing::info!("  Data service: {}", config::DATA_SERVICE_URL);
    tracing::info!(
        "  Watched devices: {} (project {})",
        config::DEVICES.len(),
        config::PROJECT_ID
    );
    tracing::info!("  SMTP relay: {}:{}", smtp.host, smtp.port);
    tracing::info!("  Alert recipient: {}", smtp.recipient);
    tracing::info!("  Cooldown window: {:?}", config::COOLDOWN_WINDOW);

    let notifier = Notifier::new(
        Box::new(SmtpRelay::new(smtp.clone())),
        smtp.sender.clone(),
        smtp.recipient.clone(),
    );
    let dispatcher = Arc::new(AlertDispatcher::new(notifier, config::COOLDOWN_WINDOW));

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    let mut scheduler = Scheduler::new(dispatcher);
    for device in config::DEVICES {
        scheduler.spawn(Box::new(DataPresenceChecker::new(
            client.clone(),
            config::DATA_SERVICE_URL,
            config::PROJECT_ID,
            device,
            config::DATA_CHECK_INTERVAL,
        )));
    }
    scheduler.spawn(Box::new(MemoryChecker::new(
        config::MEMORY_THRESHOLD_PERCENT,
        config::MEMORY_CHECK_INTERVAL,
    )));
    scheduler.spawn(Box::new(CpuChecker::new(
        config::CPU_THRESHOLD_PERCENT,
        config::CPU_CHECK_INTERVAL,
    )));
    scheduler.spawn(Box::new(StorageChecker::new(
        config::STORAGE_THRESHOLD_GB,
        config::STORAGE_CHECK_INTERVAL,
    )));

    tracing::info!(loops = scheduler.running_loops(), "All checker loops started");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    scheduler.shutdown().await;

    Ok(())
}
