//! Example: Using tracing for observability.
//!
//! The client emits spans for every operation and `debug` events for
//! addresses rejected by the quality filter.
//!
//! # Usage
//!
//! ```bash
//! # Set log level (trace, debug, info, warn, error)
//! export RUST_LOG=tempmail22_client=debug
//!
//! cargo run --example with_tracing
//! ```

use tempmail22_client::Client;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber with environment filter
    // Use RUST_LOG environment variable to control log levels
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tempmail22_client=debug")),
        )
        .with_target(true)
        .init();

    tracing::info!("Starting 22.do client example");

    let mut client = Client::new()?;

    // Rejected attempts show up as debug events while this runs.
    match client.generate_filtered_mailbox(2, 10).await? {
        Some(email) => tracing::info!(%email, "generated filtered mailbox"),
        None => {
            tracing::warn!("no acceptable address in 10 attempts");
            return Ok(());
        }
    }

    // Rotate to a fresh address without filtering.
    match client.change_mailbox(true).await? {
        Some(email) => tracing::info!(%email, "rotated to new mailbox"),
        None => tracing::warn!("service declined to change the mailbox"),
    }

    let messages = client.check_new_messages().await?;
    tracing::info!(count = messages.len(), "checked inbox");

    Ok(())
}
