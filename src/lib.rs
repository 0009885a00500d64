//! # 22.do Temp Mail Client
//! Asynchronous wrapper around the 22.do disposable email HTTP API, providing simple methods to generate, rotate, and poll temporary mailboxes from Rust using [`Client`] and [`ClientBuilder`].
//!
//! ## Audience and uses
//! For Rust developers who need throwaway addresses in integration tests, demos, or automation scripts without running mail infrastructure: configure with [`ClientBuilder`], obtain an address (optionally filtered for a clean-looking local part), poll for messages ([`Message`]), then fetch bodies on demand.
//!
//! ## Runtime requirements
//! Async-only; run inside a Tokio (v1) runtime. HTTP calls use `reqwest`, so ensure the chosen Tokio features (`rt-multi-thread` or `current_thread`) are available in your application.
//!
//! ## Session model
//! 22.do tracks callers through a cookie pair: a session token and the active mailbox address. This crate generates the token locally from a cryptographically secure source and keeps both values in an explicit [`Session`] owned by the client, so no bootstrap request is needed and independent clients never share state.
//!
//! ## Out of scope
//! Not a general-purpose mail client or SMTP sender. It only consumes the 22.do service and inherits its availability, spam filtering, and retention limits.
//!
//! ## Errors
//! Network failures surface as [`Error::Transport`], a 401 as [`Error::Unauthorized`], other non-2xx statuses as [`Error::Http`], and anything else unexpected as [`Error::RequestFailed`]. A service-reported non-success marker is deliberately *not* an error: generate/change return `None` and the inbox check returns an empty list, mirroring the service's own degradation behavior. The crate-wide [`Result`] alias wraps these errors.
//!
//! ## Example
//! ```no_run
//! use tempmail22_client::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tempmail22_client::Error> {
//!     let mut client = Client::new()?;
//!
//!     if let Some(email) = client.generate_filtered_mailbox(2, 30).await? {
//!         println!("Mailbox: {email}");
//!
//!         for msg in client.check_new_messages().await? {
//!             println!("From: {}, Subject: {}", msg.from, msg.subject);
//!             let html = client.fetch_content(&msg.mail_id).await?;
//!             println!("{html}");
//!         }
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod models;
mod session;

pub use client::{Client, ClientBuilder};
pub use error::Error;
pub use models::Message;
pub use session::Session;

/// Result type alias for 22.do operations.
///
/// This is equivalent to `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
