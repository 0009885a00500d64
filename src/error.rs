//! Error types for the 22.do client.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur during 22.do operations.
///
/// The transport layer classifies failures and re-raises them; it never
/// retries. A service-reported non-success marker is *not* an error — the
/// mailbox operations surface it as an empty result instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Connection, DNS resolution, or timeout failure.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The service rejected the session cookies with a 401.
    #[error("unauthorized: the service rejected the session cookies")]
    Unauthorized,

    /// Any other non-2xx HTTP status.
    #[error("unexpected HTTP status {0}")]
    Http(StatusCode),

    /// The operation requires a bound mailbox and none is set.
    #[error("no mailbox is bound to this session")]
    MailboxNotBound,

    /// Any other unexpected failure while performing a call.
    #[error("request failed: {0}")]
    RequestFailed(String),
}
