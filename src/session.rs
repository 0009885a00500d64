//! Session state for the 22.do client.
//!
//! The service identifies a caller by a cookie pair: a `PHPSESSID` value
//! invented by the client, and a `mail` value holding the active mailbox
//! address. Both travel with every request.

use rand::Rng;
use rand::distr::Alphanumeric;
use std::fmt;

/// Length of the generated `PHPSESSID` cookie value.
pub(crate) const SESSION_TOKEN_LEN: usize = 26;

/// Per-client session state, rendered into the `Cookie` header of every
/// outbound request.
///
/// A `Session` is owned by exactly one [`Client`](crate::Client); callers
/// that want concurrent mailboxes construct multiple clients. The mailbox
/// starts unbound and is set by the generate/change operations when asked
/// to bind.
pub struct Session {
    token: String,
    mailbox: Option<String>,
}

impl Session {
    /// Create a fresh session with a random 26-character alphanumeric
    /// token and no bound mailbox.
    ///
    /// The token is drawn from [`rand::rng`], a cryptographically secure
    /// generator.
    pub fn new() -> Self {
        let token = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(SESSION_TOKEN_LEN)
            .map(char::from)
            .collect();

        Self {
            token,
            mailbox: None,
        }
    }

    /// The session token sent as the `PHPSESSID` cookie.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The currently bound mailbox address, if any.
    pub fn mailbox(&self) -> Option<&str> {
        self.mailbox.as_deref()
    }

    /// Bind a mailbox address to this session.
    pub fn bind(&mut self, mailbox: impl Into<String>) {
        self.mailbox = Some(mailbox.into());
    }

    /// Drop the bound mailbox, returning the session to its unbound state.
    pub fn clear(&mut self) {
        self.mailbox = None;
    }

    /// Render the cookie pair for the `Cookie` request header.
    ///
    /// An unbound session sends an empty `mail` value, which the service
    /// reads as "no mailbox selected".
    pub(crate) fn cookie_header(&self) -> String {
        format!(
            "PHPSESSID={}; mail={}",
            self.token,
            self.mailbox.as_deref().unwrap_or("")
        )
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("mailbox", &self.mailbox)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_26_alphanumeric_chars() {
        let session = Session::new();
        assert_eq!(session.token().len(), SESSION_TOKEN_LEN);
        assert!(session.token().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn fresh_sessions_get_distinct_tokens() {
        assert_ne!(Session::new().token(), Session::new().token());
    }

    #[test]
    fn unbound_session_renders_empty_mail_cookie() {
        let session = Session::new();
        assert!(session.mailbox().is_none());
        assert_eq!(
            session.cookie_header(),
            format!("PHPSESSID={}; mail=", session.token())
        );
    }

    #[test]
    fn bind_and_clear_update_the_cookie_pair() {
        let mut session = Session::new();
        session.bind("a.b@gmail.com");
        assert_eq!(session.mailbox(), Some("a.b@gmail.com"));
        assert_eq!(
            session.cookie_header(),
            format!("PHPSESSID={}; mail=a.b@gmail.com", session.token())
        );

        session.clear();
        assert!(session.mailbox().is_none());
    }

    #[test]
    fn debug_output_redacts_the_token() {
        let session = Session::new();
        let rendered = format!("{session:?}");
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains(session.token()));
    }
}
