//! 22.do async client implementation.
//!
//! This module provides an async [`Client`] and [`ClientBuilder`] for interacting with
//! the 22.do temporary email service.
//!
//! Typical flow:
//! 1) Build a client (`Client::new` or `Client::builder().build()`)
//! 2) Obtain an address via [`Client::generate_mailbox`] or [`Client::generate_filtered_mailbox`]
//! 3) Poll the inbox via [`Client::check_new_messages`]
//! 4) Fetch a message body via [`Client::fetch_content`]

use crate::models::{CheckEnvelope, MailboxEnvelope, Message};
use crate::session::Session;
use crate::{Error, Result};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE, COOKIE, HeaderMap, HeaderValue, USER_AGENT};
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};

/// Async client for the 22.do temporary email service.
///
/// The client owns a [`Session`]: a locally generated session token plus the
/// currently bound mailbox address, sent as a cookie pair on every request.
/// No bootstrap request is needed — construction is purely local.
///
/// Operations that can bind a mailbox take `&mut self`; a `Client` therefore
/// serves one mailbox at a time. Construct one client per concurrent mailbox.
///
/// # Notes
/// - All methods are async and require a Tokio runtime (or any runtime
///   compatible with `reqwest`).
/// - The service reports business-level failure through an `action` marker in
///   its JSON envelope. A non-success marker is returned as `None`/empty, not
///   as an error; see [`Error`] for the failures that do raise.
pub struct Client {
    http: reqwest::Client,
    session: Session,
    proxy: Option<String>,
    user_agent: String,
    base_url: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("http", &"<reqwest::Client>")
            .field("session", &self.session)
            .field("proxy", &self.proxy)
            .field("user_agent", &self.user_agent)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Client {
    /// Create a [`ClientBuilder`] for configuring a new client.
    ///
    /// Use this when you need to set a proxy, change TLS behavior, override
    /// the user agent, or pre-bind an existing mailbox address.
    ///
    /// # Examples
    /// ```
    /// # use tempmail22_client::Client;
    /// # fn main() -> Result<(), tempmail22_client::Error> {
    /// let client = Client::builder()
    ///     .user_agent("my-app/1.0")
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a new 22.do client using default settings.
    ///
    /// A fresh [`Session`] token is generated locally; no network request is
    /// performed until the first operation.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be constructed.
    ///
    /// # Examples
    /// ```
    /// # use tempmail22_client::Client;
    /// # fn main() -> Result<(), tempmail22_client::Error> {
    /// let client = Client::new()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new() -> Result<Self> {
        ClientBuilder::new().build()
    }

    /// Get the proxy URL configured for this client (if any).
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    /// The session state carried as cookies on every request.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The mailbox address currently bound to the session, if any.
    pub fn current_mailbox(&self) -> Option<&str> {
        self.session.mailbox()
    }

    /// Request a new mailbox address from the service.
    ///
    /// Asks 22.do to generate a mailbox of the fixed provider type. When the
    /// service reports success, the address is returned; with
    /// `bind_to_session` it is also stored as the session's active mailbox,
    /// making [`Client::check_new_messages`] valid.
    ///
    /// A non-success marker yields `Ok(None)` and leaves the session
    /// untouched — the service produced no address, which callers must
    /// handle. See the crate docs for why this is not surfaced as an error.
    ///
    /// # Errors
    /// Returns an error on transport/HTTP failure, or when a success
    /// response is missing the address payload.
    ///
    /// # Examples
    /// ```no_run
    /// # use tempmail22_client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), tempmail22_client::Error> {
    /// let mut client = Client::new()?;
    /// if let Some(email) = client.generate_mailbox(true).await? {
    ///     println!("Mailbox: {email}");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self))]
    pub async fn generate_mailbox(&mut self, bind_to_session: bool) -> Result<Option<String>> {
        let form = [("type", MAILBOX_TYPE)];
        let body = self
            .execute_request(
                ApiMethod::Post,
                "/mailbox/generate",
                Some(&form),
                CallKind::Api,
            )
            .await?;
        let envelope: MailboxEnvelope = decode_json(&body)?;
        self.accept_address(envelope, bind_to_session)
    }

    /// Repeatedly generate mailboxes until one passes the quality filter.
    ///
    /// Calls [`Client::generate_mailbox`] with binding enabled up to
    /// `max_attempts` times and accepts the first address that carries the
    /// provider marker and whose local part has at most `max_dots + 2`
    /// dot-separated segments. There is no delay between attempts; the
    /// remote call latency is the only pacing.
    ///
    /// Exhausting all attempts returns `Ok(None)`. Note that every attempt
    /// binds its address to the session, so after exhaustion the session
    /// holds the last rejected address.
    ///
    /// Rejected attempts are logged at `debug` level.
    ///
    /// # Errors
    /// Transport/HTTP failures propagate immediately and end the loop.
    ///
    /// # Examples
    /// ```no_run
    /// # use tempmail22_client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), tempmail22_client::Error> {
    /// let mut client = Client::new()?;
    /// match client.generate_filtered_mailbox(2, 30).await? {
    ///     Some(email) => println!("Mailbox: {email}"),
    ///     None => println!("no acceptable address after 30 attempts"),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self))]
    pub async fn generate_filtered_mailbox(
        &mut self,
        max_dots: usize,
        max_attempts: usize,
    ) -> Result<Option<String>> {
        for attempt in 1..=max_attempts {
            match self.generate_mailbox(true).await? {
                Some(email) if is_clean_address(&email, max_dots) => {
                    debug!(attempt, %email, "accepted generated address");
                    return Ok(Some(email));
                }
                Some(email) => {
                    debug!(attempt, %email, "generated address rejected by filter");
                }
                None => {
                    debug!(attempt, "service produced no address");
                }
            }
        }
        Ok(None)
    }

    /// Ask the service to swap the session to a new mailbox address.
    ///
    /// No provider or dot filtering is applied. The success-marker contract
    /// is the same as [`Client::generate_mailbox`]: a non-success marker
    /// yields `Ok(None)` and leaves the session untouched.
    ///
    /// # Errors
    /// Returns an error on transport/HTTP failure, or when a success
    /// response is missing the address payload.
    #[instrument(skip(self))]
    pub async fn change_mailbox(&mut self, bind_to_session: bool) -> Result<Option<String>> {
        let body = self
            .execute_request(ApiMethod::Post, "/mailbox/change", None, CallKind::Api)
            .await?;
        let envelope: MailboxEnvelope = decode_json(&body)?;
        self.accept_address(envelope, bind_to_session)
    }

    /// Check the bound mailbox for new messages.
    ///
    /// Requires a bound mailbox: an unbound session fails fast with
    /// [`Error::MailboxNotBound`] before any network call. On a success
    /// marker the service's message list is returned (possibly empty, and an
    /// absent list counts as empty); a non-success marker also yields an
    /// empty list rather than an error.
    ///
    /// # Errors
    /// Returns [`Error::MailboxNotBound`] when no mailbox is bound, or a
    /// transport/HTTP error for a failed call.
    ///
    /// # Examples
    /// ```no_run
    /// # use tempmail22_client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), tempmail22_client::Error> {
    /// let mut client = Client::new()?;
    /// client.generate_mailbox(true).await?;
    /// for msg in client.check_new_messages().await? {
    ///     println!("From: {}, Subject: {}", msg.from, msg.subject);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self))]
    pub async fn check_new_messages(&self) -> Result<Vec<Message>> {
        if self.session.mailbox().is_none() {
            return Err(Error::MailboxNotBound);
        }

        let body = self
            .execute_request(ApiMethod::Get, "/mailbox/check", None, CallKind::Api)
            .await?;
        let envelope: CheckEnvelope = decode_json(&body)?;
        if !envelope.is_ok() {
            return Ok(Vec::new());
        }

        let messages = envelope.messages.unwrap_or_default();
        debug!(count = messages.len(), "inbox checked");
        Ok(messages)
    }

    /// Fetch the raw HTML body of a message by id.
    ///
    /// Any 2xx response body is returned verbatim as UTF-8 text; there is no
    /// JSON envelope and no success-marker check on this endpoint. The
    /// status mapping of the transport still applies (401 surfaces as
    /// [`Error::Unauthorized`], other non-2xx as [`Error::Http`]).
    ///
    /// # Examples
    /// ```no_run
    /// # use tempmail22_client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), tempmail22_client::Error> {
    /// # let client = Client::new()?;
    /// let html = client.fetch_content("m1").await?;
    /// println!("{html}");
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self))]
    pub async fn fetch_content(&self, mail_id: &str) -> Result<String> {
        let path = format!("/content/{mail_id}/html");
        let body = self
            .execute_request(ApiMethod::Get, &path, None, CallKind::Content)
            .await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Apply the success-marker contract shared by generate and change.
    fn accept_address(
        &mut self,
        envelope: MailboxEnvelope,
        bind_to_session: bool,
    ) -> Result<Option<String>> {
        if !envelope.is_ok() {
            return Ok(None);
        }

        let email = envelope
            .data
            .map(|data| data.address.email)
            .ok_or_else(|| {
                Error::RequestFailed("success response is missing the address payload".to_string())
            })?;

        if bind_to_session {
            self.session.bind(email.clone());
        }

        Ok(Some(email))
    }

    /// Perform one HTTP request against the service and return the body.
    ///
    /// Applies the session cookie pair, the browser-mimicking headers for
    /// the given call kind, and the status mapping: 401 → `Unauthorized`,
    /// other non-2xx → `Http`, send failures → `Transport`.
    async fn execute_request(
        &self,
        method: ApiMethod,
        path: &str,
        form: Option<&[(&str, &str)]>,
        kind: CallKind,
    ) -> Result<Vec<u8>> {
        let url = format!(
            "{}{}{}",
            self.base_url.trim_end_matches('/'),
            LOCALE_PREFIX,
            path
        );

        let mut headers = self.headers(kind)?;
        if matches!(method, ApiMethod::Get) {
            headers.remove(CONTENT_TYPE);
        }

        let response = self
            .build_request(method, &url, form)
            .headers(headers)
            .send()
            .await
            .map_err(Error::Transport)?;

        match response.status() {
            StatusCode::UNAUTHORIZED => return Err(Error::Unauthorized),
            status if !status.is_success() => return Err(Error::Http(status)),
            _ => {}
        }

        let body = response.bytes().await.map_err(|err| {
            if err.is_timeout() || err.is_connect() {
                Error::Transport(err)
            } else {
                Error::RequestFailed(format!("failed to read response body: {err}"))
            }
        })?;

        Ok(body.to_vec())
    }

    fn build_request(
        &self,
        method: ApiMethod,
        url: &str,
        form: Option<&[(&str, &str)]>,
    ) -> reqwest::RequestBuilder {
        let request = match method {
            ApiMethod::Get => self.http.get(url),
            ApiMethod::Post => self.http.post(url),
            ApiMethod::Delete => self.http.delete(url),
        };

        match form {
            Some(form) => request.form(form),
            None => request,
        }
    }

    /// Construct the request headers for the given call kind.
    ///
    /// JSON-API calls advertise a JSON `Accept` plus the form content type;
    /// content calls advertise a browser HTML `Accept`. Both carry the
    /// session cookie pair and the XHR marker the service sniffs for.
    fn headers(&self, kind: CallKind) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        match kind {
            CallKind::Api => {
                headers.insert(
                    ACCEPT,
                    HeaderValue::from_static("application/json, text/javascript, */*; q=0.01"),
                );
                headers.insert(
                    CONTENT_TYPE,
                    HeaderValue::from_static("application/x-www-form-urlencoded; charset=UTF-8"),
                );
            }
            CallKind::Content => {
                headers.insert(
                    ACCEPT,
                    HeaderValue::from_static(
                        "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,\
                         image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7",
                    ),
                );
            }
        }

        if let Ok(value) = HeaderValue::from_str(&self.user_agent) {
            headers.insert(USER_AGENT, value);
        }
        headers.insert(
            "X-Requested-With",
            HeaderValue::from_static("XMLHttpRequest"),
        );

        let cookie = HeaderValue::from_str(&self.session.cookie_header())
            .map_err(|err| Error::RequestFailed(format!("invalid cookie value: {err}")))?;
        headers.insert(COOKIE, cookie);

        Ok(headers)
    }
}

/// Heuristic filter for clean-looking addresses.
///
/// The address must carry the provider marker, and its local part may have
/// at most `max_dots + 2` dot-separated segments.
fn is_clean_address(email: &str, max_dots: usize) -> bool {
    if !email.contains(PROVIDER_MARKER) {
        return false;
    }
    let local_part = email.split('@').next().unwrap_or(email);
    local_part.split('.').count() <= max_dots + 2
}

fn decode_json<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|err| {
        let snippet: String = String::from_utf8_lossy(body).chars().take(200).collect();
        Error::RequestFailed(format!("invalid JSON response: {err} (body snippet: {snippet})"))
    })
}

const BASE_URL: &str = "https://22.do";
const LOCALE_PREFIX: &str = "/zh";
const MAILBOX_TYPE: &str = "Gmail";
const PROVIDER_MARKER: &str = "gmail";
const USER_AGENT_VALUE: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                                (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Builder for configuring a 22.do [`Client`].
///
/// Start with [`Client::builder`] to override defaults, then call
/// [`ClientBuilder::build`] to construct the client.
///
/// # Defaults
/// - No proxy
/// - `danger_accept_invalid_certs = true` (convenient for interception/testing)
/// - A browser-like user agent
/// - The default 22.do base URL
/// - A 5 second request timeout
/// - No pre-bound mailbox
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    proxy: Option<String>,
    danger_accept_invalid_certs: bool,
    user_agent: String,
    base_url: String,
    timeout: Duration,
    mailbox: Option<String>,
}

#[derive(Copy, Clone, Debug)]
enum ApiMethod {
    Get,
    Post,
    Delete,
}

#[derive(Copy, Clone, Debug)]
enum CallKind {
    /// JSON API call (mailbox generate/change/check).
    Api,
    /// Raw HTML content call.
    Content,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    ///
    /// See [`ClientBuilder`] for the list of defaults.
    pub fn new() -> Self {
        Self {
            proxy: None,
            danger_accept_invalid_certs: true,
            user_agent: USER_AGENT_VALUE.to_string(),
            base_url: BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            mailbox: None,
        }
    }

    /// Set a forward proxy URL (e.g. `"http://127.0.0.1:8080"`).
    ///
    /// The proxy is applied to all requests performed by the underlying
    /// `reqwest::Client`. SOCKS URLs are supported as well.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Configure whether to accept invalid TLS certificates (default: `true`).
    ///
    /// Set this to `false` for stricter TLS verification.
    ///
    /// # Security
    /// Accepting invalid certificates is unsafe on untrusted networks; it is
    /// primarily useful for debugging or traffic inspection in controlled
    /// environments.
    pub fn danger_accept_invalid_certs(mut self, value: bool) -> Self {
        self.danger_accept_invalid_certs = value;
        self
    }

    /// Override the default user agent string.
    ///
    /// The service sniffs for browser-like clients; the default is a common
    /// desktop browser value.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Override the 22.do base URL.
    ///
    /// This is primarily useful for testing.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout applied to all operations (default: 5 s).
    ///
    /// Kept short so that retry and polling loops stay responsive.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Pre-bind a previously issued mailbox address to the fresh session.
    ///
    /// Allows resuming a mailbox across client instances without calling
    /// [`Client::generate_mailbox`] first.
    pub fn mailbox(mut self, mailbox: impl Into<String>) -> Self {
        self.mailbox = Some(mailbox.into());
        self
    }

    /// Build the [`Client`].
    ///
    /// Generates a fresh session token locally; no network request is made.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed (e.g. an
    /// invalid proxy URL).
    ///
    /// # Examples
    /// ```
    /// # use tempmail22_client::Client;
    /// # fn main() -> Result<(), tempmail22_client::Error> {
    /// let client = Client::builder()
    ///     .danger_accept_invalid_certs(false)
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<Client> {
        let mut builder = reqwest::Client::builder()
            .danger_accept_invalid_certs(self.danger_accept_invalid_certs)
            .timeout(self.timeout);

        if let Some(proxy_url) = &self.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|err| Error::RequestFailed(format!("invalid proxy URL: {err}")))?;
            builder = builder.proxy(proxy);
        }

        let http = builder
            .build()
            .map_err(|err| Error::RequestFailed(format!("failed to build HTTP client: {err}")))?;

        let mut session = Session::new();
        if let Some(mailbox) = self.mailbox {
            session.bind(mailbox);
        }

        Ok(Client {
            http,
            session,
            proxy: self.proxy,
            user_agent: self.user_agent,
            base_url: self.base_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::{DELETE, GET, POST};
    use httpmock::MockServer;
    use serde_json::json;

    fn test_client(server: &MockServer) -> Client {
        Client::builder()
            .base_url(server.base_url())
            .build()
            .expect("test client build failed")
    }

    #[tokio::test]
    async fn generate_binds_address_when_requested() {
        let server = MockServer::start();
        let generate_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/zh/mailbox/generate")
                .body("type=Gmail");
            then.status(200).json_body(json!({
                "action": "OK",
                "data": { "address": { "email": "a.b@gmail.com" } }
            }));
        });

        let mut client = test_client(&server);
        let email = client.generate_mailbox(true).await.unwrap();

        assert_eq!(email.as_deref(), Some("a.b@gmail.com"));
        assert_eq!(client.current_mailbox(), Some("a.b@gmail.com"));
        generate_mock.assert();
    }

    #[tokio::test]
    async fn generate_leaves_session_alone_without_bind() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/zh/mailbox/generate");
            then.status(200).json_body(json!({
                "action": "OK",
                "data": { "address": { "email": "a.b@gmail.com" } }
            }));
        });

        let mut client = test_client(&server);
        let email = client.generate_mailbox(false).await.unwrap();

        assert_eq!(email.as_deref(), Some("a.b@gmail.com"));
        assert_eq!(client.current_mailbox(), None);
    }

    #[tokio::test]
    async fn generate_non_success_marker_returns_none() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/zh/mailbox/generate");
            then.status(200).json_body(json!({ "action": "FAILED" }));
        });

        let mut client = test_client(&server);
        let email = client.generate_mailbox(true).await.unwrap();

        assert_eq!(email, None);
        assert_eq!(client.current_mailbox(), None);
    }

    #[tokio::test]
    async fn generate_success_without_payload_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/zh/mailbox/generate");
            then.status(200).json_body(json!({ "action": "OK" }));
        });

        let mut client = test_client(&server);
        let result = client.generate_mailbox(true).await;

        assert!(matches!(result, Err(Error::RequestFailed(_))));
        assert_eq!(client.current_mailbox(), None);
    }

    #[tokio::test]
    async fn subsequent_requests_carry_the_bound_mailbox_cookie() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/zh/mailbox/generate");
            then.status(200).json_body(json!({
                "action": "OK",
                "data": { "address": { "email": "a.b@gmail.com" } }
            }));
        });

        let mut client = test_client(&server);
        client.generate_mailbox(true).await.unwrap();

        let expected_cookie = format!(
            "PHPSESSID={}; mail=a.b@gmail.com",
            client.session().token()
        );
        let check_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/zh/mailbox/check")
                .header("Cookie", expected_cookie.clone())
                .header("X-Requested-With", "XMLHttpRequest");
            then.status(200).json_body(json!({
                "action": "OK",
                "Msg": [
                    { "mailId": "m1", "from": "x@y.com", "subject": "hi", "time": "2s" }
                ]
            }));
        });

        let messages = client.check_new_messages().await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].mail_id, "m1");
        assert_eq!(messages[0].from, "x@y.com");
        assert_eq!(messages[0].subject, "hi");
        assert_eq!(messages[0].received_ago, "2s");
        check_mock.assert();
    }

    #[tokio::test]
    async fn filtered_generation_accepts_a_clean_address() {
        let server = MockServer::start();
        let generate_mock = server.mock(|when, then| {
            when.method(POST).path("/zh/mailbox/generate");
            then.status(200).json_body(json!({
                "action": "OK",
                "data": { "address": { "email": "tidy.name@gmail.com" } }
            }));
        });

        let mut client = test_client(&server);
        let email = client.generate_filtered_mailbox(2, 5).await.unwrap();

        assert_eq!(email.as_deref(), Some("tidy.name@gmail.com"));
        generate_mock.assert_hits(1);
    }

    #[tokio::test]
    async fn filtered_generation_rejects_dotted_local_parts() {
        let server = MockServer::start();
        let generate_mock = server.mock(|when, then| {
            when.method(POST).path("/zh/mailbox/generate");
            then.status(200).json_body(json!({
                "action": "OK",
                "data": { "address": { "email": "a.b.c.d.e@gmail.com" } }
            }));
        });

        let mut client = test_client(&server);
        // local part has 5 dot segments, above the max_dots + 2 = 4 bound
        let email = client.generate_filtered_mailbox(2, 3).await.unwrap();

        assert_eq!(email, None);
        generate_mock.assert_hits(3);
        // every attempt binds, so the last rejected address sticks
        assert_eq!(client.current_mailbox(), Some("a.b.c.d.e@gmail.com"));
    }

    #[tokio::test]
    async fn filtered_generation_rejects_foreign_providers() {
        let server = MockServer::start();
        let generate_mock = server.mock(|when, then| {
            when.method(POST).path("/zh/mailbox/generate");
            then.status(200).json_body(json!({
                "action": "OK",
                "data": { "address": { "email": "user@outlook.com" } }
            }));
        });

        let mut client = test_client(&server);
        let email = client.generate_filtered_mailbox(2, 2).await.unwrap();

        assert_eq!(email, None);
        generate_mock.assert_hits(2);
    }

    #[tokio::test]
    async fn change_follows_the_same_marker_contract() {
        let server = MockServer::start();
        let change_mock = server.mock(|when, then| {
            when.method(POST).path("/zh/mailbox/change");
            then.status(200).json_body(json!({
                "action": "OK",
                "data": { "address": { "email": "fresh@gmail.com" } }
            }));
        });

        let mut client = test_client(&server);
        let email = client.change_mailbox(true).await.unwrap();

        assert_eq!(email.as_deref(), Some("fresh@gmail.com"));
        assert_eq!(client.current_mailbox(), Some("fresh@gmail.com"));
        change_mock.assert();
    }

    #[tokio::test]
    async fn change_non_success_marker_returns_none() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/zh/mailbox/change");
            then.status(200).json_body(json!({ "action": "NO" }));
        });

        let mut client = Client::builder()
            .base_url(server.base_url())
            .mailbox("old@gmail.com")
            .build()
            .unwrap();
        let email = client.change_mailbox(true).await.unwrap();

        assert_eq!(email, None);
        assert_eq!(client.current_mailbox(), Some("old@gmail.com"));
    }

    #[tokio::test]
    async fn check_requires_a_bound_mailbox() {
        let server = MockServer::start();
        let check_mock = server.mock(|when, then| {
            when.method(GET).path("/zh/mailbox/check");
            then.status(200).json_body(json!({ "action": "OK" }));
        });

        let client = test_client(&server);
        let result = client.check_new_messages().await;

        assert!(matches!(result, Err(Error::MailboxNotBound)));
        check_mock.assert_hits(0);
    }

    #[tokio::test]
    async fn check_with_missing_list_is_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/zh/mailbox/check");
            then.status(200).json_body(json!({ "action": "OK" }));
        });

        let client = Client::builder()
            .base_url(server.base_url())
            .mailbox("bound@gmail.com")
            .build()
            .unwrap();

        let messages = client.check_new_messages().await.unwrap();
        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn check_non_success_marker_is_empty_not_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/zh/mailbox/check");
            then.status(200).json_body(json!({ "action": "NO" }));
        });

        let client = Client::builder()
            .base_url(server.base_url())
            .mailbox("bound@gmail.com")
            .build()
            .unwrap();

        let messages = client.check_new_messages().await.unwrap();
        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn unauthorized_status_maps_to_dedicated_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/zh/mailbox/generate");
            then.status(401).body("expired");
        });

        let mut client = test_client(&server);
        let result = client.generate_mailbox(true).await;

        assert!(matches!(result, Err(Error::Unauthorized)));
    }

    #[tokio::test]
    async fn server_error_maps_to_http_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/zh/mailbox/check");
            then.status(500).body("boom");
        });

        let client = Client::builder()
            .base_url(server.base_url())
            .mailbox("bound@gmail.com")
            .build()
            .unwrap();
        let result = client.check_new_messages().await;

        assert!(
            matches!(result, Err(Error::Http(status)) if status == StatusCode::INTERNAL_SERVER_ERROR)
        );
    }

    #[tokio::test]
    async fn connection_failure_maps_to_transport_error() {
        // nothing listens on port 1
        let mut client = Client::builder()
            .base_url("http://127.0.0.1:1")
            .build()
            .unwrap();

        let result = client.generate_mailbox(true).await;
        assert!(matches!(result, Err(Error::Transport(_))));
    }

    #[tokio::test]
    async fn request_timeout_maps_to_transport_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/zh/mailbox/generate");
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body(json!({
                    "action": "OK",
                    "data": { "address": { "email": "a@gmail.com" } }
                }));
        });

        let mut client = Client::builder()
            .base_url(server.base_url())
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();

        let result = client.generate_mailbox(true).await;
        assert!(matches!(result, Err(Error::Transport(_))));
    }

    #[tokio::test]
    async fn fetch_content_returns_the_raw_body() {
        let server = MockServer::start();
        let content_mock = server.mock(|when, then| {
            when.method(GET).path("/zh/content/m1/html");
            then.status(200).body("<html><body>hello</body></html>");
        });

        let client = test_client(&server);
        let html = client.fetch_content("m1").await.unwrap();

        assert_eq!(html, "<html><body>hello</body></html>");
        content_mock.assert();
    }

    #[tokio::test]
    async fn fetch_content_maps_unauthorized() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/zh/content/m1/html");
            then.status(401);
        });

        let client = test_client(&server);
        let result = client.fetch_content("m1").await;

        assert!(matches!(result, Err(Error::Unauthorized)));
    }

    #[tokio::test]
    async fn transport_dispatches_delete_requests() {
        let server = MockServer::start();
        let delete_mock = server.mock(|when, then| {
            when.method(DELETE).path("/zh/mailbox/remove");
            then.status(200).body("ok");
        });

        let client = test_client(&server);
        let body = client
            .execute_request(ApiMethod::Delete, "/mailbox/remove", None, CallKind::Api)
            .await
            .unwrap();

        assert_eq!(body, b"ok");
        delete_mock.assert();
    }

    #[test]
    fn clean_address_filter_bounds_local_part_segments() {
        // max_dots = 2 allows at most 4 local-part segments
        assert!(is_clean_address("a.b@gmail.com", 2));
        assert!(is_clean_address("a.b.c.d@gmail.com", 2));
        assert!(!is_clean_address("a.b.c.d.e@gmail.com", 2));
        assert!(!is_clean_address("plain@outlook.com", 2));
    }
}
