//! Wire models for the 22.do JSON API.

use serde::Deserialize;

/// Marker value the service uses to signal business-level success.
pub(crate) const ACTION_OK: &str = "OK";

/// An inbox message summary returned by the mailbox check endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    /// Opaque message id, used to fetch the message body.
    #[serde(rename = "mailId")]
    pub mail_id: String,
    /// Sender display string, e.g. `Some Name <user@host>`.
    pub from: String,
    /// Subject line.
    pub subject: String,
    /// Service-supplied relative reception time (localized text).
    #[serde(rename = "time")]
    pub received_ago: String,
}

/// Envelope returned by the mailbox generate/change endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct MailboxEnvelope {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub data: Option<MailboxData>,
}

impl MailboxEnvelope {
    pub fn is_ok(&self) -> bool {
        self.action.as_deref() == Some(ACTION_OK)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MailboxData {
    pub address: MailboxAddress,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MailboxAddress {
    pub email: String,
}

/// Envelope returned by the mailbox check endpoint.
///
/// The service omits `Msg` entirely on an empty inbox, so the list is
/// optional at the wire level.
#[derive(Debug, Deserialize)]
pub(crate) struct CheckEnvelope {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(rename = "Msg", default)]
    pub messages: Option<Vec<Message>>,
}

impl CheckEnvelope {
    pub fn is_ok(&self) -> bool {
        self.action.as_deref() == Some(ACTION_OK)
    }
}
