//! Request, response and webhook types exchanged with the A1Base API.

use crate::error::{Error, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub(crate) fn require(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::MissingField { field });
    }
    Ok(())
}

/// Delivery state reported for a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    #[default]
    Queued,
    Sent,
    Delivered,
    Failed,
}

impl MessageStatus {
    /// Parse a wire status, ignoring case. `None` for anything unrecognized.
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "queued" => Some(Self::Queued),
            "sent" => Some(Self::Sent),
            "delivered" => Some(Self::Delivered),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chat message to a single recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageRequest {
    /// Message text.
    pub content: String,
    /// Sending number registered with the account.
    pub from: String,
    /// Recipient number.
    pub to: String,
    /// Channel to deliver over (`whatsapp`, `telegram`, ...).
    pub service: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_uri: Option<String>,
}

impl MessageRequest {
    pub fn new(
        content: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            from: from.into(),
            to: to.into(),
            service: service.into(),
            attachment_uri: None,
        }
    }

    pub fn with_attachment(mut self, uri: impl Into<String>) -> Self {
        self.attachment_uri = Some(uri.into());
        self
    }

    /// Check every required field is non-empty, `from` and `content` first.
    pub fn validate(&self) -> Result<()> {
        require("from", &self.from)?;
        require("content", &self.content)?;
        require("to", &self.to)?;
        require("service", &self.service)
    }
}

/// A chat message posted into an existing group thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupMessageRequest {
    pub content: String,
    pub from: String,
    /// Thread the message is addressed to.
    pub thread_id: String,
    pub service: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_uri: Option<String>,
}

impl GroupMessageRequest {
    pub fn new(
        content: impl Into<String>,
        from: impl Into<String>,
        thread_id: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            from: from.into(),
            thread_id: thread_id.into(),
            service: service.into(),
            attachment_uri: None,
        }
    }

    pub fn with_attachment(mut self, uri: impl Into<String>) -> Self {
        self.attachment_uri = Some(uri.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        require("from", &self.from)?;
        require("content", &self.content)?;
        require("thread_id", &self.thread_id)?;
        require("service", &self.service)
    }
}

/// Optional addressing headers for an email.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmailHeaders {
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    #[serde(rename = "reply-to", skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

/// An email to send, or to store as a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailRequest {
    pub sender_address: String,
    pub recipient_address: String,
    pub subject: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<EmailHeaders>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_uri: Option<String>,
}

impl EmailRequest {
    pub fn new(
        sender_address: impl Into<String>,
        recipient_address: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            sender_address: sender_address.into(),
            recipient_address: recipient_address.into(),
            subject: subject.into(),
            body: body.into(),
            headers: None,
            attachment_uri: None,
        }
    }

    pub fn with_headers(mut self, headers: EmailHeaders) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn with_attachment(mut self, uri: impl Into<String>) -> Self {
        self.attachment_uri = Some(uri.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        require("sender_address", &self.sender_address)?;
        require("recipient_address", &self.recipient_address)?;
        require("subject", &self.subject)?;
        require("body", &self.body)
    }
}

/// Result of sending an individual message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub to: String,
    pub from: String,
    pub body: String,
    pub status: MessageStatus,
    /// Explanation attached by the server, or by the client when the
    /// response had to be synthesized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Result of posting into a group thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMessageResponse {
    pub thread_id: String,
    pub body: String,
    pub status: MessageStatus,
}

/// Result of sending or drafting an email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailResponse {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub body: String,
    pub status: MessageStatus,
}

/// A stored message, as returned by the history endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: String,
    pub thread_id: String,
    pub content: String,
    pub sender_number: String,
    pub sender_name: String,
    pub service: String,
    pub status: Option<MessageStatus>,
    pub timestamp: String,
}

/// A conversation and, when requested, its messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadResponse {
    pub id: String,
    /// `individual`, `group` or `broadcast`.
    #[serde(rename = "type")]
    pub thread_type: String,
    pub participants: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    pub messages: Vec<MessageRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatType {
    Individual,
    Group,
    Broadcast,
}

/// Typed view of an inbound WhatsApp webhook body.
///
/// Relaying goes through the raw JSON so the API receives exactly what
/// arrived; this type is for reading the payload on the way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhatsAppIncoming {
    pub external_thread_id: String,
    pub external_message_id: String,
    pub chat_type: ChatType,
    pub content: String,
    pub sender_name: String,
    pub sender_number: String,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(alias = "a1_account_id")]
    pub a1_account_number: String,
    /// Milliseconds since the Unix epoch, as a string.
    pub timestamp: String,
    /// Shared secret of the webhook; checked by the server, not here.
    pub secret_key: String,
}

impl WhatsAppIncoming {
    /// Wire form of a payload built in code. The account key is written as
    /// `a1_account_number`.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// The webhook timestamp as a UTC instant, if it is a valid epoch-millis value.
    pub fn received_at(&self) -> Option<DateTime<Utc>> {
        let millis: i64 = self.timestamp.trim().parse().ok()?;
        Utc.timestamp_millis_opt(millis).single()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_validation_checks_from_before_content() {
        let req = MessageRequest::new("", "", "+1", "whatsapp");
        assert!(matches!(req.validate(), Err(Error::MissingField { field: "from" })));

        let req = MessageRequest::new("  ", "+2", "+1", "whatsapp");
        assert!(matches!(req.validate(), Err(Error::MissingField { field: "content" })));

        let req = MessageRequest::new("hi", "+2", "+1", "");
        assert!(matches!(req.validate(), Err(Error::MissingField { field: "service" })));
    }

    #[test]
    fn group_validation_requires_thread() {
        let req = GroupMessageRequest::new("hi", "+2", "", "whatsapp");
        assert!(matches!(req.validate(), Err(Error::MissingField { field: "thread_id" })));
    }

    #[test]
    fn email_validation_requires_addresses() {
        let req = EmailRequest::new("a@x.com", "", "s", "b");
        assert!(matches!(
            req.validate(),
            Err(Error::MissingField { field: "recipient_address" })
        ));
    }

    #[test]
    fn message_wire_shape_keeps_from_and_drops_absent_attachment() {
        let wire = serde_json::to_value(MessageRequest::new("hi", "+2", "+1", "whatsapp")).unwrap();
        assert_eq!(
            wire,
            json!({"content": "hi", "from": "+2", "to": "+1", "service": "whatsapp"})
        );

        let wire = serde_json::to_value(
            MessageRequest::new("hi", "+2", "+1", "whatsapp").with_attachment("https://cdn/x.png"),
        )
        .unwrap();
        assert_eq!(wire["attachment_uri"], "https://cdn/x.png");
    }

    #[test]
    fn email_reply_to_uses_hyphenated_key() {
        let req = EmailRequest::new("me@x.com", "you@x.com", "Hello", "Body").with_headers(
            EmailHeaders {
                cc: vec!["cc@x.com".into()],
                bcc: vec![],
                reply_to: Some("a@x.com".into()),
            },
        );
        let wire = serde_json::to_value(&req).unwrap();
        let headers = &wire["headers"];
        assert_eq!(headers["reply-to"], "a@x.com");
        assert!(headers.get("reply_to").is_none());
        assert_eq!(headers["cc"], json!(["cc@x.com"]));
        assert_eq!(headers["bcc"], json!([]));
    }

    #[test]
    fn status_parsing_ignores_case() {
        assert_eq!(MessageStatus::from_wire("Delivered"), Some(MessageStatus::Delivered));
        assert_eq!(MessageStatus::from_wire("read"), None);
        assert_eq!(MessageStatus::Sent.to_string(), "sent");
    }

    #[test]
    fn thread_type_uses_wire_key() {
        let wire = serde_json::to_value(ThreadResponse {
            id: "t1".into(),
            thread_type: "group".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(wire["type"], "group");
    }

    #[test]
    fn webhook_accepts_account_id_alias_and_parses_timestamp() {
        let payload: WhatsAppIncoming = serde_json::from_value(json!({
            "external_thread_id": "th-1",
            "external_message_id": "m-1",
            "chat_type": "group",
            "content": "hello",
            "sender_name": "Ada",
            "sender_number": "+15550001",
            "participants": ["+15550001", "+15550002"],
            "a1_account_id": "acc-9",
            "timestamp": "1700000000000",
            "secret_key": "s3cret"
        }))
        .unwrap();
        assert_eq!(payload.a1_account_number, "acc-9");
        assert_eq!(payload.chat_type, ChatType::Group);
        assert_eq!(payload.received_at().unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn webhook_bad_timestamp_has_no_instant() {
        let payload: WhatsAppIncoming = serde_json::from_value(json!({
            "external_thread_id": "th-1",
            "external_message_id": "m-1",
            "chat_type": "individual",
            "content": "hello",
            "sender_name": "Ada",
            "sender_number": "+15550001",
            "a1_account_number": "acc-9",
            "timestamp": "yesterday",
            "secret_key": "s3cret"
        }))
        .unwrap();
        assert!(payload.participants.is_empty());
        assert!(payload.received_at().is_none());
    }
}
