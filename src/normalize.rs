//! Shape-tolerant mapping from raw response JSON to typed values.
//!
//! Endpoints answer either with the payload itself or with the payload
//! wrapped as `{"data": ...}`. [`unwrap_envelope`] is the one place that
//! tells the two apart; everything else reads whitelisted keys out of the
//! result and falls back to defaults instead of failing.

use crate::constants::ENVELOPE_KEY;
use crate::models::{
    EmailRequest, EmailResponse, GroupMessageRequest, GroupMessageResponse, MessageRecord,
    MessageRequest, MessageResponse, MessageStatus, ThreadResponse,
};
use log::warn;
use serde_json::Value;

/// Strip an optional `data` envelope.
pub fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key(ENVELOPE_KEY) => {
            map.remove(ENVELOPE_KEY).unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Borrowing counterpart of [`unwrap_envelope`].
fn envelope_payload(value: &Value) -> &Value {
    match value {
        Value::Object(map) => map.get(ENVELOPE_KEY).unwrap_or(value),
        other => other,
    }
}

/// Read a scalar field as text. Numbers and booleans are stringified;
/// missing keys, `null`, arrays and objects are `None`.
fn text(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text_or_default(value: &Value, key: &str) -> String {
    text(value, key).unwrap_or_default()
}

fn strings(value: &Value, key: &str) -> Vec<String> {
    match value.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// `None` when the key is absent; unknown values degrade to `Failed`.
fn status(value: &Value, key: &str) -> Option<MessageStatus> {
    let raw = text(value, key)?;
    Some(MessageStatus::from_wire(&raw).unwrap_or_else(|| {
        warn!("unrecognized message status {raw:?}, treating as failed");
        MessageStatus::Failed
    }))
}

/// Construction of a typed value from one raw JSON object.
pub trait FromJson: Sized {
    fn from_json(value: &Value) -> Self;
}

/// Map a list payload entry by entry, preserving order. A single object is
/// treated as a one-element list, `null` as an empty one.
pub fn list<T: FromJson>(value: &Value) -> Vec<T> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter(|item| item.is_object())
            .map(T::from_json)
            .collect(),
        Value::Object(_) => vec![T::from_json(value)],
        Value::Null => Vec::new(),
        other => {
            warn!("expected a list payload, got {other}");
            Vec::new()
        }
    }
}

impl FromJson for MessageRecord {
    fn from_json(value: &Value) -> Self {
        Self {
            id: text(value, "id")
                .or_else(|| text(value, "message_id"))
                .unwrap_or_default(),
            thread_id: text_or_default(value, "thread_id"),
            content: text(value, "content")
                .or_else(|| text(value, "body"))
                .unwrap_or_default(),
            sender_number: text_or_default(value, "sender_number"),
            sender_name: text_or_default(value, "sender_name"),
            service: text_or_default(value, "service"),
            status: status(value, "status"),
            timestamp: text(value, "timestamp")
                .or_else(|| text(value, "created_at"))
                .unwrap_or_default(),
        }
    }
}

impl FromJson for ThreadResponse {
    fn from_json(value: &Value) -> Self {
        Self {
            id: text(value, "id")
                .or_else(|| text(value, "thread_id"))
                .unwrap_or_default(),
            thread_type: text_or_default(value, "type"),
            participants: strings(value, "participants"),
            created_at: text_or_default(value, "created_at"),
            updated_at: text_or_default(value, "updated_at"),
            messages: value
                .get("messages")
                .map(list::<MessageRecord>)
                .unwrap_or_default(),
        }
    }
}

/// Takes the raw body: a note may sit beside the `data` envelope rather than
/// inside it.
pub(crate) fn message_response(raw: &Value, request: &MessageRequest) -> MessageResponse {
    let payload = envelope_payload(raw);
    let note = text(payload, "message").or_else(|| text(raw, "message"));
    match (text(payload, "to"), text(payload, "from"), text(payload, "body")) {
        (Some(to), Some(from), Some(body)) => MessageResponse {
            to,
            from,
            body,
            status: status(payload, "status").unwrap_or_default(),
            message: note,
        },
        _ => {
            warn!("send response lacks to/from/body, reporting message to {} as failed", request.to);
            MessageResponse {
                to: request.to.clone(),
                from: request.from.clone(),
                body: request.content.clone(),
                status: MessageStatus::Failed,
                message: Some(
                    note.unwrap_or_else(|| "response did not describe the sent message".into()),
                ),
            }
        }
    }
}

pub(crate) fn group_message_response(
    payload: &Value,
    request: &GroupMessageRequest,
) -> GroupMessageResponse {
    match (text(payload, "thread_id"), text(payload, "body")) {
        (Some(thread_id), Some(body)) => GroupMessageResponse {
            thread_id,
            body,
            status: status(payload, "status").unwrap_or_default(),
        },
        _ => {
            warn!(
                "group send response lacks thread_id/body, reporting message to thread {} as failed",
                request.thread_id
            );
            GroupMessageResponse {
                thread_id: request.thread_id.clone(),
                body: request.content.clone(),
                status: MessageStatus::Failed,
            }
        }
    }
}

pub(crate) fn email_response(payload: &Value, request: &EmailRequest) -> EmailResponse {
    EmailResponse {
        to: text(payload, "to").unwrap_or_else(|| request.recipient_address.clone()),
        from: text(payload, "from").unwrap_or_else(|| request.sender_address.clone()),
        subject: text(payload, "subject").unwrap_or_else(|| request.subject.clone()),
        body: text(payload, "body").unwrap_or_else(|| request.body.clone()),
        status: status(payload, "status").unwrap_or_default(),
    }
}
