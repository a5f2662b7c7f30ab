//! Wire-level message definitions for the real-time comment protocol.
//!
//! Every frame is a JSON envelope `{ "type": ..., "payload": {...} }`.
//! Inbound types form a closed set; decoding reports unrecognised types as
//! [`Decoded::Unknown`] so the session can log and drop them. Outbound
//! messages are built from domain events after a successful service call,
//! or from a domain error for a reply to the requester alone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::{Comment, CommentBody, CommentEvent, CommentId, Error, ErrorCode};

const CREATE_COMMENT: &str = "create_comment";
const UPDATE_COMMENT: &str = "update_comment";
const DELETE_COMMENT: &str = "delete_comment";

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Value,
}

/// Payload of a `create_comment` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCommentPayload {
    pub post_id: String,
    pub body: String,
}

/// Payload of an `update_comment` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCommentPayload {
    pub comment_id: String,
    pub body: String,
}

/// Payload of a `delete_comment` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteCommentPayload {
    pub comment_id: String,
}

/// Client-originated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    CreateComment(CreateCommentPayload),
    UpdateComment(UpdateCommentPayload),
    DeleteComment(DeleteCommentPayload),
}

impl InboundMessage {
    /// Envelope type of the request.
    pub fn request_type(&self) -> &'static str {
        match self {
            Self::CreateComment(_) => CREATE_COMMENT,
            Self::UpdateComment(_) => UPDATE_COMMENT,
            Self::DeleteComment(_) => DELETE_COMMENT,
        }
    }
}

/// Result of decoding an inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Known(InboundMessage),
    /// The envelope was well formed but its type is not part of the protocol.
    Unknown(String),
}

/// Reasons an inbound frame could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The frame is not a JSON object with a string `type`.
    #[error("frame is not a message envelope: {0}")]
    Envelope(#[source] serde_json::Error),
    /// The type is known but its payload does not match.
    #[error("invalid {request_type} payload: {source}")]
    Payload {
        request_type: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

fn payload<T: serde::de::DeserializeOwned>(
    request_type: &'static str,
    value: Value,
) -> Result<T, DecodeError> {
    serde_json::from_value(value).map_err(|source| DecodeError::Payload {
        request_type,
        source,
    })
}

/// Decode one text frame.
///
/// # Examples
/// ```
/// use post_comments::inbound::ws::messages::{Decoded, InboundMessage, decode};
///
/// let frame = r#"{"type":"delete_comment","payload":{"comment_id":"C1"}}"#;
/// let decoded = decode(frame).expect("valid frame");
/// assert!(matches!(decoded, Decoded::Known(InboundMessage::DeleteComment(_))));
/// ```
pub fn decode(text: &str) -> Result<Decoded, DecodeError> {
    let RawEnvelope { kind, payload: body } =
        serde_json::from_str(text).map_err(DecodeError::Envelope)?;
    let message = match kind.as_str() {
        CREATE_COMMENT => InboundMessage::CreateComment(payload(CREATE_COMMENT, body)?),
        UPDATE_COMMENT => InboundMessage::UpdateComment(payload(UPDATE_COMMENT, body)?),
        DELETE_COMMENT => InboundMessage::DeleteComment(payload(DELETE_COMMENT, body)?),
        _ => return Ok(Decoded::Unknown(kind)),
    };
    Ok(Decoded::Known(message))
}

/// Payload of an `edit_comment` broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditCommentPayload {
    pub id: CommentId,
    pub body: CommentBody,
    pub updated_at: DateTime<Utc>,
}

/// Payload of a `remove_comment` broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveCommentPayload {
    pub comment_id: CommentId,
}

/// Payload of an `error` reply sent to the requester only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_type: Option<String>,
}

/// Server-originated message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum OutboundMessage {
    NewComment(Comment),
    EditComment(EditCommentPayload),
    RemoveComment(RemoveCommentPayload),
    Error(ErrorPayload),
}

impl OutboundMessage {
    /// Reply describing a failed request.
    pub fn error(error: &Error, request_type: Option<&str>) -> Self {
        Self::Error(ErrorPayload {
            code: error.code(),
            message: error.message().to_owned(),
            request_type: request_type.map(str::to_owned),
        })
    }
}

impl From<CommentEvent> for OutboundMessage {
    fn from(value: CommentEvent) -> Self {
        match value {
            CommentEvent::Created(comment) => Self::NewComment(comment),
            CommentEvent::Edited(comment) => Self::EditComment(EditCommentPayload {
                id: comment.id,
                body: comment.body,
                updated_at: comment.updated_at,
            }),
            CommentEvent::Removed { comment_id, .. } => {
                Self::RemoveComment(RemoveCommentPayload { comment_id })
            }
        }
    }
}
