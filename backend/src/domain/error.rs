//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses, WebSocket frames, or any other protocol-specific envelope.
//! The set of codes is closed: collaborator failures that do not fit one of
//! the classified kinds are logged by the service and surfaced as
//! [`ErrorCode::Internal`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// An identifier is malformed or out of range.
    InvalidId,
    /// A request argument fails validation.
    InvalidArgument,
    /// The referenced user does not exist in the directory.
    UserNotFound,
    /// The referenced comment does not exist.
    CommentNotFound,
    /// The caller is not the author of the comment.
    Unauthorized,
    /// The request was cancelled or its deadline elapsed.
    Cancelled,
    /// An unexpected failure occurred; details are withheld from callers.
    Internal,
}

impl ErrorCode {
    /// Wire representation of the code.
    ///
    /// # Examples
    /// ```
    /// use post_comments::domain::ErrorCode;
    ///
    /// assert_eq!(ErrorCode::CommentNotFound.as_str(), "comment_not_found");
    /// ```
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_id",
            Self::InvalidArgument => "invalid_argument",
            Self::UserNotFound => "user_not_found",
            Self::CommentNotFound => "comment_not_found",
            Self::Unauthorized => "unauthorized",
            Self::Cancelled => "cancelled",
            Self::Internal => "internal",
        }
    }

    fn default_message(self) -> &'static str {
        match self {
            Self::InvalidId => "invalid identifier",
            Self::InvalidArgument => "invalid argument",
            Self::UserNotFound => "user not found",
            Self::CommentNotFound => "comment not found",
            Self::Unauthorized => "unauthorized",
            Self::Cancelled => "request cancelled",
            Self::Internal => "internal error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` is never blank; a blank message is replaced by a generic
///   description of the code.
///
/// # Examples
/// ```
/// use post_comments::domain::{Error, ErrorCode};
///
/// let err = Error::comment_not_found("comment not found");
/// assert_eq!(err.code(), ErrorCode::CommentNotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Error {
    /// Create a new error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            code.default_message().to_owned()
        } else {
            message
        };
        Self {
            code,
            message,
            details: None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary error details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidId`].
    pub fn invalid_id(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidId, message)
    }

    /// Convenience constructor for [`ErrorCode::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, message)
    }

    /// Convenience constructor for [`ErrorCode::UserNotFound`].
    pub fn user_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UserNotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::CommentNotFound`].
    pub fn comment_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CommentNotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::Cancelled`].
    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Cancelled, message)
    }

    /// Convenience constructor for [`ErrorCode::Internal`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    /// Whether the error belongs to the kinds the service passes through
    /// verbatim from its collaborators.
    pub fn is_classified(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::InvalidId
                | ErrorCode::InvalidArgument
                | ErrorCode::UserNotFound
                | ErrorCode::CommentNotFound
                | ErrorCode::Unauthorized
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}
