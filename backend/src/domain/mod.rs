//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the comment model, the closed error taxonomy, and the
//! comment service that orchestrates storage and directory ports. Nothing in
//! this module knows about HTTP, WebSockets, or a particular storage engine.
//!
//! Public surface:
//! - [`Comment`], [`CommentId`], [`PostId`], [`CommentBody`]: the aggregate
//!   and its value objects.
//! - [`User`], [`UserId`]: author snapshot embedded in comments.
//! - [`Filter`], [`CommentPage`], [`PaginationMetadata`]: listing inputs and
//!   outputs.
//! - [`Error`], [`ErrorCode`]: the error taxonomy surfaced to callers.
//! - [`RequestContext`]: cancellation and deadlines for one request.
//! - [`CommentEvent`], [`ChannelName`]: events fanned out after mutations.
//! - [`CommentService`]: implementation of the driving ports.

pub mod comment;
pub mod comment_events;
pub mod comment_service;
pub mod context;
pub mod error;
pub mod filter;
pub mod ports;
pub mod user;

pub use self::comment::{
    Comment, CommentBody, CommentId, CommentValidationError, MAX_BODY_LENGTH, MAX_ID_LENGTH,
    PostId,
};
pub use self::comment_events::{ChannelName, CommentEvent};
pub use self::comment_service::{CommentService, CommentServicePorts};
pub use self::context::{CancelHandle, Interrupted, RequestContext};
pub use self::error::{Error, ErrorCode};
pub use self::filter::{
    CommentPage, Filter, PageRequest, PageRequestError, PaginationMetadata, SortOrder,
};
pub use self::user::{User, UserId, UserIdValidationError};
