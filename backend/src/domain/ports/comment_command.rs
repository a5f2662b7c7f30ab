//! Driving port for comment mutations.
//!
//! The [`CommentCommand`] trait is the inbound contract used by the real-time
//! bridge and any trusted backend caller. Requests carry raw body text; the
//! implementation validates it and checks authorship against the stored
//! comment before touching storage.

use async_trait::async_trait;

use crate::domain::{Comment, CommentId, Error, PostId, RequestContext, UserId};

/// Request to create a comment on a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCommentRequest {
    /// Author of the new comment.
    pub user_id: UserId,
    /// Post the comment belongs to.
    pub post_id: PostId,
    /// Comment content before validation.
    pub body: String,
}

/// Request to replace the body of an existing comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCommentRequest {
    pub comment_id: CommentId,
    /// Caller identity; must match the stored author.
    pub user_id: UserId,
    pub body: String,
}

/// Request to delete a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteCommentRequest {
    pub comment_id: CommentId,
    /// Caller identity; must match the stored author.
    pub user_id: UserId,
}

/// Driving port for comment mutations.
///
/// # Errors
///
/// Every method returns a domain [`Error`] whose code is one of the
/// classified kinds, `cancelled` when the context interrupts the call, or
/// `internal` for anything else.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentCommand: Send + Sync {
    /// Create a comment authored by `request.user_id`.
    async fn create(
        &self,
        ctx: &RequestContext,
        request: CreateCommentRequest,
    ) -> Result<Comment, Error>;

    /// Replace a comment's body when the caller is its author.
    async fn update(
        &self,
        ctx: &RequestContext,
        request: UpdateCommentRequest,
    ) -> Result<Comment, Error>;

    /// Delete a comment when the caller is its author.
    ///
    /// Returns the comment as it was stored, so callers can address events to
    /// the post it actually belonged to.
    async fn delete(
        &self,
        ctx: &RequestContext,
        request: DeleteCommentRequest,
    ) -> Result<Comment, Error>;
}
