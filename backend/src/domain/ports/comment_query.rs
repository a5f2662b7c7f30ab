//! Driving port for reading comments.

use async_trait::async_trait;

use crate::domain::{Comment, CommentId, CommentPage, Error, Filter, PostId, RequestContext};

/// Read-only access to comments for inbound adapters.
///
/// Neither method mutates state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentQuery: Send + Sync {
    /// Fetch a single comment; `comment_not_found` when absent.
    async fn get_by_id(&self, ctx: &RequestContext, comment_id: &CommentId)
    -> Result<Comment, Error>;

    /// Fetch one page of a post's comments.
    async fn list_by_post_id(
        &self,
        ctx: &RequestContext,
        post_id: &PostId,
        filter: &Filter,
    ) -> Result<CommentPage, Error>;
}
