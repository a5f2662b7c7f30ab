//! Storage ports for comments.
//!
//! Each capability is its own trait so the service depends only on what an
//! operation needs: fetch-one and fetch-page through [`CommentProvider`], and
//! the three mutations through [`CommentCreator`], [`CommentUpdater`], and
//! [`CommentDeleter`]. Adapters must give read-your-writes consistency for the
//! fetch-then-mutate sequences the service performs.

use async_trait::async_trait;

use crate::domain::{Comment, CommentId, CommentPage, Filter, PostId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by comment storage adapters.
    pub enum CommentRepositoryError {
        /// No comment exists with the requested identifier.
        NotFound { comment_id: String } => "comment not found: {comment_id}",
        /// The backend rejected an identifier as malformed.
        InvalidId { message: String } => "invalid comment identifier: {message}",
        /// The backend rejected an argument as invalid.
        InvalidArgument { message: String } => "invalid comment argument: {message}",
        /// The backend refused the mutation for the caller.
        Unauthorized { message: String } => "comment mutation not permitted: {message}",
        /// Repository connection could not be established.
        Connection { message: String } => "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "comment repository query failed: {message}",
    }
}

/// Read access to stored comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentProvider: Send + Sync {
    /// Fetch a comment by identifier.
    ///
    /// Returns [`CommentRepositoryError::NotFound`] when absent.
    async fn get_comment(&self, comment_id: &CommentId) -> Result<Comment, CommentRepositoryError>;

    /// Fetch one page of a post's comments.
    ///
    /// A post without comments yields an empty page, not an error.
    async fn list_post_comments(
        &self,
        post_id: &PostId,
        filter: &Filter,
    ) -> Result<CommentPage, CommentRepositoryError>;
}

/// Persists new comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentCreator: Send + Sync {
    /// Store `comment`, returning the stored form.
    ///
    /// Backends may normalise fields; callers must use the returned value.
    async fn create_comment(&self, comment: Comment) -> Result<Comment, CommentRepositoryError>;
}

/// Persists edits to existing comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentUpdater: Send + Sync {
    /// Replace the stored comment with `comment`, returning the stored form.
    async fn update_comment(&self, comment: Comment) -> Result<Comment, CommentRepositoryError>;
}

/// Removes comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentDeleter: Send + Sync {
    /// Hard-delete a comment.
    ///
    /// Returns [`CommentRepositoryError::NotFound`] when absent.
    async fn delete_comment(&self, comment_id: &CommentId) -> Result<(), CommentRepositoryError>;
}

/// Fixture storage that holds nothing.
///
/// Lookups report missing comments, listings are empty, and writes echo their
/// input. Use it where storage behaviour is not under test.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCommentRepository;

#[async_trait]
impl CommentProvider for FixtureCommentRepository {
    async fn get_comment(&self, comment_id: &CommentId) -> Result<Comment, CommentRepositoryError> {
        Err(CommentRepositoryError::not_found(comment_id.as_str()))
    }

    async fn list_post_comments(
        &self,
        _post_id: &PostId,
        _filter: &Filter,
    ) -> Result<CommentPage, CommentRepositoryError> {
        Ok(CommentPage {
            comments: Vec::new(),
            metadata: Default::default(),
        })
    }
}

#[async_trait]
impl CommentCreator for FixtureCommentRepository {
    async fn create_comment(&self, comment: Comment) -> Result<Comment, CommentRepositoryError> {
        Ok(comment)
    }
}

#[async_trait]
impl CommentUpdater for FixtureCommentRepository {
    async fn update_comment(&self, comment: Comment) -> Result<Comment, CommentRepositoryError> {
        Ok(comment)
    }
}

#[async_trait]
impl CommentDeleter for FixtureCommentRepository {
    async fn delete_comment(&self, comment_id: &CommentId) -> Result<(), CommentRepositoryError> {
        Err(CommentRepositoryError::not_found(comment_id.as_str()))
    }
}
