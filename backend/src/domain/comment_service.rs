//! Comment domain service.
//!
//! Implements the [`CommentCommand`] and [`CommentQuery`] driving ports on top
//! of the storage and directory ports. Each operation validates its input,
//! authorises mutations against the *stored* comment, and classifies
//! collaborator failures into the closed error taxonomy. Failures outside the
//! taxonomy are logged under the operation name and replaced by a generic
//! internal error so collaborator details never reach callers.

use std::fmt::Display;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{Span, error};

use crate::domain::ports::{
    CommentCommand, CommentCreator, CommentDeleter, CommentProvider, CommentQuery,
    CommentRepositoryError, CommentUpdater, CreateCommentRequest, DeleteCommentRequest,
    UpdateCommentRequest, UserDirectoryError, UserProvider,
};
use crate::domain::{
    Comment, CommentBody, CommentId, CommentPage, Error, Filter, PostId, RequestContext, UserId,
};

const OP_CREATE: &str = "service.comment.create";
const OP_UPDATE: &str = "service.comment.update";
const OP_DELETE: &str = "service.comment.delete";
const OP_GET_BY_ID: &str = "service.comment.get_by_id";
const OP_LIST_BY_POST_ID: &str = "service.comment.list_by_post_id";

const INTERNAL_MESSAGE: &str = "internal error";

/// Parameter object bundling the ports the service depends on.
#[derive(Clone)]
pub struct CommentServicePorts {
    /// Reads single comments and post pages.
    pub provider: Arc<dyn CommentProvider>,
    /// Persists new comments.
    pub creator: Arc<dyn CommentCreator>,
    /// Persists edited comments.
    pub updater: Arc<dyn CommentUpdater>,
    /// Removes comments.
    pub deleter: Arc<dyn CommentDeleter>,
    /// Resolves author snapshots.
    pub users: Arc<dyn UserProvider>,
}

/// Stateless comment service; safe to share across tasks.
#[derive(Clone)]
pub struct CommentService {
    ports: CommentServicePorts,
    clock: Arc<dyn Clock>,
    log: Span,
}

impl CommentService {
    /// Create a service logging under a `comment_service` span.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use post_comments::domain::ports::{FixtureCommentRepository, FixtureUserProvider};
    /// use post_comments::domain::{CommentService, CommentServicePorts};
    ///
    /// let store = Arc::new(FixtureCommentRepository);
    /// let service = CommentService::new(
    ///     CommentServicePorts {
    ///         provider: store.clone(),
    ///         creator: store.clone(),
    ///         updater: store.clone(),
    ///         deleter: store,
    ///         users: Arc::new(FixtureUserProvider),
    ///     },
    ///     Arc::new(DefaultClock),
    /// );
    /// # drop(service);
    /// ```
    pub fn new(ports: CommentServicePorts, clock: Arc<dyn Clock>) -> Self {
        Self::with_log_span(ports, clock, tracing::info_span!("comment_service"))
    }

    /// Create a service that records internal failures under `log`.
    pub fn with_log_span(ports: CommentServicePorts, clock: Arc<dyn Clock>, log: Span) -> Self {
        Self { ports, clock, log }
    }

    fn parse_body(body: String) -> Result<CommentBody, Error> {
        CommentBody::new(body).map_err(|err| Error::invalid_argument(err.to_string()))
    }

    fn internal(&self, op: &'static str, cause: &dyn Display) -> Error {
        error!(parent: &self.log, op, error = %cause, "comment operation failed");
        Error::internal(INTERNAL_MESSAGE)
    }

    fn map_repository_error(&self, op: &'static str, err: CommentRepositoryError) -> Error {
        match err {
            CommentRepositoryError::NotFound { comment_id } => {
                Error::comment_not_found(format!("comment {comment_id} not found"))
            }
            CommentRepositoryError::InvalidId { message } => Error::invalid_id(message),
            CommentRepositoryError::InvalidArgument { message } => Error::invalid_argument(message),
            CommentRepositoryError::Unauthorized { message } => Error::unauthorized(message),
            other @ (CommentRepositoryError::Connection { .. }
            | CommentRepositoryError::Query { .. }) => self.internal(op, &other),
        }
    }

    fn map_directory_error(&self, op: &'static str, err: UserDirectoryError) -> Error {
        match err {
            UserDirectoryError::NotFound { user_id } => {
                Error::user_not_found(format!("user {user_id} not found"))
            }
            UserDirectoryError::InvalidId { message } => Error::invalid_id(message),
            other @ (UserDirectoryError::Connection { .. } | UserDirectoryError::Query { .. }) => {
                self.internal(op, &other)
            }
        }
    }

    async fn fetch(
        &self,
        ctx: &RequestContext,
        op: &'static str,
        comment_id: &CommentId,
    ) -> Result<Comment, Error> {
        ctx.run(self.ports.provider.get_comment(comment_id))
            .await?
            .map_err(|err| self.map_repository_error(op, err))
    }

    async fn fetch_authored(
        &self,
        ctx: &RequestContext,
        op: &'static str,
        comment_id: &CommentId,
        user_id: UserId,
    ) -> Result<Comment, Error> {
        let existing = self.fetch(ctx, op, comment_id).await?;
        if !existing.is_authored_by(user_id) {
            return Err(Error::unauthorized(
                "only the author may modify this comment",
            ));
        }
        Ok(existing)
    }
}

#[async_trait]
impl CommentCommand for CommentService {
    async fn create(
        &self,
        ctx: &RequestContext,
        request: CreateCommentRequest,
    ) -> Result<Comment, Error> {
        let CreateCommentRequest {
            user_id,
            post_id,
            body,
        } = request;
        let body = Self::parse_body(body)?;

        let user = ctx
            .run(self.ports.users.get_user(user_id))
            .await?
            .map_err(|err| self.map_directory_error(OP_CREATE, err))?;

        let comment = Comment::new(CommentId::generate(), post_id, user, body, self.clock.utc());
        ctx.run(self.ports.creator.create_comment(comment))
            .await?
            .map_err(|err| self.map_repository_error(OP_CREATE, err))
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        request: UpdateCommentRequest,
    ) -> Result<Comment, Error> {
        let UpdateCommentRequest {
            comment_id,
            user_id,
            body,
        } = request;
        let body = Self::parse_body(body)?;

        let existing = self
            .fetch_authored(ctx, OP_UPDATE, &comment_id, user_id)
            .await?;
        let edited = existing.with_body(body, self.clock.utc());
        ctx.run(self.ports.updater.update_comment(edited))
            .await?
            .map_err(|err| self.map_repository_error(OP_UPDATE, err))
    }

    async fn delete(
        &self,
        ctx: &RequestContext,
        request: DeleteCommentRequest,
    ) -> Result<Comment, Error> {
        let DeleteCommentRequest {
            comment_id,
            user_id,
        } = request;

        let existing = self
            .fetch_authored(ctx, OP_DELETE, &comment_id, user_id)
            .await?;
        ctx.run(self.ports.deleter.delete_comment(&comment_id))
            .await?
            .map_err(|err| self.map_repository_error(OP_DELETE, err))?;
        Ok(existing)
    }
}

#[async_trait]
impl CommentQuery for CommentService {
    async fn get_by_id(
        &self,
        ctx: &RequestContext,
        comment_id: &CommentId,
    ) -> Result<Comment, Error> {
        self.fetch(ctx, OP_GET_BY_ID, comment_id).await
    }

    async fn list_by_post_id(
        &self,
        ctx: &RequestContext,
        post_id: &PostId,
        filter: &Filter,
    ) -> Result<CommentPage, Error> {
        ctx.run(self.ports.provider.list_post_comments(post_id, filter))
            .await?
            .map_err(|err| self.map_repository_error(OP_LIST_BY_POST_ID, err))
    }
}

#[cfg(test)]
#[path = "comment_service_tests.rs"]
mod tests;
