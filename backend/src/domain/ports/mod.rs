//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (storage, directory, channel, authenticator) are implemented
//! by outbound adapters; driving ports ([`CommentCommand`], [`CommentQuery`])
//! are implemented by the domain service and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod comment_channel;
mod comment_command;
mod comment_query;
mod comment_repository;
mod session_authenticator;
mod user_provider;

#[cfg(test)]
pub use comment_channel::MockCommentChannel;
pub use comment_channel::{CommentChannel, CommentChannelError};
#[cfg(test)]
pub use comment_command::MockCommentCommand;
pub use comment_command::{
    CommentCommand, CreateCommentRequest, DeleteCommentRequest, UpdateCommentRequest,
};
#[cfg(test)]
pub use comment_query::MockCommentQuery;
pub use comment_query::CommentQuery;
#[cfg(test)]
pub use comment_repository::{
    MockCommentCreator, MockCommentDeleter, MockCommentProvider, MockCommentUpdater,
};
pub use comment_repository::{
    CommentCreator, CommentDeleter, CommentProvider, CommentRepositoryError, CommentUpdater,
    FixtureCommentRepository,
};
#[cfg(test)]
pub use session_authenticator::MockSessionAuthenticator;
pub use session_authenticator::{SessionAuthenticationError, SessionAuthenticator};
#[cfg(test)]
pub use user_provider::MockUserProvider;
pub use user_provider::{FixtureUserProvider, UserDirectoryError, UserProvider};
