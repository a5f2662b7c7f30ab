//! Port for resolving comment authors from the user directory.
use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user directory adapters.
    pub enum UserDirectoryError {
        /// No user exists with the requested identifier.
        NotFound { user_id: i64 } => "user not found: {user_id}",
        /// The directory rejected the identifier as malformed.
        InvalidId { message: String } => "invalid user identifier: {message}",
        /// Directory connection could not be established.
        Connection { message: String } => "user directory connection failed: {message}",
        /// Lookup failed during execution.
        Query { message: String } => "user directory query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProvider: Send + Sync {
    /// Resolve a user by identifier.
    async fn get_user(&self, user_id: UserId) -> Result<User, UserDirectoryError>;
}

/// Fixture directory that resolves every identifier to a placeholder user.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserProvider;

#[async_trait]
impl UserProvider for FixtureUserProvider {
    async fn get_user(&self, user_id: UserId) -> Result<User, UserDirectoryError> {
        Ok(User::new(user_id, format!("user-{user_id}")))
    }
}
