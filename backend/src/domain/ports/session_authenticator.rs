//! Port resolving the connect-time token of a real-time session to a user.
use async_trait::async_trait;

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised while authenticating a session token.
    pub enum SessionAuthenticationError {
        /// The token is not recognised.
        UnknownToken => "session token not recognised",
        /// The authentication backend could not be reached.
        Unavailable { message: String } => "session authentication unavailable: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionAuthenticator: Send + Sync {
    /// Resolve `token` to the identity the session acts as.
    async fn authenticate(&self, token: &str) -> Result<UserId, SessionAuthenticationError>;
}
