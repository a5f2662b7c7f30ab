//! Static bearer-token authentication for real-time sessions.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::UserId;
use crate::domain::ports::{SessionAuthenticationError, SessionAuthenticator};

/// Authenticator over a fixed token table.
#[derive(Debug, Default, Clone)]
pub struct StaticTokenAuthenticator {
    tokens: HashMap<String, UserId>,
}

impl StaticTokenAuthenticator {
    pub fn new(tokens: impl IntoIterator<Item = (String, UserId)>) -> Self {
        Self {
            tokens: tokens.into_iter().collect(),
        }
    }
}

#[async_trait]
impl SessionAuthenticator for StaticTokenAuthenticator {
    async fn authenticate(&self, token: &str) -> Result<UserId, SessionAuthenticationError> {
        self.tokens
            .get(token)
            .copied()
            .ok_or_else(SessionAuthenticationError::unknown_token)
    }
}
