//! In-process user directory.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::ports::{UserDirectoryError, UserProvider};
use crate::domain::{User, UserId};

/// Fixed set of users resolved by identifier.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserDirectory {
    users: HashMap<UserId, User>,
}

impl InMemoryUserDirectory {
    pub fn new(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: users.into_iter().map(|user| (user.id, user)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserProvider for InMemoryUserDirectory {
    async fn get_user(&self, user_id: UserId) -> Result<User, UserDirectoryError> {
        self.users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| UserDirectoryError::not_found(user_id.get()))
    }
}
