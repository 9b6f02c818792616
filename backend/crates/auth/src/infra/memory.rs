//! In-Memory Repository Implementation
//!
//! Backs the use-case tests; shares the trait contract with the
//! Postgres store.

use std::sync::Mutex;

use chrono::Utc;

use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::error::AuthResult;

/// In-memory user repository
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    /// Insert a pre-built user, keeping its id.
    pub fn seed(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> AuthResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn insert(&self, username: &str, password_hash: &str) -> AuthResult<i32> {
        let mut users = self.users.lock().unwrap();
        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        users.push(User {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn count(&self) -> AuthResult<i64> {
        Ok(self.users.lock().unwrap().len() as i64)
    }
}
