//! Repository Traits
//!
//! Interfaces for identity-store persistence. Implementations live in the
//! infrastructure layer.

use crate::domain::entity::User;
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Find a user by exact username
    async fn find_by_username(&self, username: &str) -> AuthResult<Option<User>>;

    /// Insert a new user, returning its id
    async fn insert(&self, username: &str, password_hash: &str) -> AuthResult<i32>;

    /// Number of users in the store
    async fn count(&self) -> AuthResult<i64>;
}
