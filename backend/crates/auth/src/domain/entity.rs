//! User Entity

use chrono::{DateTime, Utc};

/// Identity-store user.
///
/// `password_hash` is the Argon2id PHC string; the clear text never
/// leaves the login path.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
