//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations that are not domain-specific:
//! - Password hashing and verification (Argon2id)

pub mod password;
