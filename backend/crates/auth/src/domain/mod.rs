//! Domain Layer
//!
//! User entity and repository trait.

pub mod entity;
pub mod repository;

// Re-exports
pub use entity::User;
pub use repository::UserRepository;
