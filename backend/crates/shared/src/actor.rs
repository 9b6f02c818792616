//! Actor - Verified caller identity
//!
//! Every committed write is stamped with the identity of the caller.
//! The authentication middleware inserts a verified [`Actor`] into the
//! request extensions; code that runs without a caller (migrations,
//! seeding, background jobs) uses [`Actor::system`].

use std::fmt;

/// Name recorded for writes that have no authenticated caller.
pub const SYSTEM_ACTOR: &str = "System";

/// Verified identity of the caller performing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Actor(String);

impl Actor {
    /// Actor for an authenticated user.
    pub fn named(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Actor for unattended operations.
    pub fn system() -> Self {
        Self(SYSTEM_ACTOR.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_system(&self) -> bool {
        self.0 == SYSTEM_ACTOR
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_actor() {
        let actor = Actor::named("alice");
        assert_eq!(actor.as_str(), "alice");
        assert!(!actor.is_system());
    }

    #[test]
    fn test_system_actor() {
        let actor = Actor::system();
        assert_eq!(actor.as_str(), "System");
        assert!(actor.is_system());
    }
}
