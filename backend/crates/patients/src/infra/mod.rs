//! Infrastructure Layer
//!
//! Store implementations of the repository trait.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryPatientStore;
pub use postgres::PgPatientStore;
