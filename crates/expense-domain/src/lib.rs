//! expense-domain
//!
//! Pure domain models for the expense tracker (Record, Amount, Category, filters).
//! No I/O, no storage, no terminal code.

pub mod category;
pub mod error;
pub mod record;

pub use category::*;
pub use error::DomainError;
pub use record::*;

// Re-exported so downstream crates agree on the versions used in public types.
pub use chrono;
pub use uuid;
