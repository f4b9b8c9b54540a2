//! expense-config
//!
//! Persistent user preferences for the expense tracker: where expenses are
//! stored, under which key, and how they are displayed.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::{default_base_dir, ConfigManager};
pub use model::Config;
