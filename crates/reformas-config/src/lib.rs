//! reformas-config
//!
//! Persistent company and application settings.
//! Owns the Config data structure plus disk persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::{ConfigManager, ConfigSnapshot};
pub use model::{Config, PrintSettings};
