//! Configuration module for finreg
//!
//! - XDG-compliant path resolution
//! - User settings persistence (import tuning, row overrides, logging)

pub mod paths;
pub mod settings;

pub use paths::FinregPaths;
pub use settings::Settings;
