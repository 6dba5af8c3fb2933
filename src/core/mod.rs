// Public modules
pub mod commands;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod runner;
pub mod variables;

// Re-export common types for convenience
pub use commands::CommandSet;
pub use error::{Error, Result};
pub use variables::Settings;
