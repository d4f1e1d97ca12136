//! Command handlers for the ragline CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod seed;
pub mod serve;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use seed::SeedCommand;
pub use serve::ServeCommand;
