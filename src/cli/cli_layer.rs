// CLI layer - argument parsing and command handlers.

#[path = "commands/command_catalog.rs"]
pub mod commands;

// Re-export command types for convenience
pub use commands::{dispatch, Cli, Data};
