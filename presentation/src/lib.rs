//! Presentation layer for colloquy
//!
//! This crate contains the CLI definition, the IRC-style console
//! transcript with section progress, and the final report formatter.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use output::formatter::OutputFormatter;
pub use progress::reporter::ConsoleReporter;
