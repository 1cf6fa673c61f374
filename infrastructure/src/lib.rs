//! Infrastructure layer for colloquy
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;
pub mod storage;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig, FileModelsConfig, FileOutputConfig};
pub use logging::JsonlConversationLogger;
pub use providers::{OpenAiGateway, OpenAiSettings};
pub use storage::FsBookStore;
