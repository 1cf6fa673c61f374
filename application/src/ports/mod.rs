//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod book_progress;
pub mod book_store;
pub mod composite_observer;
pub mod conversation_logger;
pub mod llm_gateway;
pub mod negotiation_observer;
