//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`NegotiationParams`] - turn loop control (turns, failures, timeout)
//! - [`BookConfig`] - container for the book pipeline

pub mod book_config;
pub mod negotiation_params;

pub use book_config::{BookConfig, PersonaModels};
pub use negotiation_params::{NegotiationBudgets, NegotiationParams};
