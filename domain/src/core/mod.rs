//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`] - chat models backing a persona
//! - [`topic::Topic`] - a validated book topic
//! - [`error::DomainError`] - domain-level errors

pub mod error;
pub mod model;
pub mod string;
pub mod topic;
