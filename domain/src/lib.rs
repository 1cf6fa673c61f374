//! Domain layer for colloquy
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Negotiation
//!
//! Two personas, Zero and Gustave, alternate turns on one artifact until one
//! of them answers `Consensus: True` with a payload:
//!
//! - **Title**: the book title, labeled `Book Title:`
//! - **Table of Contents**: numbered chapters and sections, labeled `Table of Contents:`
//! - **Section**: the body of one section, unlabeled
//!
//! When a budget runs out, forced convergence salvages the most recent
//! proposal from the transcript.
//!
//! ## Book
//!
//! The agreed ToC is parsed into chapters and sections, each written
//! separately and compiled into chapters and then the final book.

pub mod book;
pub mod config;
pub mod core;
pub mod negotiation;
pub mod prompt;
pub mod session;

// Re-export commonly used types
pub use book::{
    Chapter, CompiledBook, CompiledChapter, Section, SectionKey, SectionNumber, TableOfContents,
    WritingUnit, compile_book, compile_chapter, sanitize_title,
};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::{error::DomainError, model::Model, topic::Topic};
pub use negotiation::{
    ArtifactKind, ConsensusExtractor, ExtractionResult, ForcedConvergence, HandoffController,
    Message, NegotiationOutcome, NegotiationResult, NegotiationState, ParticipantDescriptor,
    ResponseDefect, Role, SeedContext, Transcript,
};
pub use prompt::PersonaTemplate;
pub use session::{ChatMessage, ChatRole};
