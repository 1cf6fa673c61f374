//! Application layer for colloquy
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{BookConfig, NegotiationBudgets, NegotiationParams, PersonaModels};
pub use ports::{
    book_progress::{BookProgressNotifier, BookStage, NoBookProgress},
    book_store::{BookStore, StorageError},
    composite_observer::CompositeObserver,
    conversation_logger::{
        ConversationEvent, ConversationLogObserver, ConversationLogger, NoConversationLogger,
    },
    llm_gateway::{GatewayError, GenerationRequest, LlmGateway},
    negotiation_observer::{NegotiationObserver, NoObserver, TurnFailure},
};
pub use use_cases::negotiate::{
    NegotiationEngine, NegotiationError, NegotiationInput, Participant,
};
pub use use_cases::write_book::{
    ArtifactReport, BookReport, SectionReport, WriteBookError, WriteBookUseCase,
};
