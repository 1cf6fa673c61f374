//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording negotiation events
//! (turns, rejected responses, outcomes) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full
//! conversation transcript in a machine-readable format (JSONL).

use super::negotiation_observer::{NegotiationObserver, TurnFailure};
use colloquy_domain::{NegotiationResult, Role, SeedContext};
use serde_json::{Value, json};
use std::sync::Arc;

/// A structured conversation event for logging.
///
/// Each event has a type string and a JSON payload containing
/// event-specific fields. The adapter adds the timestamp.
pub struct ConversationEvent {
    /// Event type identifier (e.g., "turn", "invalid_response", "outcome").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging conversation events to a structured log.
///
/// Implementations write each event as a single record (e.g., one JSONL line).
/// The `log` method is synchronous and non-fallible: logging failures are
/// silently ignored.
pub trait ConversationLogger: Send + Sync {
    /// Record a conversation event.
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}

/// Observer that records every negotiation event through a [`ConversationLogger`].
pub struct ConversationLogObserver {
    logger: Arc<dyn ConversationLogger>,
}

impl ConversationLogObserver {
    pub fn new(logger: Arc<dyn ConversationLogger>) -> Self {
        Self { logger }
    }
}

impl NegotiationObserver for ConversationLogObserver {
    fn on_negotiation_start(&self, context: &SeedContext) {
        self.logger.log(ConversationEvent::new(
            "negotiation_start",
            json!({
                "artifact": context.kind().as_str(),
                "context": context.describe(),
                "seed": context.seed_message(),
            }),
        ));
    }

    fn on_turn(&self, turn: u32, role: Role, body: &str) {
        self.logger.log(ConversationEvent::new(
            "turn",
            json!({
                "turn": turn,
                "role": role.as_str(),
                "speaker": role.persona_name(),
                "body": body,
            }),
        ));
    }

    fn on_invalid_response(&self, role: Role, failure: &TurnFailure, consecutive: u32) {
        self.logger.log(ConversationEvent::new(
            "invalid_response",
            json!({
                "speaker": role.persona_name(),
                "reason": failure.to_string(),
                "consecutive_failures": consecutive,
            }),
        ));
    }

    fn on_ambiguous_extraction(&self, role: Role, context: &SeedContext) {
        self.logger.log(ConversationEvent::new(
            "ambiguous_extraction",
            json!({
                "speaker": role.persona_name(),
                "context": context.describe(),
            }),
        ));
    }

    fn on_outcome(&self, context: &SeedContext, result: &NegotiationResult) {
        self.logger.log(ConversationEvent::new(
            "outcome",
            json!({
                "context": context.describe(),
                "outcome": result.outcome().to_string(),
                "turns_used": result.turns_used,
                "forced": result.forced,
                "aborted": result.aborted,
                "payload": result.payload,
            }),
        ));
    }

    fn on_cancelled(&self, context: &SeedContext) {
        self.logger.log(ConversationEvent::new(
            "cancelled",
            json!({ "context": context.describe() }),
        ));
    }
}
