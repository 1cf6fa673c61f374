//! Negotiation observer port
//!
//! Defines the interface for reporting what happens inside a negotiation.

use colloquy_domain::{NegotiationResult, ResponseDefect, Role, SeedContext};

/// Why a turn produced no valid utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnFailure {
    /// The backend answered, but not in the expected shape.
    Defect(ResponseDefect),
    /// The backend call failed or timed out.
    Gateway(String),
}

impl std::fmt::Display for TurnFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnFailure::Defect(defect) => write!(f, "{}", defect),
            TurnFailure::Gateway(message) => write!(f, "backend error: {}", message),
        }
    }
}

/// Callback for negotiation events
///
/// Implementations live in the presentation and infrastructure layers.
/// Every negotiation ends with exactly one `on_outcome` or `on_cancelled`.
pub trait NegotiationObserver: Send + Sync {
    /// Called before the first turn
    fn on_negotiation_start(&self, context: &SeedContext);

    /// Called for each valid utterance, with its cleaned body
    fn on_turn(&self, turn: u32, role: Role, body: &str);

    /// Called when a turn fails and the same role will retry
    fn on_invalid_response(&self, role: Role, failure: &TurnFailure, consecutive: u32);

    /// Called when agreement was signaled without the payload label
    fn on_ambiguous_extraction(&self, _role: Role, _context: &SeedContext) {}

    /// Called once the negotiation reaches a terminal state
    fn on_outcome(&self, context: &SeedContext, result: &NegotiationResult);

    /// Called instead of `on_outcome` when the negotiation was cancelled
    fn on_cancelled(&self, _context: &SeedContext) {}
}

/// No-op observer for when reporting is not needed
pub struct NoObserver;

impl NegotiationObserver for NoObserver {
    fn on_negotiation_start(&self, _context: &SeedContext) {}
    fn on_turn(&self, _turn: u32, _role: Role, _body: &str) {}
    fn on_invalid_response(&self, _role: Role, _failure: &TurnFailure, _consecutive: u32) {}
    fn on_outcome(&self, _context: &SeedContext, _result: &NegotiationResult) {}
}
