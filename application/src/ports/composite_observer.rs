//! Composite observer that delegates to multiple observers.
//!
//! Used to fan out negotiation events to both the console and the
//! conversation log at the same time.

use super::negotiation_observer::{NegotiationObserver, TurnFailure};
use colloquy_domain::{NegotiationResult, Role, SeedContext};
use std::sync::Arc;

/// An observer that delegates to multiple inner observers.
///
/// Holds shared handles so the composite can be moved into section tasks
/// running on other threads.
///
/// ```text
/// NegotiationEngine.negotiate(.., &composite)
///                                    |
///             +----------------------+----------------------+
///             |                                             |
///   ConsoleReporter                          ConversationLogObserver
///   → colored transcript                     → ConversationLogger (JSONL)
/// ```
#[derive(Clone, Default)]
pub struct CompositeObserver {
    delegates: Vec<Arc<dyn NegotiationObserver>>,
}

impl CompositeObserver {
    pub fn new(delegates: Vec<Arc<dyn NegotiationObserver>>) -> Self {
        Self { delegates }
    }

    pub fn push(&mut self, delegate: Arc<dyn NegotiationObserver>) {
        self.delegates.push(delegate);
    }

    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}

/// Macro to delegate a method call to all inner observers.
macro_rules! delegate {
    ($self:ident, $method:ident $(, $arg:expr)*) => {
        for d in &$self.delegates {
            d.$method($($arg),*);
        }
    };
}

impl NegotiationObserver for CompositeObserver {
    fn on_negotiation_start(&self, context: &SeedContext) {
        delegate!(self, on_negotiation_start, context);
    }

    fn on_turn(&self, turn: u32, role: Role, body: &str) {
        delegate!(self, on_turn, turn, role, body);
    }

    fn on_invalid_response(&self, role: Role, failure: &TurnFailure, consecutive: u32) {
        delegate!(self, on_invalid_response, role, failure, consecutive);
    }

    fn on_ambiguous_extraction(&self, role: Role, context: &SeedContext) {
        delegate!(self, on_ambiguous_extraction, role, context);
    }

    fn on_outcome(&self, context: &SeedContext, result: &NegotiationResult) {
        delegate!(self, on_outcome, context, result);
    }

    fn on_cancelled(&self, context: &SeedContext) {
        delegate!(self, on_cancelled, context);
    }
}
