//! Negotiation parameters: turn loop control.
//!
//! [`NegotiationParams`] bounds one negotiation. [`NegotiationBudgets`] holds
//! one set per artifact kind so the title, the ToC and the sections can be
//! tuned independently.

use colloquy_domain::ArtifactKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Turn loop control parameters for a single negotiation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationParams {
    /// Upper bound on valid utterances.
    pub max_turns: u32,
    /// Failed turns in a row before the negotiation is aborted. `0` acts as `1`.
    pub max_consecutive_failures: u32,
    /// Deadline for one backend call; exceeding it is a failed turn.
    pub turn_timeout: Option<Duration>,
}

impl Default for NegotiationParams {
    fn default() -> Self {
        Self {
            max_turns: 10,
            max_consecutive_failures: 3,
            turn_timeout: Some(Duration::from_secs(120)),
        }
    }
}

impl NegotiationParams {
    // ==================== Builder Methods ====================

    pub fn with_max_turns(mut self, max: u32) -> Self {
        self.max_turns = max;
        self
    }

    pub fn with_max_consecutive_failures(mut self, max: u32) -> Self {
        self.max_consecutive_failures = max;
        self
    }

    pub fn with_turn_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.turn_timeout = timeout;
        self
    }

    /// Failure budget as enforced by the turn loop.
    pub fn failure_budget(&self) -> u32 {
        self.max_consecutive_failures.max(1)
    }
}

/// Per-artifact negotiation parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationBudgets {
    pub title: NegotiationParams,
    pub table_of_contents: NegotiationParams,
    pub section: NegotiationParams,
}

impl NegotiationBudgets {
    /// Same parameters for every artifact kind.
    pub fn uniform(params: NegotiationParams) -> Self {
        Self {
            title: params.clone(),
            table_of_contents: params.clone(),
            section: params,
        }
    }

    pub fn for_kind(&self, kind: ArtifactKind) -> &NegotiationParams {
        match kind {
            ArtifactKind::Title => &self.title,
            ArtifactKind::TableOfContents => &self.table_of_contents,
            ArtifactKind::Section => &self.section,
        }
    }

    /// Apply `f` to every kind's parameters.
    pub fn map_all(mut self, f: impl Fn(NegotiationParams) -> NegotiationParams) -> Self {
        self.title = f(self.title);
        self.table_of_contents = f(self.table_of_contents);
        self.section = f(self.section);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = NegotiationParams::default();
        assert_eq!(params.max_turns, 10);
        assert_eq!(params.max_consecutive_failures, 3);
        assert_eq!(params.turn_timeout, Some(Duration::from_secs(120)));
    }

    #[test]
    fn test_builder() {
        let params = NegotiationParams::default()
            .with_max_turns(4)
            .with_max_consecutive_failures(0)
            .with_turn_timeout(None);

        assert_eq!(params.max_turns, 4);
        assert_eq!(params.failure_budget(), 1);
        assert!(params.turn_timeout.is_none());
    }

    #[test]
    fn test_budgets_per_kind() {
        let budgets = NegotiationBudgets::default()
            .map_all(|p| p.with_max_turns(6));
        assert_eq!(budgets.for_kind(ArtifactKind::Section).max_turns, 6);

        let mut budgets = NegotiationBudgets::uniform(NegotiationParams::default());
        budgets.title.max_turns = 2;
        assert_eq!(budgets.for_kind(ArtifactKind::Title).max_turns, 2);
        assert_eq!(budgets.for_kind(ArtifactKind::TableOfContents).max_turns, 10);
    }
}
