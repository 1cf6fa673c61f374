//! Negotiation state machine and final result

use super::role::Role;
use serde::{Deserialize, Serialize};

/// Where a negotiation stands.
///
/// ```text
/// AwaitingTurn(x) --valid, no agreement--> AwaitingTurn(other)
/// AwaitingTurn(x) --agreement + payload--> Converged
/// AwaitingTurn(x) --failure budget-------> Aborted --recovery--> Forced
/// AwaitingTurn(x) --turn budget----------> Forced
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NegotiationState {
    AwaitingTurn(Role),
    Converged,
    Aborted,
    Forced,
}

impl NegotiationState {
    /// Initial state: role A holds the floor.
    pub fn start() -> Self {
        NegotiationState::AwaitingTurn(Role::A)
    }

    /// Transition after a valid utterance.
    pub fn after_valid_turn(self, agreed: bool) -> Self {
        match self {
            NegotiationState::AwaitingTurn(_) if agreed => NegotiationState::Converged,
            NegotiationState::AwaitingTurn(role) => NegotiationState::AwaitingTurn(role.other()),
            terminal => terminal,
        }
    }

    /// Transition when consecutive failures exhaust their budget.
    pub fn after_failure_budget(self) -> Self {
        match self {
            NegotiationState::AwaitingTurn(_) => NegotiationState::Aborted,
            other => other,
        }
    }

    /// Transition when the turn budget runs out.
    pub fn after_turn_budget(self) -> Self {
        match self {
            NegotiationState::AwaitingTurn(_) => NegotiationState::Forced,
            other => other,
        }
    }

    /// Transition once forced recovery has been attempted.
    pub fn after_recovery(self) -> Self {
        match self {
            NegotiationState::Aborted => NegotiationState::Forced,
            other => other,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, NegotiationState::Converged | NegotiationState::Forced)
    }

    /// Role currently holding the floor, if the negotiation is still live.
    pub fn active_role(&self) -> Option<Role> {
        match self {
            NegotiationState::AwaitingTurn(role) => Some(*role),
            _ => None,
        }
    }
}

/// How a finished negotiation should be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegotiationOutcome {
    /// Both parties agreed on a payload.
    Converged,
    /// No agreement, but forced convergence salvaged a candidate.
    Recovered,
    /// No agreement and nothing to salvage.
    Failed,
}

impl std::fmt::Display for NegotiationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NegotiationOutcome::Converged => write!(f, "converged"),
            NegotiationOutcome::Recovered => write!(f, "recovered"),
            NegotiationOutcome::Failed => write!(f, "failed"),
        }
    }
}

/// The only artifact that outlives a negotiation.
///
/// `converged` and `forced` are mutually exclusive. A forced result may
/// still carry a recovered payload; callers must tell "agreed" apart from
/// "best-effort recovered" through [`NegotiationResult::outcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationResult {
    pub payload: Option<String>,
    pub converged: bool,
    pub turns_used: u32,
    pub forced: bool,
    /// The failure budget, not the turn budget, ended the negotiation.
    pub aborted: bool,
}

impl NegotiationResult {
    pub fn converged(payload: impl Into<String>, turns_used: u32) -> Self {
        Self {
            payload: Some(payload.into()),
            converged: true,
            turns_used,
            forced: false,
            aborted: false,
        }
    }

    pub fn forced(payload: Option<String>, turns_used: u32, aborted: bool) -> Self {
        Self {
            payload,
            converged: false,
            turns_used,
            forced: true,
            aborted,
        }
    }

    pub fn outcome(&self) -> NegotiationOutcome {
        match (self.converged, self.payload.is_some()) {
            (true, _) => NegotiationOutcome::Converged,
            (false, true) => NegotiationOutcome::Recovered,
            (false, false) => NegotiationOutcome::Failed,
        }
    }

    /// Whether there is any payload to persist.
    pub fn is_usable(&self) -> bool {
        self.payload.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_turns_alternate_then_converge() {
        let state = NegotiationState::start();
        assert_eq!(state.active_role(), Some(Role::A));

        let state = state.after_valid_turn(false);
        assert_eq!(state, NegotiationState::AwaitingTurn(Role::B));

        let state = state.after_valid_turn(true);
        assert_eq!(state, NegotiationState::Converged);
        assert!(state.is_terminal());
        assert_eq!(state.after_valid_turn(false), NegotiationState::Converged);
    }

    #[test]
    fn test_abort_then_forced() {
        let state = NegotiationState::start().after_failure_budget();
        assert_eq!(state, NegotiationState::Aborted);
        assert!(!state.is_terminal());
        assert_eq!(state.after_recovery(), NegotiationState::Forced);
    }

    #[test]
    fn test_turn_budget_goes_straight_to_forced() {
        let state = NegotiationState::AwaitingTurn(Role::B).after_turn_budget();
        assert_eq!(state, NegotiationState::Forced);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_result_outcomes() {
        assert_eq!(
            NegotiationResult::converged("Hidden Tides", 1).outcome(),
            NegotiationOutcome::Converged
        );
        assert_eq!(
            NegotiationResult::forced(Some("Deep Drift".into()), 10, false).outcome(),
            NegotiationOutcome::Recovered
        );
        let failed = NegotiationResult::forced(None, 0, true);
        assert_eq!(failed.outcome(), NegotiationOutcome::Failed);
        assert!(!failed.is_usable());
        assert!(failed.aborted);
    }
}
