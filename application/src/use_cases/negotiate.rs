//! Negotiate use case
//!
//! Runs one two-party negotiation to completion: alternating turns, failure
//! accounting, agreement detection and forced convergence.

use crate::config::{NegotiationParams, PersonaModels};
use crate::ports::llm_gateway::{GatewayError, GenerationRequest, LlmGateway};
use crate::ports::negotiation_observer::{NegotiationObserver, NoObserver, TurnFailure};
use colloquy_domain::{
    ConsensusExtractor, ForcedConvergence, HandoffController, Model, NegotiationResult,
    NegotiationState, ParticipantDescriptor, PersonaTemplate, Role, SeedContext, Transcript,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that end a negotiation without a result.
///
/// Budget exhaustion is not an error: it yields a forced [`NegotiationResult`].
#[derive(Error, Debug)]
pub enum NegotiationError {
    #[error("Operation cancelled")]
    Cancelled,
}

impl NegotiationError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, NegotiationError::Cancelled)
    }
}

/// A seated participant: persona instructions plus the model that speaks for it.
#[derive(Debug, Clone)]
pub struct Participant {
    pub descriptor: ParticipantDescriptor,
    pub model: Model,
}

impl Participant {
    pub fn new(descriptor: ParticipantDescriptor, model: Model) -> Self {
        Self { descriptor, model }
    }

    pub fn role(&self) -> Role {
        self.descriptor.role()
    }

    /// The backend request for this participant's next turn
    pub fn request(&self, transcript: &Transcript, context: &SeedContext) -> GenerationRequest {
        GenerationRequest {
            model: self.model.clone(),
            instructions: self.descriptor.instructions().to_string(),
            history: transcript.history_for(self.role()),
            variables: context.variables(),
        }
    }

    /// Ask the backend for this participant's next utterance
    pub async fn produce<G: LlmGateway + ?Sized>(
        &self,
        gateway: &G,
        transcript: &Transcript,
        context: &SeedContext,
    ) -> Result<String, GatewayError> {
        gateway.generate(&self.request(transcript, context)).await
    }
}

/// Input for one negotiation
#[derive(Debug, Clone)]
pub struct NegotiationInput {
    pub context: SeedContext,
    pub first: Participant,
    pub second: Participant,
    pub params: NegotiationParams,
}

impl NegotiationInput {
    /// Seat Zero and Gustave with their standard persona instructions.
    pub fn new(context: SeedContext, models: &PersonaModels, params: NegotiationParams) -> Self {
        let first = Participant::new(
            PersonaTemplate::descriptor(Role::A, &context),
            models.zero.clone(),
        );
        let second = Participant::new(
            PersonaTemplate::descriptor(Role::B, &context),
            models.gustave.clone(),
        );
        Self {
            context,
            first,
            second,
            params,
        }
    }
}

/// Drives the turn loop for a single negotiation
pub struct NegotiationEngine<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    cancellation_token: Option<CancellationToken>,
}

impl<G: LlmGateway + 'static> Clone for NegotiationEngine<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            cancellation_token: self.cancellation_token.clone(),
        }
    }
}

impl<G: LlmGateway + 'static> NegotiationEngine<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            cancellation_token: None,
        }
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Run a negotiation without reporting
    pub async fn negotiate(
        &self,
        input: NegotiationInput,
    ) -> Result<NegotiationResult, NegotiationError> {
        self.negotiate_with_observer(input, &NoObserver).await
    }

    /// Run a negotiation, reporting every event to `observer`
    pub async fn negotiate_with_observer(
        &self,
        input: NegotiationInput,
        observer: &dyn NegotiationObserver,
    ) -> Result<NegotiationResult, NegotiationError> {
        let NegotiationInput {
            context,
            first,
            second,
            params,
        } = input;

        info!(
            "Starting negotiation on {} (max {} turns)",
            context.describe(),
            params.max_turns
        );
        observer.on_negotiation_start(&context);

        let extractor = ConsensusExtractor::for_kind(context.kind());
        let handoff = HandoffController::new(first, second);
        let mut transcript = Transcript::new(context.seed_message());
        let mut state = NegotiationState::start();
        let mut turn: u32 = 1;
        let mut consecutive_failures: u32 = 0;

        while turn <= params.max_turns {
            if self.is_cancelled() {
                observer.on_cancelled(&context);
                return Err(NegotiationError::Cancelled);
            }

            let (role, participant) = handoff.active(turn);
            debug_assert_eq!(state.active_role(), Some(role));
            debug!("Turn {}: {} ({})", turn, role, participant.model);

            let generation = self.produce(participant, &transcript, &context, params.turn_timeout);
            let response = match &self.cancellation_token {
                Some(token) => {
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => {
                            observer.on_cancelled(&context);
                            return Err(NegotiationError::Cancelled);
                        }
                        response = generation => response,
                    }
                }
                None => generation.await,
            };

            let accepted = match response {
                Ok(raw) => {
                    let extraction = extractor.extract(&raw);
                    match extraction.defect() {
                        Some(defect) => Err(TurnFailure::Defect(defect)),
                        None => Ok((raw, extraction)),
                    }
                }
                Err(e) => Err(TurnFailure::Gateway(e.to_string())),
            };

            let (raw, extraction) = match accepted {
                Ok(valid) => valid,
                Err(failure) => {
                    consecutive_failures += 1;
                    warn!(
                        "{} produced no valid turn ({}), failure {}/{}",
                        role,
                        failure,
                        consecutive_failures,
                        params.failure_budget()
                    );
                    observer.on_invalid_response(role, &failure, consecutive_failures);
                    if consecutive_failures >= params.failure_budget() {
                        state = state.after_failure_budget();
                        break;
                    }
                    continue;
                }
            };

            consecutive_failures = 0;
            transcript.append(role, raw);
            observer.on_turn(turn, role, &extraction.cleaned_body);

            if extraction.is_ambiguous() {
                warn!(
                    "{} agreed on {} without the payload label; using the whole body",
                    role,
                    context.describe()
                );
                observer.on_ambiguous_extraction(role, &context);
            }

            state = state.after_valid_turn(extraction.is_agreement());
            if state == NegotiationState::Converged
                && let Some(payload) = extraction.payload
            {
                info!("{} converged on turn {}", context.describe(), turn);
                let result = NegotiationResult::converged(payload, turn);
                observer.on_outcome(&context, &result);
                return Ok(result);
            }

            turn += 1;
        }

        let aborted = state == NegotiationState::Aborted;
        if !aborted {
            state = state.after_turn_budget();
        }

        let payload = ForcedConvergence::recover(&transcript, &extractor);
        state = state.after_recovery();
        debug_assert!(state.is_terminal());

        let result = NegotiationResult::forced(payload, transcript.len() as u32, aborted);
        if result.is_usable() {
            info!(
                "{} forced after {} turns; recovered the latest proposal",
                context.describe(),
                result.turns_used
            );
        } else {
            warn!(
                "{} forced after {} turns with nothing to recover",
                context.describe(),
                result.turns_used
            );
        }
        observer.on_outcome(&context, &result);
        Ok(result)
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation_token
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }

    async fn produce(
        &self,
        participant: &Participant,
        transcript: &Transcript,
        context: &SeedContext,
        timeout: Option<Duration>,
    ) -> Result<String, GatewayError> {
        let generation = participant.produce(self.gateway.as_ref(), transcript, context);
        match timeout {
            Some(timeout) => match tokio::time::timeout(timeout, generation).await {
                Ok(result) => result,
                Err(_) => Err(GatewayError::Timeout),
            },
            None => generation.await,
        }
    }
}
