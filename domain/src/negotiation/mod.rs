//! Two-party negotiation protocol
//!
//! Two personas take turns proposing and critiquing an artifact until one
//! of them signals agreement, or a budget runs out.
//!
//! ```text
//! ┌──────────────┐  role_for_turn   ┌─────────────┐  raw text  ┌────────────────────┐
//! │ Handoff      │ ───────────────▶ │ Participant │ ─────────▶ │ ConsensusExtractor │
//! │ Controller   │                  │  (A or B)   │            └─────────┬──────────┘
//! └──────────────┘                  └─────────────┘                      │
//!        ▲                                                               ▼
//!        │          not agreed                              ┌────────────────────┐
//!        └───────────────────────────────────────────────── │ Transcript         │
//!                                                           └─────────┬──────────┘
//!                                  budget exhausted                   ▼
//!                                                           ┌────────────────────┐
//!                                                           │ ForcedConvergence  │
//!                                                           └────────────────────┘
//! ```
//!
//! This module holds the pure parts of the protocol. The turn loop that
//! calls the generative backend lives in the application layer.

pub mod context;
pub mod extraction;
pub mod handoff;
pub mod outcome;
pub mod recovery;
pub mod role;
pub mod transcript;

pub use context::{ArtifactKind, SeedContext};
pub use extraction::{CONSENSUS_MARKER, ConsensusExtractor, ExtractionResult, ResponseDefect};
pub use handoff::HandoffController;
pub use outcome::{NegotiationOutcome, NegotiationResult, NegotiationState};
pub use recovery::ForcedConvergence;
pub use role::{ParticipantDescriptor, Role};
pub use transcript::{Message, Transcript};
