//! Best-effort payload recovery when the parties never agree

use super::extraction::ConsensusExtractor;
use super::transcript::Transcript;

/// Salvages the most recent candidate payload from a transcript.
///
/// Content quality is not re-validated: the answer is simply the newest
/// proposal either party made. The seed message is never a candidate.
pub struct ForcedConvergence;

impl ForcedConvergence {
    /// Scan newest-to-oldest across both roles for the first message that
    /// carries a payload, and return it.
    ///
    /// `None` means there is no usable result, which is distinct from an
    /// empty-string success.
    pub fn recover(transcript: &Transcript, extractor: &ConsensusExtractor) -> Option<String> {
        transcript
            .messages()
            .iter()
            .rev()
            .find_map(|message| extractor.candidate_payload(message.raw_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::negotiation::context::ArtifactKind;
    use crate::negotiation::role::Role;

    fn speaker(turn: u32) -> Role {
        if turn % 2 == 1 { Role::A } else { Role::B }
    }

    #[test]
    fn test_recovers_most_recent_candidate() {
        let mut transcript = Transcript::new("Book Title: from the seed");
        for turn in 1..=8 {
            let text = match turn {
                2 | 5 | 7 => format!("Consensus: False\nBook Title: Candidate {}", turn),
                _ => "Consensus: False\nI am not sure yet.".to_string(),
            };
            transcript.append(speaker(turn), text);
        }

        let extractor = ConsensusExtractor::for_kind(ArtifactKind::Title);
        assert_eq!(
            ForcedConvergence::recover(&transcript, &extractor),
            Some("Candidate 7".to_string())
        );
    }

    #[test]
    fn test_no_candidate_returns_none() {
        let mut transcript = Transcript::new("Book Title: seed only");
        transcript.append(Role::A, "Consensus: False\nLet's think more.");
        transcript.append(Role::B, "Consensus: False\nAgreed, more thinking.");

        let extractor = ConsensusExtractor::for_kind(ArtifactKind::Title);
        assert_eq!(ForcedConvergence::recover(&transcript, &extractor), None);
    }

    #[test]
    fn test_empty_transcript_returns_none() {
        let transcript = Transcript::new("seed");
        let extractor = ConsensusExtractor::for_kind(ArtifactKind::Section);
        assert_eq!(ForcedConvergence::recover(&transcript, &extractor), None);
    }

    #[test]
    fn test_unlabeled_kind_recovers_latest_body() {
        let mut transcript = Transcript::new("seed");
        transcript.append(Role::A, "Consensus: False\nFirst draft.");
        transcript.append(Role::B, "Consensus: False\nSecond draft.\nHANDOFF: Returning to Zero");

        let extractor = ConsensusExtractor::for_kind(ArtifactKind::Section);
        assert_eq!(
            ForcedConvergence::recover(&transcript, &extractor),
            Some("Second draft.".to_string())
        );
    }
}
