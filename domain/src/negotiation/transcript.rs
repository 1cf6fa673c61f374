//! Append-only turn log of a single negotiation

use super::role::Role;
use crate::session::ChatMessage;

/// One valid utterance in the transcript.
///
/// Created only by [`Transcript::append`]; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    speaker: Role,
    raw_text: String,
    sequence: u32,
}

impl Message {
    pub fn speaker(&self) -> Role {
        self.speaker
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// 1-based position in the transcript; equals the turn that produced it.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }
}

/// Ordered history of one negotiation: the seed message followed by every
/// valid participant utterance in the order it was produced.
///
/// Sequence numbers start at 1 and are gapless. The transcript is dropped
/// when the negotiation ends; only the extracted payload survives.
#[derive(Debug, Clone)]
pub struct Transcript {
    seed: String,
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            messages: Vec::new(),
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Append an utterance and return the stored message.
    pub fn append(&mut self, speaker: Role, raw_text: impl Into<String>) -> &Message {
        let sequence = self.messages.len() as u32 + 1;
        self.messages.push(Message {
            speaker,
            raw_text: raw_text.into(),
            sequence,
        });
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Render the transcript as chat history from `viewer`'s point of view.
    ///
    /// The seed is a user message, `viewer`'s own turns are assistant
    /// messages, and the other persona's turns are user messages prefixed
    /// with its name.
    pub fn history_for(&self, viewer: Role) -> Vec<ChatMessage> {
        let mut history = Vec::with_capacity(self.messages.len() + 1);
        history.push(ChatMessage::user(self.seed.clone()));
        for message in &self.messages {
            if message.speaker == viewer {
                history.push(ChatMessage::assistant(message.raw_text.clone()));
            } else {
                history.push(ChatMessage::user(format!(
                    "{}: {}",
                    message.speaker.persona_name(),
                    message.raw_text
                )));
            }
        }
        history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ChatRole;

    #[test]
    fn test_sequence_is_gapless_from_one() {
        let mut transcript = Transcript::new("seed");
        transcript.append(Role::A, "first");
        transcript.append(Role::B, "second");
        transcript.append(Role::A, "third");

        let sequences: Vec<u32> = transcript.messages().iter().map(|m| m.sequence()).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
        assert_eq!(transcript.messages()[2].raw_text(), "third");
    }

    #[test]
    fn test_empty_transcript_keeps_seed() {
        let transcript = Transcript::new("Let's collaborate");
        assert!(transcript.is_empty());
        assert_eq!(transcript.seed(), "Let's collaborate");
        assert!(transcript.messages().is_empty());
    }

    #[test]
    fn test_history_for_maps_roles() {
        let mut transcript = Transcript::new("seed");
        transcript.append(Role::A, "Consensus: False\nTry 'Tides'");
        transcript.append(Role::B, "Consensus: False\nTry 'Currents'");

        let history = transcript.history_for(Role::B);
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].role, ChatRole::User);
        assert_eq!(history[0].content, "seed");
        assert_eq!(history[1].role, ChatRole::User);
        assert!(history[1].content.starts_with("Zero: Consensus: False"));
        assert_eq!(history[2].role, ChatRole::Assistant);
        assert_eq!(history[2].content, "Consensus: False\nTry 'Currents'");
    }
}
