//! Agreement-signal detection and payload extraction.
//!
//! Participants answer in free-form text. The protocol only asks that the
//! first non-blank line be an explicit marker:
//!
//! ```text
//! Consensus: True
//! Book Title: Hidden Tides
//! ```
//!
//! Everything here is pure text processing: identical input always yields an
//! identical [`ExtractionResult`], and no input makes it panic.

use super::context::ArtifactKind;

/// Key of the agreement marker line.
pub const CONSENSUS_MARKER: &str = "Consensus";

/// Lines starting with these are protocol plumbing and never reach a payload.
const CONTROL_PREFIXES: [&str; 2] = ["HANDOFF:", "functions."];

/// Why a response cannot count as a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseDefect {
    /// Nothing but whitespace.
    Empty,
    /// The first non-blank line is not a `Consensus: True|False` marker.
    MissingMarker,
    /// A marker, but nothing else once control lines are removed.
    EmptyBody,
}

impl std::fmt::Display for ResponseDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseDefect::Empty => write!(f, "empty response"),
            ResponseDefect::MissingMarker => write!(f, "missing consensus marker"),
            ResponseDefect::EmptyBody => write!(f, "empty body after cleanup"),
        }
    }
}

/// Outcome of running the extractor over one raw response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionResult {
    /// `true` only for an explicit `Consensus: True`.
    pub agreement_signal: bool,
    /// Whether the first non-blank line was a valid marker.
    pub marker_present: bool,
    /// Body with marker and control lines removed, trimmed.
    pub cleaned_body: String,
    /// Agreed payload; `None` unless `agreement_signal` holds.
    pub payload: Option<String>,
    /// Agreement was signaled but the payload label was missing, so the
    /// whole cleaned body became the payload.
    pub label_fallback: bool,
}

impl ExtractionResult {
    /// The reason this response is not a valid turn, if any.
    pub fn defect(&self) -> Option<ResponseDefect> {
        match (self.marker_present, self.cleaned_body.is_empty()) {
            (false, true) => Some(ResponseDefect::Empty),
            (false, false) => Some(ResponseDefect::MissingMarker),
            (true, true) => Some(ResponseDefect::EmptyBody),
            (true, false) => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.defect().is_none()
    }

    /// Agreement with a non-empty payload: the negotiation can converge.
    pub fn is_agreement(&self) -> bool {
        self.agreement_signal && self.payload.is_some()
    }

    pub fn is_ambiguous(&self) -> bool {
        self.label_fallback
    }
}

/// Extracts agreement and payload for one artifact kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsensusExtractor {
    payload_label: Option<String>,
}

impl ConsensusExtractor {
    pub fn new(payload_label: Option<&str>) -> Self {
        Self {
            payload_label: payload_label.map(str::to_string),
        }
    }

    pub fn for_kind(kind: ArtifactKind) -> Self {
        Self::new(kind.payload_label())
    }

    pub fn payload_label(&self) -> Option<&str> {
        self.payload_label.as_deref()
    }

    /// Classify `raw_text` and pull out the payload when agreement is signaled.
    ///
    /// With agreement but no payload label in the body, the whole cleaned
    /// body is the payload. This looser reading is intentional.
    pub fn extract(&self, raw_text: &str) -> ExtractionResult {
        let cleaned_body = clean_body(raw_text);

        let Some(agreement) = parse_signal(raw_text) else {
            return ExtractionResult {
                cleaned_body,
                ..ExtractionResult::default()
            };
        };

        if !agreement {
            return ExtractionResult {
                agreement_signal: false,
                marker_present: true,
                cleaned_body,
                payload: None,
                label_fallback: false,
            };
        }

        let (payload, label_fallback) = match self.payload_label.as_deref() {
            Some(label) => match text_after_label(&cleaned_body, label) {
                Some(found) => (found, false),
                None => (cleaned_body.clone(), !cleaned_body.is_empty()),
            },
            None => (cleaned_body.clone(), false),
        };

        ExtractionResult {
            agreement_signal: true,
            marker_present: true,
            payload: non_empty(payload),
            cleaned_body,
            label_fallback,
        }
    }

    /// Payload a message proposes, regardless of its agreement signal.
    ///
    /// With a payload label, only messages containing the label qualify.
    /// Without one, any non-empty cleaned body is a candidate.
    pub fn candidate_payload(&self, raw_text: &str) -> Option<String> {
        let body = clean_body(raw_text);
        match self.payload_label.as_deref() {
            Some(label) => text_after_label(&body, label).and_then(non_empty),
            None => non_empty(body),
        }
    }
}

/// Parse the marker on the first non-blank line.
fn parse_signal(raw_text: &str) -> Option<bool> {
    let first = raw_text.lines().find(|line| !line.trim().is_empty())?;
    parse_marker_line(first)
}

fn parse_marker_line(line: &str) -> Option<bool> {
    let line = line.replace('*', "");
    let (key, value) = line.trim().split_once(':')?;
    if !key.trim().eq_ignore_ascii_case(CONSENSUS_MARKER) {
        return None;
    }
    let value = value.trim().trim_end_matches('.');
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn is_marker_line(line: &str) -> bool {
    let probe = line.replace('*', "");
    probe
        .trim_start()
        .split_once(':')
        .is_some_and(|(key, _)| key.trim().eq_ignore_ascii_case(CONSENSUS_MARKER))
}

fn is_control_line(line: &str) -> bool {
    let probe = line.trim_start();
    CONTROL_PREFIXES.iter().any(|prefix| probe.starts_with(prefix))
}

fn clean_body(raw_text: &str) -> String {
    raw_text
        .lines()
        .filter(|line| !is_control_line(line) && !is_marker_line(line))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Text following `label`, without the markdown emphasis that closed it.
fn text_after_label(body: &str, label: &str) -> Option<String> {
    body.find(label).map(|start| {
        body[start + label.len()..]
            .trim_start_matches(|c: char| c == '*' || c == '_' || c.is_whitespace())
            .trim_end()
            .to_string()
    })
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}
