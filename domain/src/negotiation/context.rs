//! What is being negotiated, and the read-only context it is negotiated in

use crate::core::topic::Topic;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The kind of artifact a negotiation produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Title,
    TableOfContents,
    Section,
}

impl ArtifactKind {
    /// Label that precedes the agreed payload in a participant's response.
    ///
    /// Sections carry no label: the whole cleaned body is the payload.
    pub fn payload_label(self) -> Option<&'static str> {
        match self {
            ArtifactKind::Title => Some("Book Title:"),
            ArtifactKind::TableOfContents => Some("Table of Contents:"),
            ArtifactKind::Section => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactKind::Title => "title",
            ArtifactKind::TableOfContents => "table_of_contents",
            ArtifactKind::Section => "section",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Runtime context for one negotiation.
///
/// Supplies the fields the persona templates and the seed message are
/// rendered from. Never mutated while the negotiation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeedContext {
    Title {
        topic: Topic,
    },
    TableOfContents {
        book_title: String,
    },
    Section {
        book_title: String,
        full_toc: String,
        section_number: String,
        section_title: String,
    },
}

impl SeedContext {
    pub fn title(topic: Topic) -> Self {
        SeedContext::Title { topic }
    }

    pub fn table_of_contents(book_title: impl Into<String>) -> Self {
        SeedContext::TableOfContents {
            book_title: book_title.into(),
        }
    }

    pub fn section(
        book_title: impl Into<String>,
        full_toc: impl Into<String>,
        section_number: impl Into<String>,
        section_title: impl Into<String>,
    ) -> Self {
        SeedContext::Section {
            book_title: book_title.into(),
            full_toc: full_toc.into(),
            section_number: section_number.into(),
            section_title: section_title.into(),
        }
    }

    pub fn kind(&self) -> ArtifactKind {
        match self {
            SeedContext::Title { .. } => ArtifactKind::Title,
            SeedContext::TableOfContents { .. } => ArtifactKind::TableOfContents,
            SeedContext::Section { .. } => ArtifactKind::Section,
        }
    }

    /// The opening user message that starts the transcript.
    pub fn seed_message(&self) -> String {
        match self {
            SeedContext::Title { topic } => format!(
                "Let's collaborate on a title for a book about: {}. Please propose an initial title idea.",
                topic
            ),
            SeedContext::TableOfContents { book_title } => format!(
                "Let's collaborate on a table of contents for the book titled: {}. Please propose an initial table of contents.",
                book_title
            ),
            SeedContext::Section {
                section_number,
                section_title,
                ..
            } => format!(
                "Let's collaborate on writing the section {}: {}.",
                section_number, section_title
            ),
        }
    }

    /// Context variables handed to the backend alongside the instructions.
    pub fn variables(&self) -> BTreeMap<String, String> {
        let mut vars = BTreeMap::new();
        match self {
            SeedContext::Title { topic } => {
                vars.insert("topic".to_string(), topic.content().to_string());
            }
            SeedContext::TableOfContents { book_title } => {
                vars.insert("book_title".to_string(), book_title.clone());
            }
            SeedContext::Section {
                book_title,
                full_toc,
                section_number,
                section_title,
            } => {
                vars.insert("book_title".to_string(), book_title.clone());
                vars.insert("full_toc".to_string(), full_toc.clone());
                vars.insert("section_number".to_string(), section_number.clone());
                vars.insert("section_title".to_string(), section_title.clone());
            }
        }
        vars
    }

    /// Short operator-facing description, e.g. `Section 2.1: Gyres`.
    pub fn describe(&self) -> String {
        match self {
            SeedContext::Title { .. } => "book title".to_string(),
            SeedContext::TableOfContents { .. } => "table of contents".to_string(),
            SeedContext::Section {
                section_number,
                section_title,
                ..
            } => format!("Section {}: {}", section_number, section_title),
        }
    }
}
