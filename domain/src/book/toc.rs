//! Table of contents structure and parser

use crate::core::error::DomainError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static CHAPTER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.\s+(.*)$").expect("valid chapter regex"));
static SECTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.(\d+)\.\s+(.*)$").expect("valid section regex"));

/// `major.minor` section number, ordered numerically (`1.10` after `1.9`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectionNumber {
    pub major: u32,
    pub minor: u32,
}

impl SectionNumber {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl std::fmt::Display for SectionNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl std::str::FromStr for SectionNumber {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidSectionNumber(s.to_string());
        let (major, minor) = s.trim().split_once('.').ok_or_else(invalid)?;
        Ok(Self {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub number: SectionNumber,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub number: u32,
    pub title: String,
    pub sections: Vec<Section>,
}

impl Chapter {
    /// Sections in numeric `(major, minor)` order.
    pub fn sorted_sections(&self) -> Vec<&Section> {
        let mut sections: Vec<&Section> = self.sections.iter().collect();
        sections.sort_by_key(|s| s.number);
        sections
    }
}

/// Identifies one unit of writing: a whole chapter, or one of its sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectionKey {
    pub chapter: u32,
    pub section: Option<SectionNumber>,
}

impl SectionKey {
    pub fn chapter(chapter: u32) -> Self {
        Self {
            chapter,
            section: None,
        }
    }

    pub fn section(chapter: u32, section: SectionNumber) -> Self {
        Self {
            chapter,
            section: Some(section),
        }
    }

    /// Number shown to the personas: `3` for a whole chapter, `3.2` for a section.
    pub fn display_number(&self) -> String {
        match self.section {
            Some(number) => number.to_string(),
            None => self.chapter.to_string(),
        }
    }
}

impl std::fmt::Display for SectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.section {
            Some(number) => write!(f, "Section {}", number),
            None => write!(f, "Chapter {}", self.chapter),
        }
    }
}

/// A piece of text the personas negotiate on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WritingUnit {
    pub key: SectionKey,
    pub title: String,
}

/// Parsed table of contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOfContents {
    pub chapters: Vec<Chapter>,
}

impl TableOfContents {
    /// Parse the agreed ToC text.
    ///
    /// After trimming, a chapter line matches `^<digits>\.\s+<title>` and a
    /// section line matches `^<digits>\.<digits>\.\s+<title>`. Other lines
    /// are ignored. A section belongs to the closest chapter line above it;
    /// sections before the first chapter are dropped.
    pub fn parse(text: &str) -> Self {
        let mut chapters: Vec<Chapter> = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(caps) = SECTION_LINE.captures(line) {
                let (Ok(major), Ok(minor)) = (caps[1].parse(), caps[2].parse()) else {
                    continue;
                };
                if let Some(chapter) = chapters.last_mut() {
                    chapter.sections.push(Section {
                        number: SectionNumber::new(major, minor),
                        title: caps[3].trim().to_string(),
                    });
                }
            } else if let Some(caps) = CHAPTER_LINE.captures(line) {
                let Ok(number) = caps[1].parse() else {
                    continue;
                };
                chapters.push(Chapter {
                    number,
                    title: caps[2].trim().to_string(),
                    sections: Vec::new(),
                });
            }
        }

        Self { chapters }
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Chapters in numeric order.
    pub fn sorted_chapters(&self) -> Vec<&Chapter> {
        let mut chapters: Vec<&Chapter> = self.chapters.iter().collect();
        chapters.sort_by_key(|c| c.number);
        chapters
    }

    /// Every unit to write, in ToC order.
    ///
    /// A chapter without sections is written as a whole; otherwise each of
    /// its sections is written separately.
    pub fn writing_units(&self) -> Vec<WritingUnit> {
        let mut units = Vec::new();
        for chapter in &self.chapters {
            if chapter.sections.is_empty() {
                units.push(WritingUnit {
                    key: SectionKey::chapter(chapter.number),
                    title: chapter.title.clone(),
                });
            } else {
                for section in &chapter.sections {
                    units.push(WritingUnit {
                        key: SectionKey::section(chapter.number, section.number),
                        title: section.title.clone(),
                    });
                }
            }
        }
        units
    }
}
