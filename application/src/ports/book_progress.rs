//! Book progress port
//!
//! Defines the interface for reporting progress through the book pipeline.

use colloquy_domain::{SectionKey, WritingUnit};
use std::path::Path;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookStage {
    Title,
    TableOfContents,
    Sections,
    Chapters,
    FinalBook,
}

impl BookStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStage::Title => "title",
            BookStage::TableOfContents => "table of contents",
            BookStage::Sections => "sections",
            BookStage::Chapters => "chapters",
            BookStage::FinalBook => "final book",
        }
    }
}

impl std::fmt::Display for BookStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Callback for progress updates while a book is written
pub trait BookProgressNotifier: Send + Sync {
    /// Called when a stage starts; `total` is the number of units in it
    fn on_stage_start(&self, stage: BookStage, total: usize);

    /// Called when a section negotiation has finished, successfully or not
    fn on_unit_complete(&self, unit: &WritingUnit, success: bool);

    /// Called when a stage completes
    fn on_stage_complete(&self, stage: BookStage);

    /// Called when a file expected during compilation does not exist
    fn on_missing_file(&self, _key: &SectionKey) {}

    /// Called when a compiled chapter is missing from the final book
    fn on_missing_chapter(&self, _chapter: u32) {}

    /// Called with the location of the finished book
    fn on_book_written(&self, _path: &Path) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoBookProgress;

impl BookProgressNotifier for NoBookProgress {
    fn on_stage_start(&self, _stage: BookStage, _total: usize) {}
    fn on_unit_complete(&self, _unit: &WritingUnit, _success: bool) {}
    fn on_stage_complete(&self, _stage: BookStage) {}
}
