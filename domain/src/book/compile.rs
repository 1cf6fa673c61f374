//! Assembling sections into chapters and chapters into the final book
//!
//! Both compilers are pure: file access goes through the `read` closure, and
//! anything it reports as absent is skipped and listed in `missing`.

use super::toc::{Chapter, SectionKey};

/// A chapter rendered from its sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledChapter {
    pub number: u32,
    pub content: String,
    /// Units whose text was not available.
    pub missing: Vec<SectionKey>,
}

/// The final book document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledBook {
    pub content: String,
    /// Chapters whose compiled file was not available.
    pub missing_chapters: Vec<u32>,
}

/// Render one chapter.
///
/// A chapter without sections takes its own text verbatim. Otherwise every
/// section, in `(major, minor)` order, contributes a `## Section` heading
/// followed by its text.
pub fn compile_chapter<E, F>(chapter: &Chapter, mut read: F) -> Result<CompiledChapter, E>
where
    F: FnMut(&SectionKey) -> Result<Option<String>, E>,
{
    let mut content = format!("# Chapter {}: {}\n\n", chapter.number, chapter.title);
    let mut missing = Vec::new();

    if chapter.sections.is_empty() {
        let key = SectionKey::chapter(chapter.number);
        match read(&key)? {
            Some(text) => content.push_str(&text),
            None => missing.push(key),
        }
    } else {
        for section in chapter.sorted_sections() {
            let key = SectionKey::section(chapter.number, section.number);
            match read(&key)? {
                Some(text) => {
                    content.push_str(&format!(
                        "## Section {}: {}\n\n",
                        section.number, section.title
                    ));
                    content.push_str(&text);
                    content.push_str("\n\n");
                }
                None => missing.push(key),
            }
        }
    }

    Ok(CompiledChapter {
        number: chapter.number,
        content,
        missing,
    })
}

/// Render the final book from compiled chapter files.
pub fn compile_book<'a, E, I, F>(
    title: &str,
    toc_text: &str,
    chapters: I,
    mut read_chapter: F,
) -> Result<CompiledBook, E>
where
    I: IntoIterator<Item = &'a Chapter>,
    F: FnMut(u32) -> Result<Option<String>, E>,
{
    let mut content = format!("# {}\n\n## Table of Contents\n\n{}\n\n", title, toc_text);
    let mut missing_chapters = Vec::new();

    let mut numbers: Vec<u32> = chapters.into_iter().map(|c| c.number).collect();
    numbers.sort_unstable();

    for number in numbers {
        match read_chapter(number)? {
            Some(text) => {
                content.push_str(&text);
                content.push_str("\n\n");
            }
            None => missing_chapters.push(number),
        }
    }

    Ok(CompiledBook {
        content,
        missing_chapters,
    })
}
