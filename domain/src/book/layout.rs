//! On-disk naming of book artifacts
//!
//! ```text
//! <output_dir>/<sanitized_title>/
//! ├── title.txt
//! ├── table_of_contents.txt
//! ├── sections/chapter_<n>.md | chapter_<n>_section_<n_m>.md
//! ├── chapters/chapter_<n>.md
//! └── final_book.md
//! ```

use super::toc::SectionKey;
use regex::Regex;
use std::sync::LazyLock;

pub const TITLE_FILE: &str = "title.txt";
pub const TOC_FILE: &str = "table_of_contents.txt";
pub const FINAL_BOOK_FILE: &str = "final_book.md";
pub const SECTIONS_DIR: &str = "sections";
pub const CHAPTERS_DIR: &str = "chapters";

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid sanitize regex"));
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_-]+").expect("valid separator regex"));

/// Directory name for a book title.
///
/// Drops everything outside word characters, whitespace and `-`, trims,
/// lowercases, then collapses runs of whitespace, `_` and `-` into `_`.
pub fn sanitize_title(title: &str) -> String {
    let kept = DISALLOWED.replace_all(title, "");
    let lowered = kept.trim().to_lowercase();
    SEPARATORS.replace_all(&lowered, "_").into_owned()
}

/// File name under `sections/` for one writing unit.
pub fn section_file_name(key: &SectionKey) -> String {
    match key.section {
        Some(number) => format!(
            "chapter_{}_section_{}_{}.md",
            key.chapter, number.major, number.minor
        ),
        None => chapter_file_name(key.chapter),
    }
}

/// File name of a compiled chapter under `chapters/`.
pub fn chapter_file_name(chapter: u32) -> String {
    format!("chapter_{}.md", chapter)
}

/// Drop lines that start with a `Consensus:` marker before content hits disk.
pub fn strip_marker_lines(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.trim_start().starts_with("Consensus:"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::toc::SectionNumber;

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("Hidden Tides"), "hidden_tides");
        assert_eq!(sanitize_title("  The Sea: A History!  "), "the_sea_a_history");
        assert_eq!(sanitize_title("Deep -- Drift__Notes"), "deep_drift_notes");
        assert_eq!(sanitize_title("Océans profonds"), "océans_profonds");
    }

    #[test]
    fn test_sanitize_title_of_symbols_only() {
        assert_eq!(sanitize_title("?!"), "");
    }

    #[test]
    fn test_section_file_names() {
        assert_eq!(section_file_name(&SectionKey::chapter(2)), "chapter_2.md");
        assert_eq!(
            section_file_name(&SectionKey::section(1, SectionNumber::new(1, 10))),
            "chapter_1_section_1_10.md"
        );
    }

    #[test]
    fn test_strip_marker_lines() {
        let raw = "Consensus: True\nBody line\n  Consensus: False\nEnd";
        assert_eq!(strip_marker_lines(raw), "Body line\nEnd");
    }
}
