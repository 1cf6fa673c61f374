//! Console output formatter for the book report

use crate::output::formatter::OutputFormatter;
use colloquy_application::{ArtifactReport, BookReport};
use colloquy_domain::NegotiationOutcome;
use colloquy_domain::core::string::truncate;
use colored::Colorize;

/// Formats a finished book run for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete report
    pub fn format(report: &BookReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Book Complete"));
        output.push('\n');

        output.push_str(&format!("{} {}\n", "Title:".cyan().bold(), report.title));
        output.push_str(&format!(
            "{} {}\n",
            "Final book:".cyan().bold(),
            report.final_book.display()
        ));

        output.push_str(&Self::section_header("Negotiations"));
        output.push_str(&format!(
            "  {:<20} {}\n",
            "title",
            Self::artifact_summary(&report.title_negotiation)
        ));
        output.push_str(&format!(
            "  {:<20} {}\n",
            "table of contents",
            Self::artifact_summary(&report.toc_negotiation)
        ));

        output.push_str(&Self::section_header(&format!(
            "Sections ({}/{} written)",
            report.sections_written(),
            report.sections.len()
        )));
        for section in &report.sections {
            let mark = if section.is_written() {
                "v".green()
            } else {
                "x".red()
            };
            let label = format!("{} {}", section.key, section.title);
            output.push_str(&format!(
                "  {} {:<40} {}\n",
                mark,
                truncate(&label, 40),
                Self::artifact_summary(&section.negotiation)
            ));
            if let Some(error) = &section.error {
                output.push_str(&format!("      {} {}\n", "error:".red(), error));
            }
        }

        if !report.missing_sections.is_empty() || !report.missing_chapters.is_empty() {
            output.push_str(&format!("\n{}\n", "Missing from compilation:".yellow().bold()));
            for key in &report.missing_sections {
                output.push_str(&format!("  * {}\n", key));
            }
            for chapter in &report.missing_chapters {
                output.push_str(&format!("  * Chapter {} (compiled file)\n", chapter));
            }
        }

        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(report: &BookReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    fn artifact_summary(report: &ArtifactReport) -> String {
        let turns = if report.turns_used == 1 {
            "1 turn".to_string()
        } else {
            format!("{} turns", report.turns_used)
        };
        let outcome = match report.outcome {
            NegotiationOutcome::Converged => "converged".green(),
            NegotiationOutcome::Recovered => "recovered".yellow(),
            NegotiationOutcome::Failed => "failed".red(),
        };
        if report.aborted {
            format!("{} ({}, aborted)", outcome, turns)
        } else {
            format!("{} ({})", outcome, turns)
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, report: &BookReport) -> String {
        Self::format(report)
    }

    fn format_json(&self, report: &BookReport) -> String {
        Self::format_json(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colloquy_application::SectionReport;
    use colloquy_domain::{SectionKey, SectionNumber};
    use std::path::PathBuf;

    fn artifact(outcome: NegotiationOutcome, turns_used: u32) -> ArtifactReport {
        ArtifactReport {
            outcome,
            turns_used,
            aborted: false,
        }
    }

    fn sample_report() -> BookReport {
        let written = SectionKey::section(1, SectionNumber { major: 1, minor: 1 });
        let skipped = SectionKey::section(1, SectionNumber { major: 1, minor: 2 });
        BookReport {
            title: "Hidden Tides".to_string(),
            table_of_contents: "1. Currents\n1.1. Gyres\n1.2. Eddies".to_string(),
            title_negotiation: artifact(NegotiationOutcome::Converged, 1),
            toc_negotiation: artifact(NegotiationOutcome::Recovered, 10),
            sections: vec![
                SectionReport {
                    key: written,
                    title: "Gyres".to_string(),
                    negotiation: artifact(NegotiationOutcome::Converged, 3),
                    path: Some(PathBuf::from("books/hidden_tides/sections/x.md")),
                    error: None,
                },
                SectionReport {
                    key: skipped,
                    title: "Eddies".to_string(),
                    negotiation: ArtifactReport {
                        outcome: NegotiationOutcome::Failed,
                        turns_used: 0,
                        aborted: true,
                    },
                    path: None,
                    error: None,
                },
            ],
            missing_sections: vec![skipped],
            missing_chapters: Vec::new(),
            final_book: PathBuf::from("books/hidden_tides/final_book.md"),
        }
    }

    #[test]
    fn test_format_summarizes_sections() {
        let text = ConsoleFormatter::format(&sample_report());
        assert!(text.contains("Hidden Tides"));
        assert!(text.contains("Sections (1/2 written)"));
        assert!(text.contains("Section 1.1 Gyres"));
        assert!(text.contains("1 turn)"));
        assert!(text.contains("aborted"));
        assert!(text.contains("* Section 1.2"));
    }

    #[test]
    fn test_format_json_flattens_section_negotiation() {
        let json = ConsoleFormatter::format_json(&sample_report());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["title"], "Hidden Tides");
        assert_eq!(value["toc_negotiation"]["outcome"], "recovered");
        assert_eq!(value["sections"][0]["outcome"], "converged");
        assert_eq!(value["sections"][1]["aborted"], true);
    }
}
