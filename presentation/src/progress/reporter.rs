//! IRC-style console transcript and section progress
//!
//! Every utterance is printed on one line as `<Zero> ...` or `<Gustave> ...`,
//! with pipeline events as `* ...` system lines. While sections are being
//! written an `indicatif` bar tracks them; lines are printed above it.

use colloquy_application::{BookProgressNotifier, BookStage, NegotiationObserver, TurnFailure};
use colloquy_domain::core::string::collapse_whitespace;
use colloquy_domain::{
    ArtifactKind, NegotiationOutcome, NegotiationResult, Role, SectionKey, SeedContext,
    WritingUnit,
};
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Mutex;

/// Console observer for negotiations and the book pipeline
pub struct ConsoleReporter {
    multi: MultiProgress,
    stage_bar: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            stage_bar: Mutex::new(None),
            quiet: false,
        }
    }

    /// Only outcomes and warnings; no transcript, no bars
    pub fn quiet() -> Self {
        Self {
            quiet: true,
            ..Self::new()
        }
    }

    fn stage_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn emit(&self, line: String) {
        self.multi.suspend(|| println!("{}", line));
    }

    fn emit_verbose(&self, line: String) {
        if !self.quiet {
            self.emit(line);
        }
    }

    /// `<Zero> body` with the body folded onto one line
    pub fn agent_line(role: Role, body: &str) -> String {
        let name = match role {
            Role::A => role.persona_name().cyan().bold(),
            Role::B => role.persona_name().blue().bold(),
        };
        format!("<{}> {}", name, collapse_whitespace(body))
    }

    pub fn system_line(message: &str) -> String {
        format!("* {}", message).dimmed().to_string()
    }

    pub fn warning_line(message: &str) -> String {
        format!("* Warning: {}", message).yellow().to_string()
    }

    pub fn error_line(message: &str) -> String {
        format!("* Error: {}", message).red().bold().to_string()
    }

    pub fn success_line(message: &str) -> String {
        format!("* Success: {}", message).green().bold().to_string()
    }

    /// Lines reporting how a negotiation ended
    pub fn outcome_lines(context: &SeedContext, result: &NegotiationResult) -> Vec<String> {
        let what = context.describe();
        let mut lines = match result.outcome() {
            NegotiationOutcome::Converged => vec![Self::success_line(&format!(
                "agreed on {} after {} turn(s)",
                what, result.turns_used
            ))],
            NegotiationOutcome::Recovered => vec![Self::warning_line(&format!(
                "no agreement on {} after {} turn(s), using the last proposal",
                what, result.turns_used
            ))],
            NegotiationOutcome::Failed => {
                return vec![Self::error_line(&format!("no usable {}", what))];
            }
        };

        if let Some(payload) = &result.payload {
            match context.kind() {
                ArtifactKind::Title => {
                    lines.push(Self::system_line(&format!("Final Book Title: {}", payload)));
                }
                ArtifactKind::TableOfContents => {
                    lines.push(Self::system_line("Final Table of Contents:"));
                    lines.push(payload.clone());
                }
                ArtifactKind::Section => {}
            }
        }
        lines
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl NegotiationObserver for ConsoleReporter {
    fn on_negotiation_start(&self, context: &SeedContext) {
        self.emit_verbose(Self::system_line(&format!("Negotiating {}", context.describe())));
    }

    fn on_turn(&self, _turn: u32, role: Role, body: &str) {
        self.emit_verbose(Self::agent_line(role, body));
    }

    fn on_invalid_response(&self, role: Role, failure: &TurnFailure, consecutive: u32) {
        self.emit_verbose(Self::warning_line(&format!(
            "{} gave an invalid response ({}), {} in a row",
            role, failure, consecutive
        )));
    }

    fn on_ambiguous_extraction(&self, role: Role, context: &SeedContext) {
        self.emit_verbose(Self::warning_line(&format!(
            "{} agreed on {} without labeling the result",
            role,
            context.describe()
        )));
    }

    fn on_outcome(&self, context: &SeedContext, result: &NegotiationResult) {
        for line in Self::outcome_lines(context, result) {
            self.emit(line);
        }
    }

    fn on_cancelled(&self, context: &SeedContext) {
        self.emit(Self::warning_line(&format!(
            "negotiation of {} cancelled",
            context.describe()
        )));
    }
}

impl BookProgressNotifier for ConsoleReporter {
    fn on_stage_start(&self, stage: BookStage, total: usize) {
        if self.quiet {
            return;
        }
        if stage == BookStage::Sections && total > 0 {
            let pb = self.multi.add(ProgressBar::new(total as u64));
            pb.set_style(Self::stage_style());
            pb.set_prefix("Sections");
            pb.set_message("Starting...");
            if let Ok(mut bar) = self.stage_bar.lock() {
                *bar = Some(pb);
            }
        } else {
            self.emit(Self::system_line(&format!("Stage: {}", stage)));
        }
    }

    fn on_unit_complete(&self, unit: &WritingUnit, success: bool) {
        if !success {
            self.emit(Self::error_line(&format!("Failed to write {}.", unit.key)));
        }
        if let Ok(bar) = self.stage_bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            let status = if success {
                format!("{} {}", "v".green(), unit.key)
            } else {
                format!("{} {}", "x".red(), unit.key)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_stage_complete(&self, stage: BookStage) {
        let finished = self.stage_bar.lock().ok().and_then(|mut bar| bar.take());
        if let Some(pb) = finished {
            pb.finish_with_message(format!("{} complete!", stage.as_str().green()));
        }
        if stage == BookStage::Sections {
            self.emit_verbose(Self::system_line("All sections have been processed."));
        }
    }

    fn on_missing_file(&self, key: &SectionKey) {
        self.emit(Self::warning_line(&format!("no file for {}, skipping", key)));
    }

    fn on_missing_chapter(&self, chapter: u32) {
        self.emit(Self::warning_line(&format!(
            "Chapter {} was not compiled, leaving it out of the book",
            chapter
        )));
    }

    fn on_book_written(&self, path: &Path) {
        self.emit(Self::success_line(&format!(
            "final book written to {}",
            path.display()
        )));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colloquy_domain::Topic;

    #[test]
    fn test_agent_line_folds_whitespace() {
        let line = ConsoleReporter::agent_line(Role::B, "How about\n\n  Hidden   Tides?");
        assert!(line.contains("Gustave"));
        assert!(line.ends_with("How about Hidden Tides?"));
    }

    #[test]
    fn test_title_outcome_shows_title() {
        let context = SeedContext::title(Topic::try_new("ocean currents").unwrap());
        let lines =
            ConsoleReporter::outcome_lines(&context, &NegotiationResult::converged("Hidden Tides", 1));
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("agreed on book title after 1 turn(s)"));
        assert!(lines[1].contains("Final Book Title: Hidden Tides"));
    }

    #[test]
    fn test_recovered_toc_prints_contents() {
        let context = SeedContext::table_of_contents("Hidden Tides");
        let toc = "1. Currents\n1.1. Gyres";
        let result = NegotiationResult::forced(Some(toc.to_string()), 10, false);
        let lines = ConsoleReporter::outcome_lines(&context, &result);
        assert!(lines[0].contains("using the last proposal"));
        assert_eq!(lines.last().map(String::as_str), Some(toc));
    }

    #[test]
    fn test_failed_section_is_one_error_line() {
        let context = SeedContext::section("Hidden Tides", "1. Currents", "1", "Currents");
        let lines = ConsoleReporter::outcome_lines(&context, &NegotiationResult::forced(None, 3, true));
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("no usable Section 1: Currents"));
    }
}
