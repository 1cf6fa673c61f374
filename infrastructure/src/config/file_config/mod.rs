//! Raw TOML configuration data types
//!
//! These structs mirror the TOML file one section at a time. They are
//! deserialized directly and converted into application types by the
//! `to_*` helpers.

mod book;
mod models;
mod negotiation;
mod output;
mod providers;

pub use book::FileBookConfig;
pub use models::FileModelsConfig;
pub use negotiation::{FileNegotiationConfig, FileNegotiationOverride};
pub use output::FileOutputConfig;
pub use providers::{FileOpenAiConfig, FileProvidersConfig};

use colloquy_application::config::BookConfig;
use colloquy_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Persona model selection
    pub models: FileModelsConfig,
    /// Turn and failure budgets
    pub negotiation: FileNegotiationConfig,
    /// Output directory and section concurrency
    pub book: FileBookConfig,
    /// Report and log output
    pub output: FileOutputConfig,
    /// Backend credentials and endpoints
    pub providers: FileProvidersConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.models.validate());
        issues.extend(self.negotiation.validate());
        issues.extend(self.book.validate());
        issues
    }

    /// Build the application-level configuration for one book run
    pub fn to_book_config(&self) -> BookConfig {
        BookConfig::new(
            self.models.to_persona_models(),
            self.negotiation.to_budgets(),
            self.book.concurrency,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colloquy_domain::{Model, OutputFormat};
    use std::time::Duration;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[models]
zero = "gpt-4.1"
gustave = "o3-mini"

[negotiation]
max_turns = 12
turn_timeout_secs = 60

[negotiation.table_of_contents]
max_turns = 20

[book]
output_dir = "out"
concurrency = 4

[output]
format = "json"
color = false

[providers.openai]
base_url = "http://localhost:8080"
max_tokens = 2048
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.models.parse_zero().0, Some(Model::Gpt41));
        assert_eq!(config.models.parse_gustave().0, Some(Model::O3Mini));
        assert_eq!(config.book.output_dir, "out");
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(!config.output.color);
        assert_eq!(config.providers.openai.base_url, "http://localhost:8080");
        assert_eq!(config.providers.openai.max_tokens, 2048);

        let book = config.to_book_config();
        assert_eq!(book.concurrency, 4);
        assert_eq!(book.budgets.title.max_turns, 12);
        assert_eq!(book.budgets.table_of_contents.max_turns, 20);
        assert_eq!(book.budgets.section.turn_timeout, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[models]
default = "gpt-4o-mini"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let models = config.models.to_persona_models();
        assert_eq!(models.zero, Model::Gpt4oMini);
        assert_eq!(models.gustave, Model::Gpt4oMini);
        // Defaults should apply
        assert_eq!(config.negotiation.max_turns, 10);
        assert_eq!(config.book.concurrency, 1);
        assert_eq!(config.book.output_dir, "books");
        assert!(config.output.color);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_collects_every_section() {
        let toml_str = r#"
[models]
gustave = ""

[negotiation]
max_turns = 0

[book]
concurrency = 0
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        // three max_turns scopes + concurrency
        assert_eq!(issues.iter().filter(|i| i.is_error()).count(), 4);
        assert_eq!(issues.iter().filter(|i| !i.is_error()).count(), 1);
    }
}
