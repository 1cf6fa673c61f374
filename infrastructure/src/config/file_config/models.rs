//! Persona model configuration from TOML (`[models]` section)

use colloquy_application::config::PersonaModels;
use colloquy_domain::{ConfigIssue, ConfigIssueCode, Model};
use serde::{Deserialize, Serialize};

/// Which model backs each persona
///
/// # Example
///
/// ```toml
/// [models]
/// default = "gpt-4o"        # used for any persona left unset
/// zero = "gpt-4.1"
/// gustave = "gpt-4o-mini"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    pub default: Option<String>,
    pub zero: Option<String>,
    pub gustave: Option<String>,
}

impl FileModelsConfig {
    /// Parse a single model string, collecting issues for empty names.
    fn parse_single_model(field: &str, value: Option<&String>) -> (Option<Model>, Vec<ConfigIssue>) {
        match value {
            None => (None, Vec::new()),
            Some(s) if s.trim().is_empty() => (
                None,
                vec![ConfigIssue::warning(
                    ConfigIssueCode::EmptyModelName {
                        field: format!("models.{}", field),
                    },
                    format!("models.{}: model name is empty, using the default", field),
                )],
            ),
            Some(s) => {
                let Ok(model) = s.trim().parse::<Model>();
                (Some(model), Vec::new())
            }
        }
    }

    pub fn parse_default(&self) -> (Option<Model>, Vec<ConfigIssue>) {
        Self::parse_single_model("default", self.default.as_ref())
    }

    pub fn parse_zero(&self) -> (Option<Model>, Vec<ConfigIssue>) {
        Self::parse_single_model("zero", self.zero.as_ref())
    }

    pub fn parse_gustave(&self) -> (Option<Model>, Vec<ConfigIssue>) {
        Self::parse_single_model("gustave", self.gustave.as_ref())
    }

    /// Resolve both personas, falling back to `default` and then to [`Model::default`].
    pub fn to_persona_models(&self) -> PersonaModels {
        let fallback = self.parse_default().0.unwrap_or_default();
        PersonaModels {
            zero: self.parse_zero().0.unwrap_or_else(|| fallback.clone()),
            gustave: self.parse_gustave().0.unwrap_or(fallback),
        }
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.parse_default().1);
        issues.extend(self.parse_zero().1);
        issues.extend(self.parse_gustave().1);
        issues
    }
}
