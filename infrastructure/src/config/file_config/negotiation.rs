//! Negotiation budgets from TOML (`[negotiation]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [negotiation]
//! max_turns = 10
//! max_consecutive_failures = 3
//! turn_timeout_secs = 120     # 0 disables the per-turn deadline
//!
//! [negotiation.title]
//! max_turns = 6
//!
//! [negotiation.section]
//! turn_timeout_secs = 300
//! ```

use colloquy_application::config::{NegotiationBudgets, NegotiationParams};
use colloquy_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Base negotiation budget plus optional per-artifact overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileNegotiationConfig {
    pub max_turns: u32,
    pub max_consecutive_failures: u32,
    pub turn_timeout_secs: u64,
    pub title: FileNegotiationOverride,
    pub table_of_contents: FileNegotiationOverride,
    pub section: FileNegotiationOverride,
}

impl Default for FileNegotiationConfig {
    fn default() -> Self {
        Self {
            max_turns: 10,
            max_consecutive_failures: 3,
            turn_timeout_secs: 120,
            title: FileNegotiationOverride::default(),
            table_of_contents: FileNegotiationOverride::default(),
            section: FileNegotiationOverride::default(),
        }
    }
}

/// Fields left unset fall back to the base `[negotiation]` values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileNegotiationOverride {
    pub max_turns: Option<u32>,
    pub max_consecutive_failures: Option<u32>,
    pub turn_timeout_secs: Option<u64>,
}

fn timeout(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

impl FileNegotiationConfig {
    fn base(&self) -> NegotiationParams {
        NegotiationParams::default()
            .with_max_turns(self.max_turns)
            .with_max_consecutive_failures(self.max_consecutive_failures)
            .with_turn_timeout(timeout(self.turn_timeout_secs))
    }

    fn apply(&self, over: &FileNegotiationOverride) -> NegotiationParams {
        let mut params = self.base();
        if let Some(max) = over.max_turns {
            params.max_turns = max;
        }
        if let Some(max) = over.max_consecutive_failures {
            params.max_consecutive_failures = max;
        }
        if let Some(secs) = over.turn_timeout_secs {
            params.turn_timeout = timeout(secs);
        }
        params
    }

    /// Resolve the effective parameters for every artifact kind
    pub fn to_budgets(&self) -> NegotiationBudgets {
        NegotiationBudgets {
            title: self.apply(&self.title),
            table_of_contents: self.apply(&self.table_of_contents),
            section: self.apply(&self.section),
        }
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        let scopes = [
            ("negotiation.title", self.apply(&self.title)),
            (
                "negotiation.table_of_contents",
                self.apply(&self.table_of_contents),
            ),
            ("negotiation.section", self.apply(&self.section)),
        ];

        for (scope, params) in scopes {
            if params.max_turns == 0 {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::ZeroValue {
                        field: format!("{}.max_turns", scope),
                    },
                    format!("{}.max_turns: must be at least 1", scope),
                ));
            }
            if params.max_consecutive_failures == 0 {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::ZeroValue {
                        field: format!("{}.max_consecutive_failures", scope),
                    },
                    format!(
                        "{}.max_consecutive_failures: 0 is treated as 1",
                        scope
                    ),
                ));
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_fall_back_to_base() {
        let toml_str = r#"
max_turns = 8
turn_timeout_secs = 0

[title]
max_turns = 4

[section]
turn_timeout_secs = 300
"#;
        let config: FileNegotiationConfig = toml::from_str(toml_str).unwrap();
        let budgets = config.to_budgets();

        assert_eq!(budgets.title.max_turns, 4);
        assert_eq!(budgets.title.max_consecutive_failures, 3);
        assert!(budgets.title.turn_timeout.is_none());
        assert_eq!(budgets.table_of_contents.max_turns, 8);
        assert_eq!(budgets.section.max_turns, 8);
        assert_eq!(budgets.section.turn_timeout, Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_validate_zero_budgets() {
        let config = FileNegotiationConfig {
            max_consecutive_failures: 0,
            section: FileNegotiationOverride {
                max_turns: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };
        let issues = config.validate();

        let errors: Vec<_> = issues.iter().filter(|i| i.is_error()).collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.starts_with("negotiation.section.max_turns"));
        assert_eq!(issues.iter().filter(|i| !i.is_error()).count(), 3);
    }
}
