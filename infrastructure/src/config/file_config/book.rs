//! Book pipeline configuration from TOML (`[book]` section)

use colloquy_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBookConfig {
    /// Root directory; each book gets a subdirectory named after its title
    pub output_dir: String,
    /// Section negotiations in flight at once
    pub concurrency: usize,
}

impl Default for FileBookConfig {
    fn default() -> Self {
        Self {
            output_dir: "books".to_string(),
            concurrency: 1,
        }
    }
}

impl FileBookConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.concurrency == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroValue {
                    field: "book.concurrency".to_string(),
                },
                "book.concurrency: must be at least 1",
            ));
        }
        if self.output_dir.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidValue {
                    field: "book.output_dir".to_string(),
                    value: self.output_dir.clone(),
                },
                "book.output_dir: cannot be empty",
            ));
        }
        issues
    }
}
