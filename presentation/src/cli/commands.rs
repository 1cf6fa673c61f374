//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the final report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Text,
    /// JSON output
    Json,
}

impl From<OutputFormat> for colloquy_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => colloquy_domain::OutputFormat::Text,
            OutputFormat::Json => colloquy_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for colloquy
#[derive(Parser, Debug)]
#[command(name = "colloquy")]
#[command(author, version, about = "Two AI personas negotiate a book into existence")]
#[command(long_about = r#"
Colloquy has two personas, Zero and Gustave, write a book together.

They take turns proposing and critiquing until one of them agrees:
1. Title: negotiated from your topic
2. Table of contents: negotiated from the title
3. Sections: one negotiation per section (or per chapter without sections)
4. Chapters and the final book are compiled from the written sections

Configuration files are loaded from (lowest to highest priority):
1. ~/.config/colloquy/config.toml   Global config
2. ./colloquy.toml                  Project-level config
3. --config <path>                  Explicit config file
4. COLLOQUY_* environment variables (COLLOQUY_BOOK__CONCURRENCY=4)

Example:
  colloquy "The secret life of ocean currents"
  colloquy --zero-model gpt-4.1 --gustave-model gpt-4o-mini -j 4 "Urban beekeeping"
  echo "Medieval siege engines" | colloquy -q --output json
"#)]
pub struct Cli {
    /// The book topic (read from stdin when omitted)
    pub topic: Option<String>,

    /// Model for both personas
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Model for Zero (overrides --model)
    #[arg(long, value_name = "MODEL")]
    pub zero_model: Option<String>,

    /// Model for Gustave (overrides --model)
    #[arg(long, value_name = "MODEL")]
    pub gustave_model: Option<String>,

    /// Turn budget for every negotiation
    #[arg(long, value_name = "N")]
    pub max_turns: Option<u32>,

    /// Consecutive invalid responses before a negotiation is aborted
    #[arg(long, value_name = "N")]
    pub max_failures: Option<u32>,

    /// Per-turn deadline in seconds (0 disables it)
    #[arg(long, value_name = "SECS")]
    pub turn_timeout: Option<u64>,

    /// Sections negotiated in parallel
    #[arg(short = 'j', long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Directory that receives the book directory
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Append every negotiation event to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub conversation_log: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print outcomes, no transcript or progress bars
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Write diagnostic logs to a daily rolling file in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
