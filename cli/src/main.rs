//! CLI entrypoint for colloquy
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use colloquy_application::{
    CompositeObserver, ConversationLogObserver, NegotiationObserver, WriteBookUseCase,
};
use colloquy_domain::{OutputFormat, Topic};
use colloquy_infrastructure::{
    ConfigLoader, FileConfig, FsBookStore, JsonlConversationLogger, OpenAiGateway,
};
use colloquy_presentation::{Cli, ConsoleFormatter, ConsoleReporter};
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_tracing(cli.verbose, cli.log_dir.as_deref());

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    apply_cli_overrides(&cli, &mut config);

    let issues = config.validate();
    for issue in &issues {
        if issue.is_error() {
            eprintln!("config error: {}", issue.message);
        } else {
            eprintln!("config warning: {}", issue.message);
        }
    }
    if issues.iter().any(|i| i.is_error()) {
        bail!("Invalid configuration");
    }

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    let topic = match &cli.topic {
        Some(t) => t.clone(),
        None => prompt_topic()?,
    };
    let topic = Topic::try_new(topic)?;

    info!("Starting colloquy");

    // === Dependency Injection ===
    let settings = config.providers.openai.to_settings();
    if settings.api_key.is_none() {
        bail!(
            "No API key: set ${} or providers.openai.api_key in the config file",
            config.providers.openai.api_key_env
        );
    }
    let gateway = Arc::new(OpenAiGateway::new(settings));
    let store = Arc::new(FsBookStore::new(&config.book.output_dir));

    let reporter = Arc::new(if cli.quiet {
        ConsoleReporter::quiet()
    } else {
        ConsoleReporter::new()
    });
    let mut observers = CompositeObserver::default();
    observers.push(reporter.clone());
    if let Some(path) = &config.output.conversation_log {
        match JsonlConversationLogger::append(path) {
            Some(logger) => {
                info!("Logging conversation to {}", logger.path().display());
                observers.push(Arc::new(ConversationLogObserver::new(Arc::new(logger))));
            }
            None => warn!("Conversation log disabled"),
        }
    }
    let observer: Arc<dyn NegotiationObserver> = Arc::new(observers);

    // Ctrl-C cancels the run; files already written stay on disk
    let token = CancellationToken::new();
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling");
            ctrl_c_token.cancel();
        }
    });

    let use_case = WriteBookUseCase::new(gateway, store, config.to_book_config())
        .with_cancellation(token);

    let report = match use_case
        .execute_with_progress(topic, observer, reporter.as_ref())
        .await
    {
        Ok(report) => report,
        Err(e) if e.is_cancelled() => bail!("Cancelled before the book was finished"),
        Err(e) => return Err(e.into()),
    };

    let format = cli
        .output
        .map(OutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default();
    let output = match format {
        OutputFormat::Text => ConsoleFormatter::format(&report),
        OutputFormat::Json => ConsoleFormatter::format_json(&report),
    };
    println!("{}", output);

    Ok(())
}

/// Log to stderr, plus a daily rolling file when `log_dir` is set
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "colloquy.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(EnvFilter::new(level));
            tracing_subscriber::registry()
                .with(stderr_layer)
                .with(file_layer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(stderr_layer).init();
            None
        }
    }
}

/// Ask for the topic on stdin
fn prompt_topic() -> Result<String> {
    print!("Enter a book topic: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read the topic from stdin")?;
    Ok(line)
}

/// CLI flags beat every configuration source
fn apply_cli_overrides(cli: &Cli, config: &mut FileConfig) {
    if let Some(model) = &cli.model {
        config.models.default = Some(model.clone());
        config.models.zero = None;
        config.models.gustave = None;
    }
    if let Some(model) = &cli.zero_model {
        config.models.zero = Some(model.clone());
    }
    if let Some(model) = &cli.gustave_model {
        config.models.gustave = Some(model.clone());
    }

    // A flag sets the budget for every artifact kind, per-kind overrides included
    let negotiation = &mut config.negotiation;
    if let Some(max) = cli.max_turns {
        negotiation.max_turns = max;
        for over in [
            &mut negotiation.title,
            &mut negotiation.table_of_contents,
            &mut negotiation.section,
        ] {
            over.max_turns = None;
        }
    }
    if let Some(max) = cli.max_failures {
        negotiation.max_consecutive_failures = max;
        for over in [
            &mut negotiation.title,
            &mut negotiation.table_of_contents,
            &mut negotiation.section,
        ] {
            over.max_consecutive_failures = None;
        }
    }
    if let Some(secs) = cli.turn_timeout {
        negotiation.turn_timeout_secs = secs;
        for over in [
            &mut negotiation.title,
            &mut negotiation.table_of_contents,
            &mut negotiation.section,
        ] {
            over.turn_timeout_secs = None;
        }
    }

    if let Some(n) = cli.concurrency {
        config.book.concurrency = n;
    }
    if let Some(dir) = &cli.output_dir {
        config.book.output_dir = dir.display().to_string();
    }
    if let Some(path) = &cli.conversation_log {
        config.output.conversation_log = Some(path.display().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("colloquy").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_model_flag_replaces_persona_models() {
        let mut config = FileConfig::default();
        config.models.zero = Some("gpt-4.1".to_string());

        apply_cli_overrides(&parse(&["--model", "o3-mini"]), &mut config);
        let models = config.models.to_persona_models();
        assert_eq!(models.zero, colloquy_domain::Model::O3Mini);
        assert_eq!(models.gustave, colloquy_domain::Model::O3Mini);
    }

    #[test]
    fn test_max_turns_flag_beats_per_kind_override() {
        let mut config = FileConfig::default();
        config.negotiation.title.max_turns = Some(4);

        apply_cli_overrides(&parse(&["--max-turns", "7", "-j", "2"]), &mut config);
        let book = config.to_book_config();
        assert_eq!(book.budgets.title.max_turns, 7);
        assert_eq!(book.budgets.section.max_turns, 7);
        assert_eq!(book.concurrency, 2);
    }

    #[test]
    fn test_no_flags_leave_config_untouched() {
        let mut config = FileConfig::default();
        config.book.output_dir = "out".to_string();

        apply_cli_overrides(&parse(&[]), &mut config);
        assert_eq!(config.book.output_dir, "out");
        assert!(config.output.conversation_log.is_none());
    }
}
