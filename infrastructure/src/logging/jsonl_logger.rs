//! JSONL file writer for conversation events.
//!
//! Each [`ConversationEvent`] is serialized as a single JSON line with a
//! `type` field and `timestamp`, appended to the file via a buffered writer.

use colloquy_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// JSONL conversation logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`, so concurrent section
/// negotiations can share one log. Flushes on `Drop`.
pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Create a new logger writing to the given path, truncating it.
    ///
    /// Creates parent directories if they don't exist.
    /// Returns `None` if the file cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        Self::open(path.as_ref(), false)
    }

    /// Like [`new`](Self::new), but keeps existing lines and appends after them.
    pub fn append(path: impl AsRef<Path>) -> Option<Self> {
        Self::open(path.as_ref(), true)
    }

    fn open(path: &Path, append: bool) -> Option<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create conversation log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path);
        let file = match file {
            Ok(f) => f,
            Err(e) => {
                warn!(
                    "Could not open conversation log file {}: {}",
                    path.display(),
                    e
                );
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        // Merge payload with type + timestamp
        let record = if let serde_json::Value::Object(mut map) = event.payload {
            map.insert(
                "type".to_string(),
                serde_json::Value::String(event.event_type.to_string()),
            );
            map.insert(
                "timestamp".to_string(),
                serde_json::Value::String(timestamp),
            );
            serde_json::Value::Object(map)
        } else {
            serde_json::json!({
                "type": event.event_type,
                "timestamp": timestamp,
                "data": event.payload,
            })
        };

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colloquy_application::ports::conversation_logger::ConversationLogObserver;
    use colloquy_application::ports::negotiation_observer::NegotiationObserver;
    use colloquy_domain::{NegotiationResult, Role, SeedContext};
    use std::sync::Arc;

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_negotiation_events_become_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/run.conversation.jsonl");
        let logger = Arc::new(JsonlConversationLogger::new(&path).unwrap());
        let observer = ConversationLogObserver::new(logger.clone());
        let ctx = SeedContext::table_of_contents("Hidden Tides");

        observer.on_negotiation_start(&ctx);
        observer.on_turn(1, Role::A, "1. Origins");
        observer.on_outcome(&ctx, &NegotiationResult::converged("1. Origins", 1));
        drop(observer);
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 3);
        for line in &lines {
            assert!(line.get("timestamp").is_some());
        }
        assert_eq!(lines[0]["type"], "negotiation_start");
        assert_eq!(lines[0]["artifact"], "table_of_contents");
        assert_eq!(lines[1]["type"], "turn");
        assert_eq!(lines[1]["speaker"], "Zero");
        assert_eq!(lines[2]["outcome"], "converged");
        assert_eq!(lines[2]["payload"], "1. Origins");
    }

    #[test]
    fn test_non_object_payload_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.jsonl");
        let logger = JsonlConversationLogger::new(&path).unwrap();

        logger.log(ConversationEvent::new(
            "note",
            serde_json::json!("just a string"),
        ));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines[0]["type"], "note");
        assert_eq!(lines[0]["data"], "just a string");
    }

    #[test]
    fn test_append_keeps_previous_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.jsonl");

        let first = JsonlConversationLogger::new(&path).unwrap();
        first.log(ConversationEvent::new("run", serde_json::json!({ "n": 1 })));
        drop(first);

        let second = JsonlConversationLogger::append(&path).unwrap();
        second.log(ConversationEvent::new("run", serde_json::json!({ "n": 2 })));
        drop(second);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["n"], 2);

        let truncated = JsonlConversationLogger::new(&path).unwrap();
        drop(truncated);
        assert!(std::fs::read_to_string(&path).unwrap().is_empty());
    }
}
