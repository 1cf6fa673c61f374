//! Write Book use case
//!
//! Orchestrates the full book pipeline:
//!
//! ```text
//! topic ─▶ title ─▶ table of contents ─▶ sections (pooled) ─▶ chapters ─▶ final book
//! ```
//!
//! The title and the ToC must produce a payload for the pipeline to go on.
//! A section without one is skipped and shows up as missing when its chapter
//! is compiled.

use crate::config::BookConfig;
use crate::ports::book_progress::{BookProgressNotifier, BookStage, NoBookProgress};
use crate::ports::book_store::{BookStore, StorageError};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::negotiation_observer::{NegotiationObserver, NoObserver};
use crate::use_cases::negotiate::{NegotiationEngine, NegotiationError, NegotiationInput};
use colloquy_domain::{
    ArtifactKind, NegotiationOutcome, NegotiationResult, SectionKey, SeedContext, TableOfContents,
    Topic, WritingUnit, compile_book, compile_chapter,
};
use serde::Serialize;
use std::collections::HashMap;
use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that stop the book pipeline
#[derive(Error, Debug)]
pub enum WriteBookError {
    #[error("No title could be agreed on or recovered")]
    NoTitle,

    #[error("No table of contents could be agreed on or recovered")]
    NoTableOfContents,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Operation cancelled")]
    Cancelled,
}

impl WriteBookError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, WriteBookError::Cancelled)
    }
}

impl From<NegotiationError> for WriteBookError {
    fn from(e: NegotiationError) -> Self {
        match e {
            NegotiationError::Cancelled => WriteBookError::Cancelled,
        }
    }
}

/// How one negotiated artifact turned out
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactReport {
    pub outcome: NegotiationOutcome,
    pub turns_used: u32,
    pub aborted: bool,
}

impl From<&NegotiationResult> for ArtifactReport {
    fn from(result: &NegotiationResult) -> Self {
        Self {
            outcome: result.outcome(),
            turns_used: result.turns_used,
            aborted: result.aborted,
        }
    }
}

/// How one section turned out
#[derive(Debug, Clone, Serialize)]
pub struct SectionReport {
    pub key: SectionKey,
    pub title: String,
    #[serde(flatten)]
    pub negotiation: ArtifactReport,
    /// Where the text was written, if it was
    pub path: Option<PathBuf>,
    /// Persistence failure for this section only
    pub error: Option<String>,
}

impl SectionReport {
    pub fn is_written(&self) -> bool {
        self.path.is_some()
    }

    /// Report for a unit whose task died before producing a result
    fn task_failed(unit: &WritingUnit, message: &str) -> Self {
        Self {
            key: unit.key,
            title: unit.title.clone(),
            negotiation: ArtifactReport {
                outcome: NegotiationOutcome::Failed,
                turns_used: 0,
                aborted: true,
            },
            path: None,
            error: Some(format!("section task failed: {}", message)),
        }
    }
}

/// Summary of a finished book
#[derive(Debug, Clone, Serialize)]
pub struct BookReport {
    pub title: String,
    pub table_of_contents: String,
    pub title_negotiation: ArtifactReport,
    pub toc_negotiation: ArtifactReport,
    pub sections: Vec<SectionReport>,
    pub missing_sections: Vec<SectionKey>,
    pub missing_chapters: Vec<u32>,
    pub final_book: PathBuf,
}

impl BookReport {
    pub fn sections_written(&self) -> usize {
        self.sections.iter().filter(|s| s.is_written()).count()
    }
}

/// Use case for writing a whole book from a topic
pub struct WriteBookUseCase<G: LlmGateway + 'static, S: BookStore + 'static> {
    engine: NegotiationEngine<G>,
    store: Arc<S>,
    config: BookConfig,
    cancellation_token: Option<CancellationToken>,
}

impl<G: LlmGateway + 'static, S: BookStore + 'static> WriteBookUseCase<G, S> {
    pub fn new(gateway: Arc<G>, store: Arc<S>, config: BookConfig) -> Self {
        Self {
            engine: NegotiationEngine::new(gateway),
            store,
            config,
            cancellation_token: None,
        }
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.engine = self.engine.with_cancellation(token.clone());
        self.cancellation_token = Some(token);
        self
    }

    /// Execute the use case without reporting
    pub async fn execute(&self, topic: Topic) -> Result<BookReport, WriteBookError> {
        self.execute_with_progress(topic, Arc::new(NoObserver), &NoBookProgress)
            .await
    }

    /// Execute the use case with negotiation and pipeline callbacks
    pub async fn execute_with_progress(
        &self,
        topic: Topic,
        observer: Arc<dyn NegotiationObserver>,
        progress: &dyn BookProgressNotifier,
    ) -> Result<BookReport, WriteBookError> {
        info!("Writing a book about: {}", topic);

        // Stage 1: Title
        progress.on_stage_start(BookStage::Title, 1);
        let title_result = self
            .negotiate(SeedContext::title(topic), observer.as_ref())
            .await?;
        let title = title_result.payload.clone().ok_or(WriteBookError::NoTitle)?;
        self.store.write_title(&title).await?;
        progress.on_stage_complete(BookStage::Title);
        info!("Title: {}", title);

        // Stage 2: Table of contents
        progress.on_stage_start(BookStage::TableOfContents, 1);
        let toc_result = self
            .negotiate(SeedContext::table_of_contents(&title), observer.as_ref())
            .await?;
        let toc_text = toc_result
            .payload
            .clone()
            .ok_or(WriteBookError::NoTableOfContents)?;
        self.store.write_table_of_contents(&title, &toc_text).await?;
        progress.on_stage_complete(BookStage::TableOfContents);

        let toc = TableOfContents::parse(&toc_text);
        if toc.is_empty() {
            warn!("The agreed table of contents has no numbered chapters");
        }

        // Stage 3: Sections
        let sections = self
            .write_sections(&title, &toc_text, &toc, observer, progress)
            .await?;

        // Stage 4: Chapters
        let missing_sections = self.compile_chapters(&title, &toc, progress).await?;

        // Stage 5: Final book
        let (final_book, missing_chapters) =
            self.compile_final_book(&title, &toc_text, &toc, progress).await?;

        Ok(BookReport {
            title,
            table_of_contents: toc_text,
            title_negotiation: ArtifactReport::from(&title_result),
            toc_negotiation: ArtifactReport::from(&toc_result),
            sections,
            missing_sections,
            missing_chapters,
            final_book,
        })
    }

    async fn negotiate(
        &self,
        context: SeedContext,
        observer: &dyn NegotiationObserver,
    ) -> Result<NegotiationResult, NegotiationError> {
        let params = self.config.budgets.for_kind(context.kind()).clone();
        let input = NegotiationInput::new(context, &self.config.models, params);
        self.engine.negotiate_with_observer(input, observer).await
    }

    /// Negotiate every writing unit through a bounded pool
    async fn write_sections(
        &self,
        title: &str,
        toc_text: &str,
        toc: &TableOfContents,
        observer: Arc<dyn NegotiationObserver>,
        progress: &dyn BookProgressNotifier,
    ) -> Result<Vec<SectionReport>, WriteBookError> {
        let units = toc.writing_units();
        info!(
            "Writing {} sections, {} at a time",
            units.len(),
            self.config.effective_concurrency()
        );
        progress.on_stage_start(BookStage::Sections, units.len());

        let semaphore = Arc::new(Semaphore::new(self.config.effective_concurrency()));
        let mut join_set = JoinSet::new();
        let mut in_flight = HashMap::new();

        for (index, unit) in units.into_iter().enumerate() {
            let engine = self.engine.clone();
            let store = Arc::clone(&self.store);
            let observer = Arc::clone(&observer);
            let semaphore = Arc::clone(&semaphore);
            let title = title.to_string();
            let context = SeedContext::section(
                title.clone(),
                toc_text,
                unit.key.display_number(),
                unit.title.clone(),
            );
            let input = NegotiationInput::new(
                context,
                &self.config.models,
                self.config.budgets.for_kind(ArtifactKind::Section).clone(),
            );

            let spawned_unit = unit.clone();
            let handle = join_set.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return (index, unit, Err(NegotiationError::Cancelled));
                };
                let result = engine
                    .negotiate_with_observer(input, observer.as_ref())
                    .await;
                let report = match result {
                    Ok(result) => Ok(Self::persist_section(&*store, &title, &unit, &result).await),
                    Err(e) => Err(e),
                };
                (index, unit, report)
            });
            in_flight.insert(handle.id(), (index, spawned_unit));
        }

        let mut reports = Vec::new();
        loop {
            let joined = if let Some(ref token) = self.cancellation_token {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        join_set.abort_all();
                        return Err(WriteBookError::Cancelled);
                    }
                    joined = join_set.join_next_with_id() => joined,
                }
            } else {
                join_set.join_next_with_id().await
            };

            let Some(joined) = joined else {
                break;
            };

            match joined {
                Ok((id, (index, unit, Ok(report)))) => {
                    in_flight.remove(&id);
                    progress.on_unit_complete(&unit, report.is_written());
                    reports.push((index, report));
                }
                Ok((_, (_, _, Err(e)))) => {
                    join_set.abort_all();
                    return Err(e.into());
                }
                Err(e) => {
                    let Some((index, unit)) = in_flight.remove(&e.id()) else {
                        warn!("Section task join error: {}", e);
                        continue;
                    };
                    warn!("{} task failed: {}", unit.key, e);
                    progress.on_unit_complete(&unit, false);
                    reports.push((index, SectionReport::task_failed(&unit, &e.to_string())));
                }
            }
        }

        progress.on_stage_complete(BookStage::Sections);
        reports.sort_by_key(|(index, _)| *index);
        Ok(reports.into_iter().map(|(_, report)| report).collect())
    }

    async fn persist_section(
        store: &S,
        title: &str,
        unit: &WritingUnit,
        result: &NegotiationResult,
    ) -> SectionReport {
        let mut report = SectionReport {
            key: unit.key,
            title: unit.title.clone(),
            negotiation: ArtifactReport::from(result),
            path: None,
            error: None,
        };

        match result.payload.as_deref() {
            Some(text) => match store.write_section(title, &unit.key, text).await {
                Ok(path) => {
                    debug!("{} written to {}", unit.key, path.display());
                    report.path = Some(path);
                }
                Err(e) => {
                    warn!("Failed to write {}: {}", unit.key, e);
                    report.error = Some(e.to_string());
                }
            },
            None => warn!("{} produced no text; skipping", unit.key),
        }
        report
    }

    /// Assemble each chapter from its section files
    async fn compile_chapters(
        &self,
        title: &str,
        toc: &TableOfContents,
        progress: &dyn BookProgressNotifier,
    ) -> Result<Vec<SectionKey>, WriteBookError> {
        progress.on_stage_start(BookStage::Chapters, toc.chapters.len());
        let mut missing = Vec::new();

        for chapter in toc.sorted_chapters() {
            info!("Compiling Chapter {}: {}", chapter.number, chapter.title);

            let keys: Vec<SectionKey> = if chapter.sections.is_empty() {
                vec![SectionKey::chapter(chapter.number)]
            } else {
                chapter
                    .sections
                    .iter()
                    .map(|s| SectionKey::section(chapter.number, s.number))
                    .collect()
            };

            let mut texts = HashMap::new();
            for key in keys {
                let text = self.store.read_section(title, &key).await?;
                texts.insert(key, text);
            }

            let compiled = compile_chapter::<Infallible, _>(chapter, |key| {
                Ok(texts.get(key).cloned().flatten())
            })
            .unwrap_or_else(|never| match never {});

            for key in &compiled.missing {
                warn!("{} file does not exist; skipping", key);
                progress.on_missing_file(key);
            }
            missing.extend(compiled.missing);

            self.store
                .write_chapter(title, compiled.number, &compiled.content)
                .await?;
        }

        progress.on_stage_complete(BookStage::Chapters);
        Ok(missing)
    }

    /// Assemble the final book from the compiled chapters
    async fn compile_final_book(
        &self,
        title: &str,
        toc_text: &str,
        toc: &TableOfContents,
        progress: &dyn BookProgressNotifier,
    ) -> Result<(PathBuf, Vec<u32>), WriteBookError> {
        progress.on_stage_start(BookStage::FinalBook, 1);

        let stored_toc = self
            .store
            .read_table_of_contents(title)
            .await?
            .unwrap_or_else(|| toc_text.to_string());

        let mut chapters = HashMap::new();
        for chapter in &toc.chapters {
            let text = self.store.read_chapter(title, chapter.number).await?;
            chapters.insert(chapter.number, text);
        }

        let book = compile_book::<Infallible, _, _>(title, &stored_toc, &toc.chapters, |number| {
            Ok(chapters.get(&number).cloned().flatten())
        })
        .unwrap_or_else(|never| match never {});

        for number in &book.missing_chapters {
            warn!("Chapter {} file does not exist; skipping", number);
            progress.on_missing_chapter(*number);
        }

        let path = self.store.write_final_book(title, &book.content).await?;
        info!("Final book compiled at {}", path.display());
        progress.on_book_written(&path);
        progress.on_stage_complete(BookStage::FinalBook);

        Ok((path, book.missing_chapters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NegotiationBudgets, NegotiationParams, PersonaModels};
    use crate::use_cases::negotiate::tests::{ScriptedGateway, ScriptedResponse, text};
    use async_trait::async_trait;
    use colloquy_domain::{Model, SectionNumber};
    use std::path::Path;
    use std::sync::Mutex;

    /// In-memory store keyed by relative path
    #[derive(Default)]
    struct MemoryBookStore {
        files: Mutex<HashMap<String, String>>,
        fail_section_writes: bool,
        panic_on_section: Option<&'static str>,
    }

    impl MemoryBookStore {
        fn failing_sections() -> Self {
            Self {
                fail_section_writes: true,
                ..Self::default()
            }
        }

        fn get(&self, path: &str) -> Option<String> {
            self.files.lock().unwrap().get(path).cloned()
        }

        fn put(&self, path: String, content: &str) -> PathBuf {
            self.files.lock().unwrap().insert(path.clone(), content.to_string());
            PathBuf::from(path)
        }
    }

    fn section_path(key: &SectionKey) -> String {
        format!("sections/{}", colloquy_domain::book::layout::section_file_name(key))
    }

    #[async_trait]
    impl BookStore for MemoryBookStore {
        async fn write_title(&self, title: &str) -> Result<PathBuf, StorageError> {
            Ok(self.put("title.txt".into(), title))
        }
        async fn write_table_of_contents(
            &self,
            _title: &str,
            toc: &str,
        ) -> Result<PathBuf, StorageError> {
            Ok(self.put("table_of_contents.txt".into(), toc))
        }
        async fn read_table_of_contents(
            &self,
            _title: &str,
        ) -> Result<Option<String>, StorageError> {
            Ok(self.get("table_of_contents.txt"))
        }
        async fn write_section(
            &self,
            _title: &str,
            key: &SectionKey,
            content: &str,
        ) -> Result<PathBuf, StorageError> {
            if self.panic_on_section == Some(key.display_number().as_str()) {
                panic!("store crashed writing {}", key);
            }
            if self.fail_section_writes {
                return Err(StorageError::Io {
                    path: PathBuf::from(section_path(key)),
                    message: "disk full".to_string(),
                });
            }
            Ok(self.put(section_path(key), content))
        }
        async fn read_section(
            &self,
            _title: &str,
            key: &SectionKey,
        ) -> Result<Option<String>, StorageError> {
            Ok(self.get(&section_path(key)))
        }
        async fn write_chapter(
            &self,
            _title: &str,
            chapter: u32,
            content: &str,
        ) -> Result<PathBuf, StorageError> {
            Ok(self.put(format!("chapters/chapter_{}.md", chapter), content))
        }
        async fn read_chapter(
            &self,
            _title: &str,
            chapter: u32,
        ) -> Result<Option<String>, StorageError> {
            Ok(self.get(&format!("chapters/chapter_{}.md", chapter)))
        }
        async fn write_final_book(
            &self,
            _title: &str,
            content: &str,
        ) -> Result<PathBuf, StorageError> {
            Ok(self.put("final_book.md".into(), content))
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<String>>,
    }

    impl BookProgressNotifier for RecordingProgress {
        fn on_stage_start(&self, stage: BookStage, total: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("start {} {}", stage, total));
        }
        fn on_unit_complete(&self, unit: &WritingUnit, success: bool) {
            self.events
                .lock()
                .unwrap()
                .push(format!("unit {} {}", unit.key.display_number(), success));
        }
        fn on_stage_complete(&self, stage: BookStage) {
            self.events.lock().unwrap().push(format!("done {}", stage));
        }
        fn on_missing_file(&self, key: &SectionKey) {
            self.events.lock().unwrap().push(format!("missing {}", key));
        }
        fn on_book_written(&self, path: &Path) {
            self.events
                .lock()
                .unwrap()
                .push(format!("book {}", path.display()));
        }
    }

    const TOC: &str = "1. Origins\n1.1. Early Maps\n1.2. Later Maps\n2. Currents";

    fn config(concurrency: usize) -> BookConfig {
        let mut budgets = NegotiationBudgets::default().map_all(|p| p.with_turn_timeout(None));
        budgets.section = NegotiationParams::default()
            .with_max_turns(2)
            .with_turn_timeout(None);
        BookConfig::new(PersonaModels::shared(Model::Gpt4oMini), budgets, concurrency)
    }

    fn opening() -> Vec<ScriptedResponse> {
        vec![
            text("Consensus: True\nBook Title: Hidden Tides"),
            text(&format!("Consensus: True\nTable of Contents:\n{}", TOC)),
        ]
    }

    #[tokio::test]
    async fn test_full_pipeline_compiles_book() {
        let mut responses = opening();
        responses.extend([
            text("Consensus: True\nEarly text"),
            text("Consensus: False\nDraft one\nHANDOFF: Requesting Gustave's feedback"),
            text("Consensus: False\nDraft two\nHANDOFF: Returning to Zero for input"),
            text("Consensus: True\nWhole chapter"),
        ]);
        let gateway = Arc::new(ScriptedGateway::new(responses));
        let store = Arc::new(MemoryBookStore::default());
        let progress = RecordingProgress::default();
        let use_case = WriteBookUseCase::new(gateway.clone(), store.clone(), config(1));

        let report = use_case
            .execute_with_progress(
                Topic::try_new("ocean currents").unwrap(),
                Arc::new(NoObserver),
                &progress,
            )
            .await
            .unwrap();

        assert_eq!(report.title, "Hidden Tides");
        assert_eq!(report.title_negotiation.outcome, NegotiationOutcome::Converged);
        assert_eq!(report.sections.len(), 3);
        assert_eq!(report.sections_written(), 3);
        assert_eq!(report.sections[1].negotiation.outcome, NegotiationOutcome::Recovered);
        assert!(report.missing_sections.is_empty());
        assert!(report.missing_chapters.is_empty());
        assert_eq!(report.final_book, PathBuf::from("final_book.md"));

        assert_eq!(store.get("title.txt").as_deref(), Some("Hidden Tides"));
        assert_eq!(
            store.get("chapters/chapter_1.md").unwrap(),
            "# Chapter 1: Origins\n\n\
             ## Section 1.1: Early Maps\n\nEarly text\n\n\
             ## Section 1.2: Later Maps\n\nDraft two\n\n"
        );
        assert_eq!(
            store.get("final_book.md").unwrap(),
            format!(
                "# Hidden Tides\n\n## Table of Contents\n\n{}\n\n{}\n\n{}\n\n",
                TOC,
                store.get("chapters/chapter_1.md").unwrap(),
                "# Chapter 2: Currents\n\nWhole chapter"
            )
        );

        let events = progress.events.lock().unwrap();
        assert_eq!(events[0], "start title 1");
        assert!(events.contains(&"start sections 3".to_string()));
        assert!(events.contains(&"unit 1.2 true".to_string()));
        assert_eq!(events.last().unwrap(), "done final book");
    }

    #[tokio::test]
    async fn test_section_prompt_carries_book_context() {
        let mut responses = opening();
        responses.extend((0..3).map(|_| text("Consensus: True\nBody")));
        let gateway = Arc::new(ScriptedGateway::new(responses));
        let use_case =
            WriteBookUseCase::new(gateway.clone(), Arc::new(MemoryBookStore::default()), config(1));

        use_case
            .execute(Topic::try_new("ocean currents").unwrap())
            .await
            .unwrap();

        let requests = gateway.requests.lock().unwrap();
        let section = &requests[2];
        assert_eq!(section.variables["book_title"], "Hidden Tides");
        assert_eq!(section.variables["section_number"], "1.1");
        assert_eq!(section.variables["full_toc"], TOC);
        assert!(section.instructions.contains("Current section: 1.1 Early Maps"));
        assert_eq!(requests[4].variables["section_number"], "2");
    }

    #[tokio::test]
    async fn test_no_title_stops_pipeline() {
        let gateway = Arc::new(ScriptedGateway::new(vec![text(""), text(""), text("")]));
        let store = Arc::new(MemoryBookStore::default());
        let use_case = WriteBookUseCase::new(gateway.clone(), store.clone(), config(1));

        let error = use_case
            .execute(Topic::try_new("ocean currents").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(error, WriteBookError::NoTitle));
        assert_eq!(gateway.call_count(), 3);
        assert!(store.files.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_skipped_section_is_reported_missing() {
        let mut responses = opening();
        responses.extend([
            text("Consensus: True\nEarly text"),
            text(""),
            text(""),
            text(""),
            text("Consensus: True\nWhole chapter"),
        ]);
        let store = Arc::new(MemoryBookStore::default());
        let progress = RecordingProgress::default();
        let use_case = WriteBookUseCase::new(
            Arc::new(ScriptedGateway::new(responses)),
            store.clone(),
            config(1),
        );

        let report = use_case
            .execute_with_progress(
                Topic::try_new("ocean currents").unwrap(),
                Arc::new(NoObserver),
                &progress,
            )
            .await
            .unwrap();

        let later = SectionKey::section(1, SectionNumber::new(1, 2));
        assert!(!report.sections[1].is_written());
        assert_eq!(report.sections[1].negotiation.outcome, NegotiationOutcome::Failed);
        assert_eq!(report.missing_sections, vec![later]);
        assert!(!store.get("chapters/chapter_1.md").unwrap().contains("Later Maps"));
        assert!(progress
            .events
            .lock()
            .unwrap()
            .contains(&"missing Section 1.2".to_string()));
    }

    #[tokio::test]
    async fn test_section_write_failure_is_collected() {
        let mut responses = opening();
        responses.extend((0..3).map(|_| text("Consensus: True\nBody")));
        let use_case = WriteBookUseCase::new(
            Arc::new(ScriptedGateway::new(responses)),
            Arc::new(MemoryBookStore::failing_sections()),
            config(1),
        );

        let report = use_case
            .execute(Topic::try_new("ocean currents").unwrap())
            .await
            .unwrap();

        assert_eq!(report.sections_written(), 0);
        assert!(report.sections.iter().all(|s| s.error.is_some()));
        assert_eq!(report.missing_sections.len(), 3);
    }

    #[tokio::test]
    async fn test_crashed_section_task_is_reported() {
        let mut responses = opening();
        responses.extend((0..3).map(|_| text("Consensus: True\nBody")));
        let store = Arc::new(MemoryBookStore {
            panic_on_section: Some("1.2"),
            ..MemoryBookStore::default()
        });
        let progress = RecordingProgress::default();
        let use_case = WriteBookUseCase::new(Arc::new(ScriptedGateway::new(responses)), store, config(1));

        let report = use_case
            .execute_with_progress(
                Topic::try_new("ocean currents").unwrap(),
                Arc::new(NoObserver),
                &progress,
            )
            .await
            .unwrap();

        let numbers: Vec<String> = report
            .sections
            .iter()
            .map(|s| s.key.display_number())
            .collect();
        assert_eq!(numbers, vec!["1.1", "1.2", "2"]);
        let crashed = &report.sections[1];
        assert!(!crashed.is_written());
        assert_eq!(crashed.negotiation.outcome, NegotiationOutcome::Failed);
        assert!(crashed.error.as_deref().unwrap().starts_with("section task failed"));
        assert_eq!(report.sections_written(), 2);
        assert!(
            progress
                .events
                .lock()
                .unwrap()
                .contains(&"unit 1.2 false".to_string())
        );
    }

    #[tokio::test]
    async fn test_concurrent_sections_keep_toc_order() {
        let mut responses = opening();
        responses.extend((0..3).map(|_| text("Consensus: True\nSame body")));
        let gateway = Arc::new(ScriptedGateway::new(responses));
        let use_case =
            WriteBookUseCase::new(gateway.clone(), Arc::new(MemoryBookStore::default()), config(3));

        let report = use_case
            .execute(Topic::try_new("ocean currents").unwrap())
            .await
            .unwrap();

        let numbers: Vec<String> = report
            .sections
            .iter()
            .map(|s| s.key.display_number())
            .collect();
        assert_eq!(numbers, vec!["1.1", "1.2", "2"]);
        assert_eq!(report.sections_written(), 3);
        assert_eq!(gateway.call_count(), 5);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let store = Arc::new(MemoryBookStore::default());
        let use_case = WriteBookUseCase::new(
            Arc::new(ScriptedGateway::new(opening())),
            store.clone(),
            config(1),
        )
        .with_cancellation(token);

        let error = use_case
            .execute(Topic::try_new("ocean currents").unwrap())
            .await
            .unwrap_err();

        assert!(error.is_cancelled());
        assert!(store.files.lock().unwrap().is_empty());
    }
}
