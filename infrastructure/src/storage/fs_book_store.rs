//! Filesystem adapter for the [`BookStore`] port.
//!
//! Every book lives in its own directory under the output root, named after
//! the sanitized title. Subdirectories are created on first write.

use async_trait::async_trait;
use colloquy_application::ports::book_store::{BookStore, StorageError};
use colloquy_domain::SectionKey;
use colloquy_domain::book::layout::{
    CHAPTERS_DIR, FINAL_BOOK_FILE, SECTIONS_DIR, TITLE_FILE, TOC_FILE, chapter_file_name,
    sanitize_title, section_file_name, strip_marker_lines,
};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct FsBookStore {
    root: PathBuf,
}

impl FsBookStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding every file of the book titled `title`.
    pub fn book_dir(&self, title: &str) -> Result<PathBuf, StorageError> {
        let name = sanitize_title(title);
        if name.is_empty() {
            return Err(StorageError::InvalidTitle(title.to_string()));
        }
        Ok(self.root.join(name))
    }

    async fn write(
        &self,
        title: &str,
        subdir: Option<&str>,
        file_name: &str,
        content: &str,
    ) -> Result<PathBuf, StorageError> {
        let mut dir = self.book_dir(title)?;
        if let Some(subdir) = subdir {
            dir = dir.join(subdir);
        }
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| io_error(&dir, e))?;

        let path = dir.join(file_name);
        tokio::fs::write(&path, strip_marker_lines(content))
            .await
            .map_err(|e| io_error(&path, e))?;
        debug!("Written to {}", path.display());
        Ok(path)
    }

    async fn read(
        &self,
        title: &str,
        subdir: Option<&str>,
        file_name: &str,
    ) -> Result<Option<String>, StorageError> {
        let mut path = self.book_dir(title)?;
        if let Some(subdir) = subdir {
            path = path.join(subdir);
        }
        let path = path.join(file_name);

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }
}

fn io_error(path: &Path, e: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

#[async_trait]
impl BookStore for FsBookStore {
    async fn write_title(&self, title: &str) -> Result<PathBuf, StorageError> {
        self.write(title, None, TITLE_FILE, title).await
    }

    async fn write_table_of_contents(
        &self,
        title: &str,
        toc: &str,
    ) -> Result<PathBuf, StorageError> {
        self.write(title, None, TOC_FILE, toc).await
    }

    async fn read_table_of_contents(&self, title: &str) -> Result<Option<String>, StorageError> {
        self.read(title, None, TOC_FILE).await
    }

    async fn write_section(
        &self,
        title: &str,
        key: &SectionKey,
        content: &str,
    ) -> Result<PathBuf, StorageError> {
        self.write(title, Some(SECTIONS_DIR), &section_file_name(key), content)
            .await
    }

    async fn read_section(
        &self,
        title: &str,
        key: &SectionKey,
    ) -> Result<Option<String>, StorageError> {
        self.read(title, Some(SECTIONS_DIR), &section_file_name(key))
            .await
    }

    async fn write_chapter(
        &self,
        title: &str,
        chapter: u32,
        content: &str,
    ) -> Result<PathBuf, StorageError> {
        self.write(title, Some(CHAPTERS_DIR), &chapter_file_name(chapter), content)
            .await
    }

    async fn read_chapter(
        &self,
        title: &str,
        chapter: u32,
    ) -> Result<Option<String>, StorageError> {
        self.read(title, Some(CHAPTERS_DIR), &chapter_file_name(chapter))
            .await
    }

    async fn write_final_book(&self, title: &str, content: &str) -> Result<PathBuf, StorageError> {
        self.write(title, None, FINAL_BOOK_FILE, content).await
    }
}
