//! Book store port
//!
//! Defines how agreed artifacts are persisted and read back for compilation.
//! Every method is addressed by the book title; the adapter decides where
//! that title lives.

use async_trait::async_trait;
use colloquy_domain::SectionKey;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Invalid book title for storage: {0:?}")]
    InvalidTitle(String),

    #[error("I/O error at {path}: {message}")]
    Io { path: PathBuf, message: String },
}

/// Persistence collaborator for a book in progress
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn write_title(&self, title: &str) -> Result<PathBuf, StorageError>;

    async fn write_table_of_contents(&self, title: &str, toc: &str)
    -> Result<PathBuf, StorageError>;

    /// Raw ToC text, or `None` if it was never written
    async fn read_table_of_contents(&self, title: &str) -> Result<Option<String>, StorageError>;

    async fn write_section(
        &self,
        title: &str,
        key: &SectionKey,
        content: &str,
    ) -> Result<PathBuf, StorageError>;

    /// Section text, or `None` if the file does not exist
    async fn read_section(
        &self,
        title: &str,
        key: &SectionKey,
    ) -> Result<Option<String>, StorageError>;

    async fn write_chapter(
        &self,
        title: &str,
        chapter: u32,
        content: &str,
    ) -> Result<PathBuf, StorageError>;

    /// Compiled chapter text, or `None` if the file does not exist
    async fn read_chapter(&self, title: &str, chapter: u32)
    -> Result<Option<String>, StorageError>;

    async fn write_final_book(&self, title: &str, content: &str) -> Result<PathBuf, StorageError>;
}
