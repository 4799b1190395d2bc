//! File store abstraction
//!
//! This module defines the [`FileStore`] trait the HTTP layer works against.

use acuda_core::models::{FilePage, FileQuery};
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::path::PathBuf;
use std::pin::Pin;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Invalid user folder: {0}")]
    InvalidRoot(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Chunked file contents
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// An opened file, ready to be streamed to the client.
pub struct StoredFile {
    pub name: String,
    pub size: u64,
    pub content_type: &'static str,
    pub stream: ByteStream,
}

/// A report written to a user's folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredReport {
    pub name: String,
    pub path: PathBuf,
}

/// Per-user document storage.
///
/// `ruta` is the folder recorded on the account, relative to the store's root.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// List regular files in the user's folder, newest first, filtered by a case-insensitive
    /// substring and paginated. A missing folder is created and yields an empty page.
    async fn list_files(&self, ruta: &str, query: &FileQuery) -> StorageResult<FilePage>;

    /// Persist a rendered report PDF under a timestamped name.
    async fn write_report(&self, ruta: &str, data: &[u8]) -> StorageResult<StoredReport>;

    /// Resolve `name` inside the user's folder and open it for streaming.
    ///
    /// Absence is checked before containment: a missing file is `NotFound` even when the name
    /// would escape the folder; an existing file outside it is `AccessDenied`.
    async fn open(&self, ruta: &str, name: &str) -> StorageResult<StoredFile>;
}
