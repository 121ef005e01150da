//! File system port
//!
//! Read access to the project a file selection runs against. Paths are
//! relative to the project root.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileSystemError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("path escapes the project root: {0}")]
    OutsideRoot(String),

    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },
}

#[async_trait]
pub trait FileSystemPort: Send + Sync {
    /// Read a file as UTF-8 text.
    async fn read_file(&self, path: &str) -> Result<String, FileSystemError>;

    /// Indented listing of the project's files, used to orient the model.
    async fn file_tree(&self) -> Result<String, FileSystemError>;
}
