//! Error types for document generation

use thiserror::Error;

/// Failures while producing a PDF. No partial output accompanies an error.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template rendering failed: {0}")]
    Template(#[from] askama::Error),

    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Browser did not finish within {0} seconds")]
    Timeout(u64),

    #[error("Browser exited with {status}: {stderr}")]
    BrowserFailed { status: String, stderr: String },

    #[error("Browser produced no valid PDF: {0}")]
    InvalidOutput(String),

    #[error("Invalid renderer configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures while patching a Word package.
#[derive(Debug, Error)]
pub enum PatchError {
    #[error("Invalid document package: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Missing package part: {0}")]
    MissingPart(String),

    #[error("Malformed package part {part}: {reason}")]
    Malformed { part: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Patch task failed: {0}")]
    Task(String),
}

impl PatchError {
    pub(crate) fn malformed(part: &str, reason: impl Into<String>) -> Self {
        PatchError::Malformed {
            part: part.to_string(),
            reason: reason.into(),
        }
    }
}
