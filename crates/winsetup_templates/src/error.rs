//! Error types for templates.

use std::path::PathBuf;
use thiserror::Error;

use winsetup_core::WinSetupError;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur during template operations.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template directory does not exist: {0}")]
    MissingDirectory(PathBuf),

    #[error("Template rendering failed: {0}")]
    RenderingFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<TemplateError> for WinSetupError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::Io(io) => WinSetupError::Io(io),
            TemplateError::RenderingFailed(message) => WinSetupError::Template(message),
            other => WinSetupError::Template(other.to_string()),
        }
    }
}
