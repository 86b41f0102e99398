//! Error types for the setup pipeline.

use thiserror::Error;

/// Result type alias for setup operations.
pub type WinSetupResult<T> = Result<T, WinSetupError>;

/// Errors that can occur while preparing or rendering a Windows setup.
#[derive(Error, Debug)]
pub enum WinSetupError {
    #[error("Missing required parameters: {}", .0.join(", "))]
    MissingParameter(Vec<String>),

    #[error("Incomplete static IP configuration. Missing parameters: {}", .0.join(", "))]
    IncompleteStaticIpConfig(Vec<String>),

    #[error("Unrecognized parameters: {}", .0.join(", "))]
    UnknownParameter(Vec<String>),

    #[error("Invalid value for parameter {key}: {message}")]
    InvalidParameter { key: String, message: String },

    #[error("Template rendering failed: {0}")]
    Template(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Unexpected(String),
}

impl WinSetupError {
    /// Whether the error is a parameter problem the caller can fix, as opposed
    /// to a failure inside a collaborator or the host.
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            WinSetupError::MissingParameter(_)
                | WinSetupError::IncompleteStaticIpConfig(_)
                | WinSetupError::UnknownParameter(_)
                | WinSetupError::InvalidParameter { .. }
        )
    }
}
