//! Error types and handling for lint configuration and analysis

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for brulint operations
#[derive(Debug, Error)]
pub enum BrulintError {
    /// Configuration loading, parsing or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The analyzed file has findings. Displays the formatted output verbatim.
    #[error("{output}")]
    LintFailed { output: String },

    /// The analysis capability itself failed
    #[error("Analysis error: {message}")]
    AnalysisError { message: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Io,
    Findings,
    Analysis,
    Internal,
}

impl BrulintError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            BrulintError::ConfigError { .. } => ErrorKind::Config,
            BrulintError::IoError { .. } => ErrorKind::Io,
            BrulintError::LintFailed { .. } => ErrorKind::Findings,
            BrulintError::AnalysisError { .. } => ErrorKind::Analysis,
            BrulintError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    /// Check if the host can keep linting other files after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Findings | ErrorKind::Config | ErrorKind::Io
        )
    }

    /// Formatted findings carried by a failed lint, if this is one
    pub fn findings_output(&self) -> Option<&str> {
        match self {
            BrulintError::LintFailed { output } => Some(output),
            _ => None,
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create a lint failure carrying formatted findings
    pub fn lint_failed(output: impl Into<String>) -> Self {
        Self::LintFailed {
            output: output.into(),
        }
    }

    /// Create an analysis error
    pub fn analysis_error(message: impl Into<String>) -> Self {
        Self::AnalysisError {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lint_failed_displays_output_verbatim() {
        let err = BrulintError::lint_failed("2 problems");
        assert_eq!(err.to_string(), "2 problems");
        assert_eq!(err.findings_output(), Some("2 problems"));
        assert_eq!(err.kind(), ErrorKind::Findings);
    }

    #[test]
    fn test_config_error_kind() {
        let err = BrulintError::config_error("bad rules");
        assert_eq!(err.to_string(), "Configuration error: bad rules");
        assert!(err.findings_output().is_none());
        assert!(err.is_recoverable());
        assert!(!BrulintError::internal_error("boom").is_recoverable());
    }
}
