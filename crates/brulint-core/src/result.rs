//! Result type alias for brulint operations

use crate::error::BrulintError;

/// Standard Result type for brulint operations
pub type Result<T> = std::result::Result<T, BrulintError>;

/// Extension trait for Result to provide additional convenience methods
pub trait ResultExt<T> {
    /// Treat a failed lint as a `false` outcome, keeping other errors
    fn findings_as_false(self) -> Result<bool>;
}

impl ResultExt<bool> for Result<bool> {
    fn findings_as_false(self) -> Result<bool> {
        match self {
            Ok(value) => Ok(value),
            Err(err) if err.findings_output().is_some() => {
                tracing::debug!("Lint reported findings");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }
}
