//! Exclusive, reset-before-use access to a shared analyzer

use super::{Analyzer, LintResult};
use crate::config::Configuration;
use crate::error::BrulintError;
use crate::result::Result;
use std::path::Path;
use tokio::sync::Mutex;
use tracing::debug;

/// Owns the long-lived analyzer handle
///
/// The analyzer accumulates findings across calls, so each lint clears it
/// first. Clearing, linting and reading the result happen under a single lock
/// acquisition; two files can never interleave on the same handle.
pub struct AnalysisSession {
    analyzer: Mutex<Box<dyn Analyzer>>,
}

impl AnalysisSession {
    pub fn new(analyzer: Box<dyn Analyzer>) -> Self {
        Self {
            analyzer: Mutex::new(analyzer),
        }
    }

    /// Lint one file with `config`
    ///
    /// Returns the result when there are no errors, or
    /// [`BrulintError::LintFailed`] carrying the formatted output otherwise.
    pub async fn lint_one(
        &self,
        path: &Path,
        content: &str,
        config: &Configuration,
    ) -> Result<LintResult> {
        let mut analyzer = self.analyzer.lock().await;
        analyzer.clear_findings();
        analyzer.lint(path, content, config)?;
        let result = analyzer.result();
        drop(analyzer);

        if result.error_count == 0 {
            debug!(
                "{} passed with {} warning(s)",
                path.display(),
                result.warning_count
            );
            Ok(result)
        } else {
            debug!("{} failed with {} error(s)", path.display(), result.error_count);
            Err(BrulintError::lint_failed(result.output))
        }
    }
}
