//! Rule analysis
//!
//! The [`Analyzer`] trait describes the long-lived analysis engine the plugin
//! drives: it is built once with the global options, lints one file at a time
//! and accumulates findings until told to forget them. [`AnalysisSession`]
//! wraps an analyzer so that every lint starts from a clean slate.

pub mod engine;
pub mod formatter;
pub mod session;

pub use engine::BuiltinLinter;
pub use formatter::{FindingFormatter, OutputFormat};
pub use session::AnalysisSession;

use crate::config::{Configuration, RuleSeverity};
use crate::result::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Analysis engine driven by the plugin
pub trait Analyzer: Send {
    /// Lint one file, adding its findings to the accumulated ones
    fn lint(&mut self, path: &Path, content: &str, config: &Configuration) -> Result<()>;

    /// Summary of every finding accumulated so far
    fn result(&self) -> LintResult;

    /// Forget all accumulated findings
    fn clear_findings(&mut self);
}

/// Zero-based position within a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

/// One reported problem
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub name: PathBuf,
    pub rule_name: String,
    pub rule_severity: RuleSeverity,
    pub failure: String,
    pub start_position: Position,
}

impl Finding {
    pub fn is_error(&self) -> bool {
        self.rule_severity == RuleSeverity::Error
    }
}

/// Outcome of the findings accumulated by an analyzer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LintResult {
    pub error_count: usize,
    pub warning_count: usize,
    pub failures: Vec<Finding>,
    /// Findings rendered by the configured formatter
    pub output: String,
}
