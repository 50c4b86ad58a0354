//! Brulint Core
//!
//! Resolves the effective lint configuration for each file a build pipeline
//! hands over, by merging `tslint.json` style configs found between a root
//! boundary and the file's directory over a base configuration, and lints the
//! file through a shared, reset-before-use analysis session.

pub mod analysis;
pub mod config;
pub mod error;
pub mod paths;
pub mod plugin;
pub mod result;

// Re-export commonly used types
pub use analysis::{
    AnalysisSession, Analyzer, BuiltinLinter, Finding, FindingFormatter, LintResult,
    OutputFormat, Position,
};
pub use config::{
    BuildConfig, ConfigStore, Configuration, FileConfigStore, FilePattern, GlobalOptions,
    PluginSettings, RuleMap, RuleSetting, RuleSeverity, merge_chain,
};
pub use error::{BrulintError, ErrorKind};
pub use paths::{normalize_path, resolve_probe_chain};
pub use plugin::{Backend, DefaultBackend, LinterPlugin, SourceFile, TsLintPlugin};
pub use result::{Result, ResultExt};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("brulint_core=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
