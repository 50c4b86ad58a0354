//! Build-pipeline linter plugin
//!
//! The host pipeline only sees [`LinterPlugin`]: it constructs the plugin
//! once per build from its configuration, asks which files it wants via
//! [`LinterPlugin::pattern`], and calls [`LinterPlugin::lint`] per file.
//!
//! Per file, [`TsLintPlugin`]:
//! 1. computes the probe chain from the root boundary to the file's directory
//! 2. asks the [`ConfigStore`] for the config governing each directory
//! 3. merges what was found over the base config, innermost winning
//! 4. lints through the [`AnalysisSession`]

use crate::analysis::{AnalysisSession, Analyzer, BuiltinLinter};
use crate::config::{
    BuildConfig, ConfigStore, Configuration, FileConfigStore, FilePattern, GlobalOptions,
    merge_chain,
};
use crate::error::BrulintError;
use crate::paths::resolve_probe_chain;
use crate::result::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// A source file handed over by the host, already read from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub data: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, data: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            data: data.into(),
        }
    }
}

/// Interface the build pipeline uses to drive a linter
#[async_trait]
pub trait LinterPlugin: Send + Sync {
    /// Construct from the whole build configuration
    fn construct(build_config: &BuildConfig) -> Result<Self>
    where
        Self: Sized;

    /// Which files this plugin lints
    fn pattern(&self) -> &FilePattern;

    /// Lint one file
    ///
    /// `Ok(true)` when the file passed; `Err(BrulintError::LintFailed)` with
    /// the formatted findings when it did not.
    async fn lint(&self, file: &SourceFile) -> Result<bool>;
}

/// Supplies the configuration store and analysis engine
pub trait Backend {
    fn config_store(&self) -> Arc<dyn ConfigStore>;

    fn create_analyzer(&self, options: &GlobalOptions) -> Result<Box<dyn Analyzer>>;
}

/// File-system config store with the built-in analyzer
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultBackend;

impl Backend for DefaultBackend {
    fn config_store(&self) -> Arc<dyn ConfigStore> {
        Arc::new(FileConfigStore::new())
    }

    fn create_analyzer(&self, options: &GlobalOptions) -> Result<Box<dyn Analyzer>> {
        Ok(Box::new(BuiltinLinter::new(options.clone())?))
    }
}

/// Root boundary, base config and store: everything config resolution reads
struct ConfigResolver {
    root: PathBuf,
    base_config: Configuration,
    store: Arc<dyn ConfigStore>,
}

impl ConfigResolver {
    fn resolve(&self, path: &Path) -> Result<Configuration> {
        let chain = resolve_probe_chain(&self.root, path);

        let mut discovered = Vec::new();
        let mut last_found: Option<PathBuf> = None;
        for dir in &chain {
            let Some(config_path) = self.store.find_nearest_config_path(dir)? else {
                continue;
            };
            // Upward search makes repeats adjacent; folding one twice is a no-op.
            if last_found.as_ref() == Some(&config_path) {
                continue;
            }
            discovered.push(self.store.load_config_from_path(&config_path)?);
            last_found = Some(config_path);
        }

        debug!(
            "{} config(s) apply to {}",
            discovered.len(),
            path.display()
        );
        Ok(merge_chain(&self.base_config, &discovered))
    }
}

/// Linter plugin resolving per-directory `tslint.json` configurations
pub struct TsLintPlugin {
    pattern: FilePattern,
    options: GlobalOptions,
    resolver: Arc<ConfigResolver>,
    session: AnalysisSession,
}

impl TsLintPlugin {
    /// Construct with the default backend
    pub fn new(build_config: &BuildConfig) -> Result<Self> {
        Self::with_backend(build_config, &DefaultBackend)
    }

    /// Construct with an explicit store and analyzer source
    ///
    /// Fails without constructing anything if the base config, the file
    /// pattern or the options are malformed.
    pub fn with_backend(build_config: &BuildConfig, backend: &dyn Backend) -> Result<Self> {
        let settings = build_config.plugin_settings();

        let pattern = settings.file_pattern()?;
        let root = settings.root_dir();
        let store = backend.config_store();
        let base_config = store.parse_inline_config(&settings.base_config())?;
        let options = settings.global_options()?;
        let analyzer = backend.create_analyzer(&options)?;

        info!(
            "Linting files matching {} with root {}",
            pattern.as_str(),
            root.display()
        );

        Ok(Self {
            pattern,
            options,
            resolver: Arc::new(ConfigResolver {
                root,
                base_config,
                store,
            }),
            session: AnalysisSession::new(analyzer),
        })
    }

    pub fn root(&self) -> &Path {
        &self.resolver.root
    }

    pub fn base_config(&self) -> &Configuration {
        &self.resolver.base_config
    }

    pub fn options(&self) -> &GlobalOptions {
        &self.options
    }

    /// The effective configuration for `path`
    ///
    /// Built fresh on every call; nothing is cached between files. Reads the
    /// file system, so async callers go through [`Self::resolve_config_async`].
    pub fn resolve_config(&self, path: &Path) -> Result<Configuration> {
        self.resolver.resolve(path)
    }

    /// [`Self::resolve_config`] on the blocking thread pool
    pub async fn resolve_config_async(&self, path: &Path) -> Result<Configuration> {
        let resolver = Arc::clone(&self.resolver);
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || resolver.resolve(&path))
            .await
            .map_err(|e| BrulintError::internal_error(format!("Config resolution failed: {e}")))?
    }
}

#[async_trait]
impl LinterPlugin for TsLintPlugin {
    fn construct(build_config: &BuildConfig) -> Result<Self> {
        Self::new(build_config)
    }

    fn pattern(&self) -> &FilePattern {
        &self.pattern
    }

    async fn lint(&self, file: &SourceFile) -> Result<bool> {
        let config = self.resolve_config_async(&file.path).await?;
        self.session
            .lint_one(&file.path, &file.data, &config)
            .await?;
        Ok(true)
    }
}
