//! Build configuration consumed by the plugin
//!
//! The build pipeline hands the plugin its whole configuration object. Only
//! `plugins.tslint` is read:
//!
//! ```yaml
//! plugins:
//!   tslint:
//!     pattern: "^app/.*\\.ts$"
//!     root: ./app
//!     config:
//!       extends: tslint:recommended
//!       rules:
//!         no-console: false
//!     options:
//!       quiet: true
//!       formatter: verbose
//!       rulesDirectory: [custom-rules]
//! ```

use super::raw::OneOrMany;
use crate::error::BrulintError;
use crate::paths::normalize_path;
use crate::result::Result;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fs;
use std::path::{MAIN_SEPARATOR_STR, Path, PathBuf};
use tracing::warn;

/// Files linted when no pattern is configured
pub const DEFAULT_PATTERN: &str = r"^app/.*\.ts$";

/// Formatter used when none is configured
pub const DEFAULT_FORMATTER: &str = "prose";

/// Whole build configuration; everything but `plugins.tslint` is ignored
///
/// Sections and settings of the wrong shape are dropped with a warning and
/// their defaults used instead.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    #[serde(deserialize_with = "lenient")]
    pub plugins: Option<PluginsSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PluginsSection {
    #[serde(deserialize_with = "lenient")]
    pub tslint: Option<PluginSettings>,
}

/// Settings under `plugins.tslint`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PluginSettings {
    /// Regular expression selecting the files to lint
    #[serde(deserialize_with = "lenient")]
    pub pattern: Option<String>,
    /// Directory bounding the per-directory config search
    #[serde(deserialize_with = "lenient")]
    pub root: Option<PathBuf>,
    /// Base configuration, in config file form
    pub config: Option<Value>,
    /// Global linter options
    pub options: Option<Value>,
}

impl BuildConfig {
    /// Build from an in-memory value
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| BrulintError::config_error(format!("Invalid build configuration: {e}")))
    }

    /// Load from a JSON, YAML or TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| BrulintError::io_error(path, e))?;
        let ext = path.extension().and_then(|e| e.to_str());

        let parsed: std::result::Result<Self, String> = match ext {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
            Some("json") => serde_json::from_str(&content).map_err(|e| e.to_string()),
            Some("toml") => toml::from_str(&content).map_err(|e| e.to_string()),
            _ => Err("Unsupported file extension (expected .json, .yaml, .yml or .toml)".to_string()),
        };

        parsed.map_err(|message| {
            BrulintError::config_error(format!(
                "Failed to load build config from '{}': {}",
                path.display(),
                message
            ))
        })
    }

    /// This plugin's settings, or the defaults when absent
    pub fn plugin_settings(&self) -> PluginSettings {
        self.plugins
            .as_ref()
            .and_then(|plugins| plugins.tslint.clone())
            .unwrap_or_default()
    }
}

impl PluginSettings {
    /// The file pattern, falling back to [`DEFAULT_PATTERN`] when unset or empty
    pub fn file_pattern(&self) -> Result<FilePattern> {
        let pattern = self
            .pattern
            .as_deref()
            .filter(|pattern| !pattern.is_empty())
            .unwrap_or(DEFAULT_PATTERN);
        FilePattern::new(pattern)
    }

    /// The root boundary
    ///
    /// Defaults to the filesystem root. A configured root is only used when it
    /// exists and is a directory.
    pub fn root_dir(&self) -> PathBuf {
        let default_root = PathBuf::from(MAIN_SEPARATOR_STR);
        match &self.root {
            Some(root) if root.is_dir() => normalize_path(root),
            Some(root) => {
                warn!(
                    "Ignoring root '{}': not an existing directory",
                    root.display()
                );
                default_root
            }
            None => default_root,
        }
    }

    /// The raw base configuration; `{}` when absent
    pub fn base_config(&self) -> Value {
        self.config
            .clone()
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()))
    }

    /// Global options with defaults applied
    pub fn global_options(&self) -> Result<GlobalOptions> {
        let empty = serde_json::Map::new();
        let bag = match &self.options {
            Some(Value::Object(map)) => map,
            _ => &empty,
        };
        GlobalOptions::from_bag(bag)
    }
}

/// Options that apply to every lint run
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalOptions {
    /// Attempt to fix problems rather than only report them
    pub fix: bool,
    /// Only report errors
    pub quiet: bool,
    /// Name of the output formatter
    pub formatter: String,
    /// Where custom formatters live
    pub formatters_directory: Option<PathBuf>,
    /// Where custom rules live, searched in order
    pub rules_directory: Vec<PathBuf>,
}

impl Default for GlobalOptions {
    fn default() -> Self {
        Self {
            fix: false,
            quiet: false,
            formatter: DEFAULT_FORMATTER.to_string(),
            formatters_directory: None,
            rules_directory: Vec::new(),
        }
    }
}

impl GlobalOptions {
    /// Read options from the options bag; unknown keys are ignored
    pub fn from_bag(bag: &serde_json::Map<String, Value>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            fix: get_option(bag, "fix")?.unwrap_or(defaults.fix),
            quiet: get_option(bag, "quiet")?.unwrap_or(defaults.quiet),
            formatter: get_option(bag, "formatter")?.unwrap_or(defaults.formatter),
            formatters_directory: get_option(bag, "formattersDirectory")?,
            rules_directory: get_option::<OneOrMany<PathBuf>>(bag, "rulesDirectory")?
                .map(OneOrMany::into_vec)
                .unwrap_or(defaults.rules_directory),
        })
    }
}

/// Deserialize an optional setting, treating a value of the wrong shape as unset
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            warn!("Ignoring malformed build setting: {e}");
            Ok(None)
        }
    }
}

fn get_option<T: DeserializeOwned>(
    bag: &serde_json::Map<String, Value>,
    field: &str,
) -> Result<Option<T>> {
    match bag.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone()).map(Some).map_err(|e| {
            BrulintError::config_error(format!("Invalid value for option '{field}': {e}"))
        }),
    }
}

/// Selects which files the plugin lints
#[derive(Debug, Clone)]
pub struct FilePattern {
    regex: Regex,
}

impl FilePattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| {
            BrulintError::config_error(format!("Invalid file pattern '{pattern}': {e}"))
        })?;
        Ok(Self { regex })
    }

    /// Match a path, using `/` as separator on every platform
    pub fn is_match(&self, path: &Path) -> bool {
        let normalized = path.to_string_lossy().replace('\\', "/");
        self.regex.is_match(&normalized)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}
