//! Configuration file discovery and loading
//!
//! The [`ConfigStore`] trait is the seam between the plugin and whatever
//! knows how to find and read configuration files. [`FileConfigStore`] reads
//! `tslint.json` / `tslint.yaml` / `tslint.yml` files from disk and resolves
//! their `extends` chains.

use super::configuration::Configuration;
use super::raw::RawConfigFile;
use crate::error::BrulintError;
use crate::result::Result;
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Config file names, checked in this order within each directory
pub const CONFIG_FILENAMES: &[&str] = &["tslint.json", "tslint.yaml", "tslint.yml"];

/// Prefix of the built-in preset names usable in `extends`
pub const PRESET_PREFIX: &str = "tslint:";

/// Locates and parses lint configurations
pub trait ConfigStore: Send + Sync {
    /// Parse settings supplied directly by the user as if they were the
    /// contents of a config file
    fn parse_inline_config(&self, raw: &Value) -> Result<Configuration>;

    /// Find the nearest config file for `start_dir`, searching upward
    fn find_nearest_config_path(&self, start_dir: &Path) -> Result<Option<PathBuf>>;

    /// Load and fully resolve the config file at `path`
    fn load_config_from_path(&self, path: &Path) -> Result<Configuration>;

    /// Merge `overlay` on top of `base`
    fn extend_configuration(&self, base: &Configuration, overlay: &Configuration) -> Configuration {
        base.extended_with(overlay)
    }

    /// The configuration governing `dir`, if any file is found
    fn load_config_at(&self, dir: &Path) -> Result<Option<Configuration>> {
        match self.find_nearest_config_path(dir)? {
            Some(path) => self.load_config_from_path(&path).map(Some),
            None => Ok(None),
        }
    }
}

/// Configuration store backed by the file system
#[derive(Debug, Clone, Default)]
pub struct FileConfigStore {
    /// Directory that relative `extends` entries of inline settings resolve
    /// against; the process working directory when unset
    inline_base_dir: Option<PathBuf>,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative `extends` entries of inline settings against `dir`
    pub fn with_inline_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.inline_base_dir = Some(dir.into());
        self
    }

    /// Read a config file into its raw form
    ///
    /// JSON files may contain comments and trailing commas.
    pub fn read_raw(path: &Path) -> Result<RawConfigFile> {
        let content = fs::read_to_string(path).map_err(|e| BrulintError::io_error(path, e))?;
        let ext = path.extension().and_then(|e| e.to_str());

        let value: Value = match ext {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| {
                BrulintError::config_error(format!("Invalid YAML in '{}': {}", path.display(), e))
            })?,
            _ => json5::from_str(&content).map_err(|e| {
                BrulintError::config_error(format!("Invalid JSON in '{}': {}", path.display(), e))
            })?,
        };

        RawConfigFile::from_value(&value).map_err(|e| {
            BrulintError::config_error(format!("Invalid config file '{}': {}", path.display(), e))
        })
    }

    fn load_recursive(&self, path: &Path, stack: &mut Vec<PathBuf>) -> Result<Configuration> {
        if stack.iter().any(|seen| seen == path) {
            let chain: Vec<String> = stack
                .iter()
                .chain(std::iter::once(&path.to_path_buf()))
                .map(|p| p.display().to_string())
                .collect();
            return Err(BrulintError::config_error(format!(
                "Circular extends: {}",
                chain.join(" -> ")
            )));
        }

        let raw = Self::read_raw(path)?;
        let config_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let extends = raw.extends();
        let config = raw.into_configuration(Some(config_dir))?;

        stack.push(path.to_path_buf());
        let resolved = self.resolve_extends(config, &extends, config_dir, stack);
        stack.pop();

        resolved
    }

    /// Fold every `extends` entry in order, then `config` itself on top
    fn resolve_extends(
        &self,
        config: Configuration,
        extends: &[String],
        base_dir: &Path,
        stack: &mut Vec<PathBuf>,
    ) -> Result<Configuration> {
        if extends.is_empty() {
            return Ok(config);
        }

        let mut merged = Configuration::default();
        for name in extends {
            let parent = match name.strip_prefix(PRESET_PREFIX) {
                Some(preset) => builtin_preset(preset)?,
                None => {
                    let parent_path = resolve_extends_path(name, base_dir)?;
                    debug!("Resolved extends '{}' to {}", name, parent_path.display());
                    self.load_recursive(&parent_path, stack)?
                }
            };
            merged.merge_with(&parent);
        }
        merged.merge_with(&config);

        Ok(merged)
    }
}

impl ConfigStore for FileConfigStore {
    fn parse_inline_config(&self, raw: &Value) -> Result<Configuration> {
        let raw = RawConfigFile::from_value(raw)?;
        let extends = raw.extends();
        let config = raw.into_configuration(None)?;
        if extends.is_empty() {
            return Ok(config);
        }

        let base_dir = match &self.inline_base_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()
                .map_err(|e| BrulintError::io_error(".", e))?,
        };
        self.resolve_extends(config, &extends, &base_dir, &mut Vec::new())
    }

    fn find_nearest_config_path(&self, start_dir: &Path) -> Result<Option<PathBuf>> {
        for dir in start_dir.ancestors() {
            for filename in CONFIG_FILENAMES {
                let config_path = dir.join(filename);
                if config_path.is_file() {
                    debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }
        }

        Ok(None)
    }

    fn load_config_from_path(&self, path: &Path) -> Result<Configuration> {
        let config = self.load_recursive(path, &mut Vec::new())?;
        info!("Loaded config from: {}", path.display());
        Ok(config)
    }
}

fn resolve_extends_path(name: &str, base_dir: &Path) -> Result<PathBuf> {
    let candidate = base_dir.join(name);
    if candidate.is_file() {
        return Ok(candidate);
    }

    let with_extension = base_dir.join(format!("{name}.json"));
    if with_extension.is_file() {
        return Ok(with_extension);
    }

    Err(BrulintError::config_error(format!(
        "Extended config not found: '{}' (looked in {})",
        name,
        base_dir.display()
    )))
}

/// Built-in presets referenced as `tslint:<name>`
pub fn builtin_preset(name: &str) -> Result<Configuration> {
    let raw = match name {
        "recommended" => json!({
            "rules": {
                "no-debugger": true,
                "no-eval": true
            }
        }),
        "latest" => json!({
            "rules": {
                "no-console": true,
                "no-debugger": true,
                "no-eval": true
            }
        }),
        "all" => json!({
            "rules": {
                "ban": true,
                "no-console": true,
                "no-debugger": true,
                "no-eval": true
            },
            "jsRules": true
        }),
        _ => {
            return Err(BrulintError::config_error(format!(
                "Unknown preset '{PRESET_PREFIX}{name}'"
            )));
        }
    };

    let mut config = RawConfigFile::from_value(&raw)?.into_configuration(None)?;
    config.extends = vec![format!("{PRESET_PREFIX}{name}")];
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::configuration::RuleSeverity;
    use tempfile::TempDir;

    fn create_temp_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
        let path = dir.join(filename);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_find_nearest_searches_upward() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("src/nested");
        fs::create_dir_all(&nested).unwrap();
        let config_path = create_temp_config(temp_dir.path(), "tslint.json", "{}");

        let found = FileConfigStore::new().find_nearest_config_path(&nested).unwrap();

        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_nearest_tolerates_missing_directories() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(temp_dir.path(), "tslint.yaml", "rules: {}");
        let missing = temp_dir.path().join("does/not/exist");

        let found = FileConfigStore::new().find_nearest_config_path(&missing).unwrap();

        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_filename_priority() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(temp_dir.path(), "tslint.yml", "rules: {}");
        create_temp_config(temp_dir.path(), "tslint.json", "{}");

        let found = FileConfigStore::new()
            .find_nearest_config_path(temp_dir.path())
            .unwrap();

        assert_eq!(found.unwrap().file_name().unwrap(), "tslint.json");
    }

    #[test]
    fn test_load_jsonc_with_comments() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_config(
            temp_dir.path(),
            "tslint.json",
            r#"{
                // console is fine here
                "rules": {
                    "no-console": false,
                },
                "rulesDirectory": "rules"
            }"#,
        );

        let config = FileConfigStore::new().load_config_from_path(&path).unwrap();

        assert_eq!(
            config.rule("no-console").unwrap().rule_severity,
            RuleSeverity::Off
        );
        assert_eq!(config.rules_directory, vec![temp_dir.path().join("rules")]);
    }

    #[test]
    fn test_load_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_config(
            temp_dir.path(),
            "tslint.yaml",
            "defaultSeverity: warning\nrules:\n  no-eval: true\n",
        );

        let config = FileConfigStore::new().load_config_from_path(&path).unwrap();

        assert_eq!(
            config.rule("no-eval").unwrap().rule_severity,
            RuleSeverity::Warning
        );
    }

    #[test]
    fn test_extends_relative_file_then_self() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(
            temp_dir.path(),
            "shared.json",
            r#"{"rules": {"no-eval": true, "no-console": true}}"#,
        );
        let path = create_temp_config(
            temp_dir.path(),
            "tslint.json",
            r#"{"extends": "./shared", "rules": {"no-console": false}}"#,
        );

        let config = FileConfigStore::new().load_config_from_path(&path).unwrap();

        assert_eq!(config.extends, vec!["./shared".to_string()]);
        assert_eq!(
            config.rule("no-eval").unwrap().rule_severity,
            RuleSeverity::Error
        );
        assert_eq!(
            config.rule("no-console").unwrap().rule_severity,
            RuleSeverity::Off
        );
    }

    #[test]
    fn test_extends_builtin_preset() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_config(
            temp_dir.path(),
            "tslint.json",
            r#"{"extends": ["tslint:recommended"], "rules": {"no-eval": false}}"#,
        );

        let config = FileConfigStore::new().load_config_from_path(&path).unwrap();

        assert!(config.rule("no-debugger").unwrap().is_enabled());
        assert!(!config.rule("no-eval").unwrap().is_enabled());
    }

    #[test]
    fn test_circular_extends_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(temp_dir.path(), "a.json", r#"{"extends": "./b.json"}"#);
        let path = create_temp_config(temp_dir.path(), "b.json", r#"{"extends": "./a.json"}"#);

        let err = FileConfigStore::new().load_config_from_path(&path).unwrap_err();

        assert!(err.to_string().contains("Circular extends"));
    }

    #[test]
    fn test_missing_extends_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_config(
            temp_dir.path(),
            "tslint.json",
            r#"{"extends": "./nowhere.json"}"#,
        );

        let result = FileConfigStore::new().load_config_from_path(&path);

        assert!(matches!(result, Err(BrulintError::ConfigError { .. })));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_config(temp_dir.path(), "tslint.json", "{ invalid json }");

        assert!(FileConfigStore::new().load_config_from_path(&path).is_err());
    }

    #[test]
    fn test_inline_extends_resolves_against_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(temp_dir.path(), "team.json", r#"{"rules": {"no-debugger": true}}"#);
        let store = FileConfigStore::new().with_inline_base_dir(temp_dir.path());

        let config = store
            .parse_inline_config(&json!({"extends": "./team.json", "rules": {"no-console": false}}))
            .unwrap();

        assert!(config.rule("no-debugger").unwrap().is_enabled());
        assert!(!config.rule("no-console").unwrap().is_enabled());
    }

    #[test]
    fn test_unknown_preset_is_an_error() {
        assert!(builtin_preset("strictest").is_err());
        assert_eq!(
            builtin_preset("all").unwrap().extends,
            vec!["tslint:all".to_string()]
        );
    }

    #[test]
    fn test_load_config_at_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a");
        fs::create_dir_all(&nested).unwrap();
        create_temp_config(temp_dir.path(), "tslint.json", r#"{"rules": {"no-eval": true}}"#);

        let config = FileConfigStore::new().load_config_at(&nested).unwrap().unwrap();

        assert!(config.rule("no-eval").unwrap().is_enabled());
    }

    #[test]
    fn test_extend_configuration_matches_merge() {
        let store = FileConfigStore::new();
        let base = store
            .parse_inline_config(&json!({"rules": {"no-eval": true, "no-console": true}}))
            .unwrap();
        let overlay = store
            .parse_inline_config(&json!({"rules": {"no-console": false}}))
            .unwrap();

        let merged = store.extend_configuration(&base, &overlay);

        assert_eq!(merged, base.extended_with(&overlay));
        assert!(!merged.rule("no-console").unwrap().is_enabled());
        assert!(base.rule("no-console").unwrap().is_enabled());
    }
}
