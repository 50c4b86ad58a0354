//! Configuration system for brulint
//!
//! This module covers everything between "settings written by a user" and
//! "one effective configuration for one file":
//! - Parsed configuration values (`rules`, `jsRules`, `extends`, ...)
//! - The `tslint.json` / `tslint.yaml` file format, including JSONC comments
//! - Upward discovery of config files and `extends` resolution
//! - Per-rule precedence merging of directory-scoped configurations
//! - The plugin's own settings inside the build configuration
//!
//! ## Precedence
//!
//! For a file `/proj/a/b/file.ts` linted with root `/proj`, the configs found
//! for `/proj`, `/proj/a` and `/proj/a/b` are merged over the base config in
//! that order, so the config closest to the file wins for each rule name:
//!
//! ```text
//! base      { no-console: error }
//! /proj/a   { no-console: off }
//! /proj/a/b { no-console: warning, ban: [eval] }
//! ------------------------------------------------
//! effective { no-console: warning, ban: [eval] }
//! ```

pub mod build;
mod configuration;
mod merge;
pub mod raw;
mod store;

pub use build::{BuildConfig, FilePattern, GlobalOptions, PluginSettings};
pub use configuration::{Configuration, RuleMap, RuleSetting, RuleSeverity};
pub use merge::merge_chain;
pub use store::{CONFIG_FILENAMES, ConfigStore, FileConfigStore, builtin_preset};
