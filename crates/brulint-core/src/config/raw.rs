//! Raw configuration file format
//!
//! This is the shape found in `tslint.json` / `tslint.yaml` files and in the
//! inline `config` block of the build configuration. Parsing turns the loose
//! rule notations (`true`, `[true, args..]`, `{ severity, options }`, a
//! severity string) into uniform [`RuleSetting`] values.

use super::configuration::{Configuration, RuleMap, RuleSetting, RuleSeverity};
use crate::error::BrulintError;
use crate::result::Result;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// A single value or a list of values
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

/// `jsRules` is either a rule table or `true` to reuse `rules`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawJsRules {
    CopyRules(bool),
    Rules(IndexMap<String, Value>),
}

/// Unparsed configuration as written by the user
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawConfigFile {
    pub default_severity: Option<String>,
    pub extends: Option<OneOrMany<String>>,
    pub rules: Option<IndexMap<String, Value>>,
    pub js_rules: Option<RawJsRules>,
    pub rules_directory: Option<OneOrMany<String>>,
    pub linter_options: Option<serde_json::Map<String, Value>>,
}

impl RawConfigFile {
    /// Interpret a JSON value as raw configuration; `null` is an empty config
    pub fn from_value(raw: &Value) -> Result<Self> {
        if raw.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(raw.clone())
            .map_err(|e| BrulintError::config_error(format!("Invalid configuration: {e}")))
    }

    /// The `extends` entries in declaration order
    pub fn extends(&self) -> Vec<String> {
        self.extends
            .clone()
            .map(OneOrMany::into_vec)
            .unwrap_or_default()
    }

    /// Parse into a [`Configuration`]
    ///
    /// `base_dir` is the directory of the file the settings came from;
    /// relative `rulesDirectory` entries are resolved against it. Inline
    /// settings pass `None` and keep their entries as given.
    pub fn into_configuration(self, base_dir: Option<&Path>) -> Result<Configuration> {
        let default_severity = match self.default_severity.as_deref() {
            None | Some("default") => None,
            Some(value) => Some(RuleSeverity::parse(value).ok_or_else(|| {
                BrulintError::config_error(format!("Invalid defaultSeverity '{value}'"))
            })?),
        };
        let fallback = default_severity.unwrap_or(RuleSeverity::Error);

        let rules = parse_rule_map(self.rules.unwrap_or_default(), fallback)?;
        let js_rules = match self.js_rules {
            None | Some(RawJsRules::CopyRules(false)) => RuleMap::new(),
            Some(RawJsRules::CopyRules(true)) => rules.clone(),
            Some(RawJsRules::Rules(raw_rules)) => parse_rule_map(raw_rules, fallback)?,
        };

        let rules_directory = self
            .rules_directory
            .map(OneOrMany::into_vec)
            .unwrap_or_default()
            .into_iter()
            .map(|dir| match base_dir {
                Some(base) => base.join(dir),
                None => PathBuf::from(dir),
            })
            .collect();

        Ok(Configuration {
            default_severity,
            extends: self.extends.map(OneOrMany::into_vec).unwrap_or_default(),
            rules,
            js_rules,
            rules_directory,
            linter_options: self.linter_options.unwrap_or_default(),
        })
    }
}

/// Parse raw settings straight into a [`Configuration`]
pub fn parse_config_value(raw: &Value, base_dir: Option<&Path>) -> Result<Configuration> {
    RawConfigFile::from_value(raw)?.into_configuration(base_dir)
}

fn parse_rule_map(raw: IndexMap<String, Value>, fallback: RuleSeverity) -> Result<RuleMap> {
    raw.into_iter()
        .map(|(name, value)| {
            let setting = parse_rule_value(&name, &value, fallback)?;
            Ok((name, setting))
        })
        .collect()
}

fn parse_rule_value(name: &str, value: &Value, fallback: RuleSeverity) -> Result<RuleSetting> {
    match value {
        Value::Bool(enabled) => Ok(RuleSetting::with_severity(enabled_severity(
            *enabled, fallback,
        ))),
        Value::Array(items) => match items.split_first() {
            None => Ok(RuleSetting::with_severity(fallback)),
            Some((Value::Bool(enabled), rest)) => Ok(RuleSetting::new(
                enabled_severity(*enabled, fallback),
                rest.to_vec(),
            )),
            Some((other, _)) => Err(BrulintError::config_error(format!(
                "Rule '{name}' must start with true or false, found {other}"
            ))),
        },
        Value::Object(map) => {
            let severity = match map.get("severity") {
                None | Some(Value::Null) => fallback,
                Some(Value::String(s)) => parse_severity(name, s, fallback)?,
                Some(other) => {
                    return Err(BrulintError::config_error(format!(
                        "Rule '{name}' has a non-string severity: {other}"
                    )));
                }
            };
            let arguments = match map.get("options") {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(options)) => options.clone(),
                Some(option) => vec![option.clone()],
            };
            Ok(RuleSetting::new(severity, arguments))
        }
        Value::String(s) => Ok(RuleSetting::with_severity(parse_severity(name, s, fallback)?)),
        other => Err(BrulintError::config_error(format!(
            "Invalid setting for rule '{name}': {other}"
        ))),
    }
}

fn enabled_severity(enabled: bool, fallback: RuleSeverity) -> RuleSeverity {
    if enabled { fallback } else { RuleSeverity::Off }
}

fn parse_severity(name: &str, value: &str, fallback: RuleSeverity) -> Result<RuleSeverity> {
    if value == "default" {
        return Ok(fallback);
    }
    RuleSeverity::parse(value).ok_or_else(|| {
        BrulintError::config_error(format!("Invalid severity '{value}' for rule '{name}'"))
    })
}
