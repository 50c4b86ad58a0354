//! Parsed configuration values
//!
//! A [`Configuration`] is the already-parsed form of a `tslint.json` style
//! file: rule tables keyed by rule name, the `extends` list, custom rule
//! directories and an opaque `linterOptions` bag.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

/// Rule severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    /// Error (fails the lint)
    Error,
    /// Warning (reported, does not fail the lint)
    Warning,
    /// Disable the rule
    Off,
}

impl RuleSeverity {
    /// Parse a severity string; `default` is not handled here
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "error" => Some(Self::Error),
            "warning" | "warn" => Some(Self::Warning),
            "off" | "none" => Some(Self::Off),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Off => "off",
        }
    }
}

impl fmt::Display for RuleSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity and arguments for one named rule
///
/// Two settings for the same rule are never blended: the later one replaces
/// the earlier one wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSetting {
    pub rule_severity: RuleSeverity,
    pub rule_arguments: Vec<Value>,
}

impl RuleSetting {
    pub fn new(rule_severity: RuleSeverity, rule_arguments: Vec<Value>) -> Self {
        Self {
            rule_severity,
            rule_arguments,
        }
    }

    /// Setting with no arguments
    pub fn with_severity(rule_severity: RuleSeverity) -> Self {
        Self::new(rule_severity, Vec::new())
    }

    pub fn is_enabled(&self) -> bool {
        self.rule_severity != RuleSeverity::Off
    }
}

/// Rule name to setting, in insertion order
pub type RuleMap = IndexMap<String, RuleSetting>;

/// One fully parsed lint configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Severity applied to rules that don't specify their own
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_severity: Option<RuleSeverity>,

    /// Named presets or config files this configuration builds on
    pub extends: Vec<String>,

    /// Rules for TypeScript sources
    pub rules: RuleMap,

    /// Rules for JavaScript sources
    pub js_rules: RuleMap,

    /// Directories searched for custom rule implementations
    pub rules_directory: Vec<PathBuf>,

    /// Opaque options passed through to the analysis engine
    pub linter_options: serde_json::Map<String, Value>,
}

impl Configuration {
    /// Look up a rule setting by name
    pub fn rule(&self, name: &str) -> Option<&RuleSetting> {
        self.rules.get(name)
    }

    /// Look up a JavaScript rule setting by name
    pub fn js_rule(&self, name: &str) -> Option<&RuleSetting> {
        self.js_rules.get(name)
    }

    /// True when nothing at all is configured
    pub fn is_empty(&self) -> bool {
        self.default_severity.is_none()
            && self.extends.is_empty()
            && self.rules.is_empty()
            && self.js_rules.is_empty()
            && self.rules_directory.is_empty()
            && self.linter_options.is_empty()
    }
}
