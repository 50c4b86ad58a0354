//! Configuration merging logic
//!
//! Directory-scoped configurations are folded over the base configuration,
//! outermost directory first. Precedence is per rule name: a rule set closer
//! to the linted file replaces the same rule from further up, while rules set
//! only further up survive untouched.

use super::configuration::{Configuration, RuleMap};

impl Configuration {
    /// Merge another config into this one (`other` takes precedence)
    ///
    /// - `rules` / `jsRules`: every entry of `other` replaces the entry of the
    ///   same name; other entries are kept
    /// - `extends`: replaced when `other` declares any
    /// - `rulesDirectory`: `other`'s directories are appended, skipping exact
    ///   duplicates
    /// - `defaultSeverity`: overwritten when `other` sets one
    /// - `linterOptions`: replaced as a whole when `other` has any
    pub fn merge_with(&mut self, other: &Configuration) {
        merge_rule_map(&mut self.rules, &other.rules);
        merge_rule_map(&mut self.js_rules, &other.js_rules);

        if !other.extends.is_empty() {
            self.extends = other.extends.clone();
        }

        for dir in &other.rules_directory {
            if !self.rules_directory.contains(dir) {
                self.rules_directory.push(dir.clone());
            }
        }

        if other.default_severity.is_some() {
            self.default_severity = other.default_severity;
        }

        if !other.linter_options.is_empty() {
            self.linter_options = other.linter_options.clone();
        }
    }

    /// Copy of this config with `other` merged on top
    pub fn extended_with(&self, other: &Configuration) -> Configuration {
        let mut merged = self.clone();
        merged.merge_with(other);
        merged
    }
}

/// Fold discovered configurations over a copy of `base`
///
/// `discovered` is ordered outermost directory first. Neither `base` nor any
/// discovered configuration is modified.
pub fn merge_chain(base: &Configuration, discovered: &[Configuration]) -> Configuration {
    discovered
        .iter()
        .fold(base.clone(), |merged, config| merged.extended_with(config))
}

fn merge_rule_map(target: &mut RuleMap, source: &RuleMap) {
    for (rule, setting) in source {
        target.insert(rule.clone(), setting.clone());
    }
}
