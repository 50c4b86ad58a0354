//! Built-in analysis engine
//!
//! A small text-level linter implementing a handful of rules, used when no
//! other analyzer is supplied. Findings accumulate across [`Analyzer::lint`]
//! calls until [`Analyzer::clear_findings`] is called.

use super::formatter::FindingFormatter;
use super::{Analyzer, Finding, LintResult, Position};
use crate::config::{Configuration, GlobalOptions, RuleMap, RuleSetting, RuleSeverity};
use crate::error::BrulintError;
use crate::result::Result;
use regex::Regex;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

/// Rules the built-in engine knows how to check
pub const BUILTIN_RULES: &[&str] = &["ban", "no-console", "no-debugger", "no-eval"];

const JS_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs"];

/// Default analyzer
pub struct BuiltinLinter {
    options: GlobalOptions,
    formatter: FindingFormatter,
    findings: Vec<Finding>,
    console_call: Regex,
    eval_call: Regex,
    debugger_statement: Regex,
}

impl BuiltinLinter {
    pub fn new(options: GlobalOptions) -> Result<Self> {
        let formatter = FindingFormatter::from_options(&options)?;
        Ok(Self {
            options,
            formatter,
            findings: Vec::new(),
            console_call: compile(r"\bconsole\s*\.\s*([A-Za-z_$][\w$]*)\s*\(")?,
            eval_call: compile(r"(?:^|[^\w$.])(eval)\s*\(")?,
            debugger_statement: compile(r"\bdebugger\b")?,
        })
    }

    pub fn options(&self) -> &GlobalOptions {
        &self.options
    }

    fn warn_unimplemented(&self, rules: &RuleMap, config: &Configuration) {
        let missing: Vec<&str> = rules
            .iter()
            .filter(|(name, setting)| setting.is_enabled() && !BUILTIN_RULES.contains(&name.as_str()))
            .map(|(name, _)| name.as_str())
            .collect();
        if missing.is_empty() {
            return;
        }

        let searched: Vec<String> = self
            .options
            .rules_directory
            .iter()
            .chain(config.rules_directory.iter())
            .map(|dir| dir.display().to_string())
            .collect();
        warn!(
            "Could not find implementations for the following rules: {} (rules directories: [{}])",
            missing.join(", "),
            searched.join(", ")
        );
    }

    fn check_rule(
        &self,
        name: &str,
        setting: &RuleSetting,
        path: &Path,
        content: &str,
    ) -> Result<Vec<Finding>> {
        let mut found = Vec::new();
        let mut report = |line: usize, text: &str, start: usize, failure: String| {
            found.push(Finding {
                name: path.to_path_buf(),
                rule_name: name.to_string(),
                rule_severity: setting.rule_severity,
                failure,
                start_position: Position {
                    line,
                    character: text[..start].chars().count(),
                },
            });
        };

        // String literal contents are blanked so calls quoted in text never match.
        let lines: Vec<(&str, String)> = content
            .lines()
            .map(|text| (text, mask_string_literals(text)))
            .collect();

        match name {
            "no-console" => {
                let banned = string_arguments(&setting.rule_arguments);
                for (line_no, (text, code)) in lines.iter().enumerate() {
                    for caps in self.console_call.captures_iter(code) {
                        let (Some(call), Some(method)) = (caps.get(0), caps.get(1)) else {
                            continue;
                        };
                        if banned.is_empty() || banned.contains(&method.as_str()) {
                            report(
                                line_no,
                                *text,
                                call.start(),
                                format!("Calls to 'console.{}' are not allowed.", method.as_str()),
                            );
                        }
                    }
                }
            }
            "no-eval" => {
                for (line_no, (text, code)) in lines.iter().enumerate() {
                    for caps in self.eval_call.captures_iter(code) {
                        if let Some(call) = caps.get(1) {
                            report(line_no, *text, call.start(), "forbidden eval".to_string());
                        }
                    }
                }
            }
            "no-debugger" => {
                for (line_no, (text, code)) in lines.iter().enumerate() {
                    for stmt in self.debugger_statement.find_iter(code) {
                        report(
                            line_no,
                            *text,
                            stmt.start(),
                            "Use of debugger statements is forbidden".to_string(),
                        );
                    }
                }
            }
            "ban" => {
                for banned in banned_functions(&setting.rule_arguments)? {
                    for (line_no, (text, code)) in lines.iter().enumerate() {
                        for caps in banned.pattern.captures_iter(code) {
                            if let Some(call) = caps.get(1) {
                                report(line_no, *text, call.start(), banned.failure());
                            }
                        }
                    }
                }
            }
            _ => {}
        }

        Ok(found)
    }
}

impl Analyzer for BuiltinLinter {
    fn lint(&mut self, path: &Path, content: &str, config: &Configuration) -> Result<()> {
        let is_js = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| JS_EXTENSIONS.contains(&ext));
        let rules = if is_js { &config.js_rules } else { &config.rules };

        self.warn_unimplemented(rules, config);
        if self.options.fix {
            debug!("Fix mode requested; no built-in rule provides fixes");
        }

        let mut found = Vec::new();
        for (name, setting) in rules {
            if !setting.is_enabled() {
                continue;
            }
            if self.options.quiet && setting.rule_severity == RuleSeverity::Warning {
                continue;
            }
            found.extend(self.check_rule(name, setting, path, content)?);
        }
        found.sort_by_key(|f| (f.start_position.line, f.start_position.character));

        debug!("{} finding(s) in {}", found.len(), path.display());
        self.findings.extend(found);
        Ok(())
    }

    fn result(&self) -> LintResult {
        let error_count = self.findings.iter().filter(|f| f.is_error()).count();
        LintResult {
            error_count,
            warning_count: self.findings.len() - error_count,
            failures: self.findings.clone(),
            output: self.formatter.render(&self.findings),
        }
    }

    fn clear_findings(&mut self) {
        self.findings.clear();
    }
}

struct BannedFunction {
    display: String,
    message: Option<String>,
    pattern: Regex,
}

impl BannedFunction {
    fn failure(&self) -> String {
        match &self.message {
            Some(message) => format!("Calls to '{}' are not allowed: {}", self.display, message),
            None => format!("Calls to '{}' are not allowed.", self.display),
        }
    }
}

/// `ban` arguments: `"name"`, `["object", "method"]` or `{ "name", "message" }`
fn banned_functions(arguments: &[Value]) -> Result<Vec<BannedFunction>> {
    let mut banned = Vec::new();
    for argument in arguments {
        let (name, message) = match argument {
            Value::String(name) => (Value::String(name.clone()), None),
            Value::Array(_) => (argument.clone(), None),
            Value::Object(map) => (
                map.get("name").cloned().unwrap_or(Value::Null),
                map.get("message").and_then(Value::as_str).map(str::to_string),
            ),
            _ => continue,
        };

        let parts: Vec<&str> = match &name {
            Value::String(name) => vec![name.as_str()],
            Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        };
        if parts.is_empty() {
            continue;
        }

        let escaped: Vec<String> = parts.iter().map(|p| regex::escape(p)).collect();
        let pattern = compile(&format!(r"(?:^|[^\w$.])({})\s*\(", escaped.join(r"\s*\.\s*")))?;
        banned.push(BannedFunction {
            display: parts.join("."),
            message,
            pattern,
        });
    }
    Ok(banned)
}

/// Blank out the contents of `'..'`, `".."` and `` `..` `` literals on one line
///
/// Byte offsets are preserved, so positions found in the result index the
/// original line.
fn mask_string_literals(line: &str) -> String {
    let mut masked = String::with_capacity(line.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in line.chars() {
        match quote {
            Some(open) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == open {
                    quote = None;
                    masked.push(c);
                    continue;
                }
                masked.extend(std::iter::repeat_n(' ', c.len_utf8()));
            }
            None => {
                if matches!(c, '\'' | '"' | '`') {
                    quote = Some(c);
                }
                masked.push(c);
            }
        }
    }
    masked
}

fn string_arguments(arguments: &[Value]) -> Vec<&str> {
    arguments.iter().filter_map(Value::as_str).collect()
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| BrulintError::analysis_error(format!("Invalid rule pattern '{pattern}': {e}")))
}
