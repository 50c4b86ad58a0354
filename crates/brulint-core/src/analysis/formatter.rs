//! Output formatters for findings

use super::Finding;
use crate::config::GlobalOptions;
use crate::error::BrulintError;
use crate::result::Result;
use tracing::warn;

/// Built-in output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `ERROR: path:line:col - message`
    Prose,
    /// `ERROR: (rule) path[line, col]: message`
    Verbose,
    /// JSON array of findings
    Json,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "prose" => Some(Self::Prose),
            "verbose" => Some(Self::Verbose),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Renders findings as the text surfaced to the build pipeline
#[derive(Debug, Clone)]
pub struct FindingFormatter {
    format: OutputFormat,
}

impl FindingFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Pick the formatter named in the global options
    pub fn from_options(options: &GlobalOptions) -> Result<Self> {
        if let Some(format) = OutputFormat::from_name(&options.formatter) {
            return Ok(Self::new(format));
        }

        let message = match &options.formatters_directory {
            Some(dir) => format!(
                "Formatter '{}' is not built in and custom formatters from '{}' cannot be loaded",
                options.formatter,
                dir.display()
            ),
            None => format!(
                "Unknown formatter '{}' (expected prose, verbose or json)",
                options.formatter
            ),
        };
        Err(BrulintError::config_error(message))
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Render findings; JSON that cannot be produced falls back to prose
    pub fn render(&self, findings: &[Finding]) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string(findings).unwrap_or_else(|e| {
                warn!("Failed to render findings as JSON, using prose instead: {e}");
                render_lines(findings, OutputFormat::Prose)
            }),
            format => render_lines(findings, format),
        }
    }
}

fn render_lines(findings: &[Finding], format: OutputFormat) -> String {
    if findings.is_empty() {
        return String::new();
    }
    let lines: Vec<String> = findings.iter().map(|f| render_line(f, format)).collect();
    format!("{}\n", lines.join("\n"))
}

fn render_line(finding: &Finding, format: OutputFormat) -> String {
    let severity = finding.rule_severity.as_str().to_uppercase();
    let line = finding.start_position.line + 1;
    let column = finding.start_position.character + 1;

    match format {
        OutputFormat::Verbose => format!(
            "{}: ({}) {}[{}, {}]: {}",
            severity,
            finding.rule_name,
            finding.name.display(),
            line,
            column,
            finding.failure
        ),
        _ => format!(
            "{}: {}:{}:{} - {}",
            severity,
            finding.name.display(),
            line,
            column,
            finding.failure
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Position;
    use crate::config::RuleSeverity;
    use std::path::PathBuf;

    fn finding() -> Finding {
        Finding {
            name: PathBuf::from("app/main.ts"),
            rule_name: "no-eval".to_string(),
            rule_severity: RuleSeverity::Error,
            failure: "forbidden eval".to_string(),
            start_position: Position {
                line: 2,
                character: 4,
            },
        }
    }

    #[test]
    fn test_prose() {
        let output = FindingFormatter::new(OutputFormat::Prose).render(&[finding()]);
        assert_eq!(output, "ERROR: app/main.ts:3:5 - forbidden eval\n");
    }

    #[test]
    fn test_verbose() {
        let output = FindingFormatter::new(OutputFormat::Verbose).render(&[finding()]);
        assert_eq!(output, "ERROR: (no-eval) app/main.ts[3, 5]: forbidden eval\n");
    }

    #[test]
    fn test_json() {
        let output = FindingFormatter::new(OutputFormat::Json).render(&[finding()]);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["ruleName"], "no-eval");
        assert_eq!(parsed[0]["ruleSeverity"], "error");
        assert_eq!(parsed[0]["startPosition"]["line"], 2);
    }

    #[test]
    fn test_no_findings_renders_nothing() {
        assert_eq!(FindingFormatter::new(OutputFormat::Prose).render(&[]), "");
    }

    #[test]
    fn test_unknown_formatter_is_rejected() {
        let options = GlobalOptions {
            formatter: "checkstyle".to_string(),
            ..Default::default()
        };
        assert!(FindingFormatter::from_options(&options).is_err());

        let options = GlobalOptions {
            formatter: "verbose".to_string(),
            ..Default::default()
        };
        assert_eq!(
            FindingFormatter::from_options(&options).unwrap().format(),
            OutputFormat::Verbose
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_json_falls_back_to_prose_for_unserializable_paths() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let mut finding = finding();
        finding.name = PathBuf::from(OsStr::from_bytes(b"app/\xffmain.ts"));

        let output = FindingFormatter::new(OutputFormat::Json).render(&[finding]);

        assert!(output.starts_with("ERROR: app/"));
        assert!(output.ends_with(":3:5 - forbidden eval\n"));
    }
}
