//! Runtime configuration for the `hrv` tool.
//!
//! Resolved once at start-up from the environment (after `.env` has been loaded) and command-line
//! overrides, then passed to each command. Commands never read the environment themselves.

use anyhow::{bail, Context};
use hrv_xml::XmlWriter;
use std::io::Write;

pub const DEFAULT_LOG_DIRECTIVE: &str = "hrv=info";
const MAX_INDENT: usize = 16;

/// Configuration resolved at start-up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    indent: Option<usize>,
    declaration: bool,
    log_directive: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            indent: None,
            declaration: false,
            log_directive: DEFAULT_LOG_DIRECTIVE.into(),
        }
    }
}

impl RunConfig {
    /// Create a new `RunConfig`.
    ///
    /// `indent` of `None` writes compact XML.
    pub fn new(
        indent: Option<usize>,
        declaration: bool,
        log_directive: String,
    ) -> anyhow::Result<Self> {
        if let Some(indent) = indent {
            if indent > MAX_INDENT {
                bail!("XML indent must be at most {MAX_INDENT} spaces, got {indent}");
            }
        }
        if log_directive.trim().is_empty() {
            bail!("log directive cannot be empty");
        }

        Ok(Self {
            indent,
            declaration,
            log_directive,
        })
    }

    /// Build from raw environment values (`HRV_XML_INDENT`, `HRV_XML_DECLARATION`, `HRV_LOG`).
    ///
    /// Unset or blank values fall back to the defaults.
    pub fn from_env_values(
        indent: Option<String>,
        declaration: Option<String>,
        log_directive: Option<String>,
    ) -> anyhow::Result<Self> {
        let indent = non_blank(indent)
            .map(|v| {
                v.parse::<usize>()
                    .with_context(|| format!("HRV_XML_INDENT is not a number: '{v}'"))
            })
            .transpose()?
            .filter(|&n| n > 0);

        let declaration = non_blank(declaration)
            .map(|v| parse_flag(&v).with_context(|| format!("HRV_XML_DECLARATION: '{v}'")))
            .transpose()?
            .unwrap_or(false);

        let log_directive =
            non_blank(log_directive).unwrap_or_else(|| DEFAULT_LOG_DIRECTIVE.to_string());

        Self::new(indent, declaration, log_directive)
    }

    /// Read the process environment. Call once, after `dotenvy::dotenv()`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_env_values(
            std::env::var("HRV_XML_INDENT").ok(),
            std::env::var("HRV_XML_DECLARATION").ok(),
            std::env::var("HRV_LOG").ok(),
        )
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_overrides(self, indent: Option<usize>, declaration: bool) -> anyhow::Result<Self> {
        Self::new(
            indent.or(self.indent).filter(|&n| n > 0),
            declaration || self.declaration,
            self.log_directive,
        )
    }

    pub fn indent(&self) -> Option<usize> {
        self.indent
    }

    pub fn declaration(&self) -> bool {
        self.declaration
    }

    pub fn log_directive(&self) -> &str {
        &self.log_directive
    }

    /// An XML writer honouring the configured indentation.
    pub fn xml_writer<W: Write>(&self, inner: W) -> XmlWriter<W> {
        match self.indent {
            Some(indent) => XmlWriter::with_indent(inner, indent),
            None => XmlWriter::new(inner),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(value: &str) -> anyhow::Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected true or false, got '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_values_use_defaults() {
        let cfg = RunConfig::from_env_values(None, None, None).unwrap();
        assert_eq!(cfg, RunConfig::default());
        assert_eq!(cfg.log_directive(), "hrv=info");
    }

    #[test]
    fn blank_values_are_treated_as_unset() {
        let cfg =
            RunConfig::from_env_values(Some(" ".into()), Some("".into()), Some("  ".into()))
                .unwrap();
        assert_eq!(cfg, RunConfig::default());
    }

    #[test]
    fn parses_indent_and_declaration() {
        let cfg = RunConfig::from_env_values(
            Some("2".into()),
            Some("yes".into()),
            Some("hrv=debug".into()),
        )
        .unwrap();
        assert_eq!(cfg.indent(), Some(2));
        assert!(cfg.declaration());
        assert_eq!(cfg.log_directive(), "hrv=debug");
    }

    #[test]
    fn zero_indent_means_compact() {
        let cfg = RunConfig::from_env_values(Some("0".into()), None, None).unwrap();
        assert_eq!(cfg.indent(), None);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(RunConfig::from_env_values(Some("two".into()), None, None).is_err());
        assert!(RunConfig::from_env_values(None, Some("maybe".into()), None).is_err());
        assert!(RunConfig::new(Some(64), false, DEFAULT_LOG_DIRECTIVE.into()).is_err());
    }

    #[test]
    fn command_line_overrides_environment() {
        let env = RunConfig::from_env_values(Some("4".into()), None, None).unwrap();
        let cfg = env.clone().with_overrides(Some(2), true).unwrap();
        assert_eq!(cfg.indent(), Some(2));
        assert!(cfg.declaration());

        let kept = env.with_overrides(None, false).unwrap();
        assert_eq!(kept.indent(), Some(4));
    }

    #[test]
    fn writer_indents_when_configured() {
        let cfg = RunConfig::new(Some(2), false, DEFAULT_LOG_DIRECTIVE.into()).unwrap();
        let mut writer = cfg.xml_writer(Vec::new());
        writer.start("a").unwrap();
        writer.element("b", &1_i32).unwrap();
        writer.end("a").unwrap();
        let xml = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(xml, "<a>\n  <b>1</b>\n</a>");
    }
}
