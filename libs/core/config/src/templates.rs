//! Where mail templates are read from.

use crate::{env_list_or_default, env_or_default, ConfigError, FromEnv};
use std::path::PathBuf;
use std::str::FromStr;

/// Source strategy for templates
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum TemplateSourceKind {
    /// Templates compiled into the binary
    #[default]
    Bundled,
    /// Templates read from a directory at load time
    Files,
}

impl FromStr for TemplateSourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bundled" | "embedded" => Ok(Self::Bundled),
            "files" | "fs" => Ok(Self::Files),
            other => Err(format!(
                "unknown template source '{}', expected 'bundled' or 'files'",
                other
            )),
        }
    }
}

/// Template configuration
#[derive(Clone, Debug)]
pub struct TemplatesConfig {
    pub source: TemplateSourceKind,
    /// Only consulted for [`TemplateSourceKind::Files`]
    pub dir: PathBuf,
    pub layout: String,
    pub fragments: Vec<String>,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            source: TemplateSourceKind::Bundled,
            dir: PathBuf::from("templates"),
            layout: "layout.html".to_string(),
            fragments: vec!["forgot_password.html".to_string()],
        }
    }
}

impl FromEnv for TemplatesConfig {
    /// Reads from environment variables with defaults:
    /// - MAILER_TEMPLATE_SOURCE: `bundled` (default) or `files`
    /// - MAILER_TEMPLATE_DIR: defaults to `templates`
    /// - MAILER_LAYOUT: defaults to `layout.html`
    /// - MAILER_FRAGMENTS: comma-separated, defaults to `forgot_password.html`
    fn from_env() -> Result<Self, ConfigError> {
        let source = env_or_default("MAILER_TEMPLATE_SOURCE", "bundled")
            .parse()
            .map_err(|details| ConfigError::ParseError {
                key: "MAILER_TEMPLATE_SOURCE".to_string(),
                details,
            })?;

        Ok(Self {
            source,
            dir: PathBuf::from(env_or_default("MAILER_TEMPLATE_DIR", "templates")),
            layout: env_or_default("MAILER_LAYOUT", "layout.html"),
            fragments: env_list_or_default("MAILER_FRAGMENTS", &["forgot_password.html"]),
        })
    }
}
