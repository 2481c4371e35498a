//! Error types for template loading and delivery.
//!
//! Loading and sending fail in different ways and at different times, so
//! they get separate types: a [`TemplateParseError`] surfaces when a template
//! set is loaded, a [`TemplateExecutionError`] when a message is sent.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for template loading.
pub type ParseResult<T> = Result<T, TemplateParseError>;

/// Result type for rendering and delivery.
pub type ExecutionResult<T> = Result<T, TemplateExecutionError>;

/// A template source was missing or malformed.
#[derive(Debug, Error)]
pub enum TemplateParseError {
    /// File does not exist
    #[error("template file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// No bundled resource with this identifier
    #[error("no bundled template named '{0}'")]
    NotBundled(String),

    /// File exists but could not be read
    #[error("failed to read template {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Source text is not a valid template
    #[error("failed to parse template '{name}': {source}")]
    Syntax {
        name: String,
        #[source]
        source: Box<handlebars::TemplateError>,
    },
}

/// A send did not complete.
#[derive(Debug, Error)]
pub enum TemplateExecutionError {
    /// Template execution failed, e.g. the payload lacks a referenced field
    #[error("failed to render template '{template}': {source}")]
    Render {
        template: String,
        #[source]
        source: Box<handlebars::RenderError>,
    },

    /// The payload could not be converted to template data
    #[error("failed to serialize template payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// The sink rejected the rendered message
    #[error("failed to write message to sink: {0}")]
    Write(#[from] io::Error),
}

impl TemplateParseError {
    pub(crate) fn syntax(name: impl Into<String>, source: handlebars::TemplateError) -> Self {
        Self::Syntax {
            name: name.into(),
            source: Box::new(source),
        }
    }
}

impl TemplateExecutionError {
    pub(crate) fn render(template: impl Into<String>, source: handlebars::RenderError) -> Self {
        Self::Render {
            template: template.into(),
            source: Box::new(source),
        }
    }

    /// Whether the failure happened before anything reached the sink
    pub fn is_render(&self) -> bool {
        matches!(self, Self::Render { .. })
    }
}
