//! Renders requests and delivers them to a sink

use std::io::{self, Stdout, Write};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, warn};

use crate::error::{ExecutionResult, ParseResult, TemplateExecutionError};
use crate::models::{RenderRequest, RenderedMessage};
use crate::templates::{TemplateHandle, TemplateStore};

/// Sends rendered messages to a writer.
///
/// The whole message is rendered in memory first, so a failed render never
/// leaves a partial message in the sink. Each successful `send` is exactly
/// one `write_all` followed by a flush.
///
/// The notifier holds the shared store so callers can resolve template sets
/// through it (`load`); `send` itself executes whatever handle the request
/// carries.
pub struct Notifier<W: Write> {
    templates: Arc<TemplateStore>,
    sink: Mutex<W>,
}

impl Notifier<Stdout> {
    /// Notifier that prints to stdout
    pub fn stdout(templates: Arc<TemplateStore>) -> Self {
        Self::new(templates, io::stdout())
    }
}

impl<W: Write> Notifier<W> {
    /// Create a new Notifier
    pub fn new(templates: Arc<TemplateStore>, sink: W) -> Self {
        Self {
            templates,
            sink: Mutex::new(sink),
        }
    }

    /// The store this notifier loads templates from
    pub fn templates(&self) -> &Arc<TemplateStore> {
        &self.templates
    }

    /// Load a template set through the shared store.
    ///
    /// Sets are parsed once per store; repeated calls return the cached handle.
    pub fn load<S: AsRef<str>>(&self, layout: &str, fragments: &[S]) -> ParseResult<TemplateHandle> {
        self.templates.load(layout, fragments)
    }

    /// Render `request` and write it to the sink.
    ///
    /// # Errors
    ///
    /// - `TemplateExecutionError::Render` if the template fails; nothing is written
    /// - `TemplateExecutionError::Write` if the sink rejects the message
    pub fn send(&self, request: &RenderRequest) -> ExecutionResult<RenderedMessage> {
        let body = request
            .template
            .execute(request.template_name.as_deref(), &request.data)
            .inspect_err(|e| {
                warn!(to = %request.to, subject = %request.subject, error = %e, "Failed to render message");
            })?;

        let message = RenderedMessage::new(&request.to, &request.subject, body);
        let output = message.to_string();

        self.deliver(output.as_bytes()).inspect_err(|e| {
            warn!(to = %message.to, error = %e, "Failed to write message to sink");
        })?;

        info!(
            to = %message.to,
            subject = %message.subject,
            bytes = output.len(),
            "Message sent"
        );

        Ok(message)
    }

    /// Consume the notifier and return its sink
    pub fn into_sink(self) -> W {
        self.sink.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn deliver(&self, bytes: &[u8]) -> Result<(), TemplateExecutionError> {
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        sink.write_all(bytes)?;
        sink.flush()?;
        Ok(())
    }
}
