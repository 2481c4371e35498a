//! Template-driven email rendering with pluggable output sinks
//!
//! This library renders HTML email from a layout plus content fragments and
//! writes the result, as flat text, to any `std::io::Write`.
//!
//! ## Components
//!
//! - **Templates**: `TemplateStore` loads a layout and its fragments once,
//!   from a directory or from resources bundled into the binary, and hands
//!   out shareable `TemplateHandle`s
//! - **Models**: `RenderRequest` (recipient, subject, handle, payload) and
//!   `RenderedMessage`
//! - **Notifier**: executes a request and writes it to its sink
//! - **Sinks**: `CapturingSink` for tests; stdout, `Vec<u8>` or
//!   `std::io::sink()` for everything else
//!
//! ## Usage
//!
//! ```ignore
//! use mailer::{Notifier, RenderRequest, TemplateStore};
//! use std::sync::Arc;
//!
//! let store = Arc::new(TemplateStore::bundled());
//! let template = store.load("layout.html", &["forgot_password.html"])?;
//!
//! let notifier = Notifier::stdout(store);
//! let request = RenderRequest::new("test@email.com", "Reset Password", template)
//!     .with_data(serde_json::json!({ "Link": "https://httpbin.org" }));
//! notifier.send(&request)?;
//! ```

pub mod error;
pub mod models;
pub mod notifier;
pub mod sink;
pub mod templates;

pub use error::{ExecutionResult, ParseResult, TemplateExecutionError, TemplateParseError};
pub use models::{RenderRequest, RenderedMessage};
pub use notifier::Notifier;
pub use sink::CapturingSink;
pub use templates::{
    ParseStatus, TemplateDefinition, TemplateHandle, TemplateOrigin, TemplateSource,
    TemplateStore, CONTENT_PARTIAL,
};
