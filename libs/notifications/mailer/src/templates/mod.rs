//! Template loading and caching with Handlebars
//!
//! This module provides:
//! - `TemplateStore`: resolves template identifiers through a `TemplateOrigin`
//!   (a directory or the bundled resources), parses them once and caches the
//!   resulting handle per template set
//! - `TemplateHandle`: an immutable, shareable compiled template set
//! - Bundled default templates (`layout.html`, `forgot_password.html`)
//!
//! A template set is one layout plus zero or more fragments. The layout pulls
//! its body in through the `{{> content}}` partial, which is bound to the
//! first fragment of the set. Every template is also addressable by its own
//! name, the file stem of its identifier.

pub mod bundled;
mod handle;
mod source;
mod store;

pub use handle::{TemplateHandle, CONTENT_PARTIAL};
pub use source::{ParseStatus, TemplateDefinition, TemplateOrigin, TemplateSource};
pub use store::TemplateStore;
