use std::fmt;
use std::sync::Arc;

use handlebars::Handlebars;
use serde_json::Value;

use crate::error::{ExecutionResult, ParseResult, TemplateExecutionError, TemplateParseError};

/// Partial name the layout uses to embed its primary fragment
pub const CONTENT_PARTIAL: &str = "content";

/// A compiled template set, ready to execute.
///
/// Cloning is cheap and shares the compiled templates; a handle never changes
/// after it is built, so clones can be used from any number of threads.
#[derive(Clone)]
pub struct TemplateHandle {
    inner: Arc<Compiled>,
}

struct Compiled {
    registry: Handlebars<'static>,
    layout: String,
    fragments: Vec<String>,
}

impl TemplateHandle {
    /// Name of the layout executed by default
    pub fn layout(&self) -> &str {
        &self.inner.layout
    }

    /// Names of the fragments, primary fragment first
    pub fn fragments(&self) -> &[String] {
        &self.inner.fragments
    }

    /// Check if a template is registered under `name`
    pub fn has_template(&self, name: &str) -> bool {
        self.inner.registry.has_template(name)
    }

    /// Render the layout, or the named sub-template when `name` is given.
    /// An empty name means the layout.
    ///
    /// Rendering is strict: a placeholder whose field is absent from `data`
    /// is an error rather than an empty string.
    pub fn execute(&self, name: Option<&str>, data: &Value) -> ExecutionResult<String> {
        let template = name
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.inner.layout);
        self.inner
            .registry
            .render(template, data)
            .map_err(|e| TemplateExecutionError::render(template, e))
    }

    /// Two handles share the same compiled templates
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for TemplateHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateHandle")
            .field("layout", &self.inner.layout)
            .field("fragments", &self.inner.fragments)
            .finish()
    }
}

/// Incrementally parses a layout and its fragments into a handle
pub(crate) struct HandleBuilder {
    registry: Handlebars<'static>,
    layout: String,
    fragments: Vec<String>,
    content_bound: bool,
}

impl HandleBuilder {
    /// Start a new set from a layout
    pub(crate) fn with_layout(name: &str, text: &str) -> ParseResult<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(escape_html);
        registry
            .register_template_string(name, text)
            .map_err(|e| TemplateParseError::syntax(name, e))?;

        Ok(Self {
            registry,
            layout: name.to_string(),
            fragments: Vec::new(),
            content_bound: false,
        })
    }

    /// Start from a deep copy of an existing handle.
    ///
    /// The next fragment added takes over the content slot.
    pub(crate) fn from_handle(base: &TemplateHandle) -> Self {
        Self {
            registry: base.inner.registry.clone(),
            layout: base.inner.layout.clone(),
            fragments: base.inner.fragments.clone(),
            content_bound: false,
        }
    }

    pub(crate) fn add_fragment(&mut self, name: &str, text: &str) -> ParseResult<()> {
        self.registry
            .register_template_string(name, text)
            .map_err(|e| TemplateParseError::syntax(name, e))?;

        if !self.content_bound {
            self.registry
                .register_template_string(CONTENT_PARTIAL, text)
                .map_err(|e| TemplateParseError::syntax(name, e))?;
            self.content_bound = true;
            self.fragments.retain(|existing| existing != name);
            self.fragments.insert(0, name.to_string());
        } else if !self.fragments.iter().any(|existing| existing == name) {
            self.fragments.push(name.to_string());
        }

        Ok(())
    }

    pub(crate) fn finish(self) -> TemplateHandle {
        TemplateHandle {
            inner: Arc::new(Compiled {
                registry: self.registry,
                layout: self.layout,
                fragments: self.fragments,
            }),
        }
    }
}

/// Escape the characters that are significant in HTML text and quoted
/// attributes. URL characters such as `=` and `/` pass through untouched.
fn escape_html(data: &str) -> String {
    let mut escaped = String::with_capacity(data.len());
    for c in data.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn build(layout: &str, fragments: &[(&str, &str)]) -> TemplateHandle {
        let mut builder = HandleBuilder::with_layout("layout", layout).unwrap();
        for (name, text) in fragments {
            builder.add_fragment(name, text).unwrap();
        }
        builder.finish()
    }

    #[test]
    fn test_layout_embeds_primary_fragment() {
        let handle = build(
            "<body>{{> content}}</body>",
            &[("greeting", "Hi {{name}}"), ("footer", "Bye {{name}}")],
        );

        let body = handle.execute(None, &json!({"name": "Ann"})).unwrap();
        assert_eq!(body, "<body>Hi Ann</body>");
        assert_eq!(handle.fragments(), ["greeting", "footer"]);
    }

    #[test]
    fn test_execute_named_fragment() {
        let handle = build(
            "<body>{{> content}}</body>",
            &[("greeting", "Hi {{name}}"), ("footer", "Bye {{name}}")],
        );

        let footer = handle.execute(Some("footer"), &json!({"name": "Ann"})).unwrap();
        assert_eq!(footer, "Bye Ann");
    }

    #[test]
    fn test_strict_mode_missing_field() {
        let handle = build("{{> content}}", &[("link", "<a href=\"{{Link}}\">x</a>")]);

        let err = handle.execute(None, &json!({})).unwrap_err();
        assert!(err.is_render());
    }

    #[test]
    fn test_empty_name_renders_layout() {
        let handle = build("<body>{{> content}}</body>", &[("greeting", "Hi {{name}}")]);
        let data = json!({"name": "Ann"});

        assert_eq!(
            handle.execute(Some(""), &data).unwrap(),
            handle.execute(None, &data).unwrap()
        );
    }

    #[test]
    fn test_escape_keeps_url_characters() {
        let handle = build("{{> content}}", &[("link", "<a href=\"{{Link}}\">x</a>")]);

        let body = handle
            .execute(None, &json!({"Link": "https://app.example.com/reset?token=abc"}))
            .unwrap();
        assert_eq!(body, "<a href=\"https://app.example.com/reset?token=abc\">x</a>");

        let escaped = handle
            .execute(None, &json!({"Link": "a&b<c>\"d'`"}))
            .unwrap();
        assert_eq!(escaped, "<a href=\"a&amp;b&lt;c&gt;&quot;d&#39;`\">x</a>");
    }

    #[test]
    fn test_unknown_template_name() {
        let handle = build("{{> content}}", &[("link", "x")]);
        let err = handle.execute(Some("missing"), &json!({})).unwrap_err();
        assert!(matches!(err, TemplateExecutionError::Render { template, .. } if template == "missing"));
    }

    #[test]
    fn test_layout_syntax_error() {
        let result = HandleBuilder::with_layout("layout", "<p>{{#if Link}}closed wrong{{/each}}");
        assert!(matches!(result, Err(TemplateParseError::Syntax { name, .. }) if name == "layout"));
    }

    #[test]
    fn test_from_handle_rebinds_content_without_touching_base() {
        let base = build("[{{> content}}]", &[("first", "one")]);

        let mut builder = HandleBuilder::from_handle(&base);
        builder.add_fragment("second", "two").unwrap();
        let derived = builder.finish();

        assert_eq!(base.execute(None, &json!({})).unwrap(), "[one]");
        assert_eq!(derived.execute(None, &json!({})).unwrap(), "[two]");
        assert_eq!(derived.fragments(), ["second", "first"]);
        assert!(!base.has_template("second"));
        assert!(!base.ptr_eq(&derived));
    }

    #[test]
    fn test_clone_shares_compiled_templates() {
        let handle = build("{{> content}}", &[("a", "a")]);
        let clone = handle.clone();
        assert!(handle.ptr_eq(&clone));
    }
}
