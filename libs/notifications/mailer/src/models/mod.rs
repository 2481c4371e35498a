use serde::{Deserialize, Serialize};
use std::fmt;

use crate::templates::TemplateHandle;

/// One message to render and deliver
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Recipient email address
    pub to: String,
    /// Email subject
    pub subject: String,
    /// Compiled template set to execute
    pub template: TemplateHandle,
    /// Payload the template is executed against
    pub data: serde_json::Value,
    /// Sub-template to execute instead of the layout
    pub template_name: Option<String>,
}

impl RenderRequest {
    /// Create a new request with an empty payload
    pub fn new(to: impl Into<String>, subject: impl Into<String>, template: TemplateHandle) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            template,
            data: serde_json::Value::Object(serde_json::Map::new()),
            template_name: None,
        }
    }

    /// Set the template payload
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    /// Set the template payload from any serializable value
    pub fn with_payload<T: Serialize>(self, payload: &T) -> Result<Self, serde_json::Error> {
        Ok(self.with_data(serde_json::to_value(payload)?))
    }

    /// Execute the named sub-template instead of the layout
    pub fn with_template_name(mut self, name: impl Into<String>) -> Self {
        self.template_name = Some(name.into());
        self
    }
}

/// A rendered message as written to the sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl RenderedMessage {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Flat text form: `Recipient`, `Subject`, then the body after `Body:`
impl fmt::Display for RenderedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Recipient: {}\nSubject: {}\nBody:\n{}",
            self.to, self.subject, self.body
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::TemplateStore;
    use serde_json::json;

    #[test]
    fn test_rendered_message_display() {
        let message = RenderedMessage::new("test@email.com", "Reset Password", "<p>hi</p>");
        assert_eq!(
            message.to_string(),
            "Recipient: test@email.com\nSubject: Reset Password\nBody:\n<p>hi</p>"
        );
    }

    #[test]
    fn test_rendered_message_serializes() {
        let message = RenderedMessage::new("a@b.c", "s", "b");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value, json!({"to": "a@b.c", "subject": "s", "body": "b"}));
    }

    #[test]
    fn test_render_request_builder() {
        let handle = TemplateStore::bundled()
            .load("layout.html", &["forgot_password.html"])
            .unwrap();

        let request = RenderRequest::new("a@b.c", "Reset Password", handle)
            .with_data(json!({"Link": "https://httpbin.org"}))
            .with_template_name("forgot_password");

        assert_eq!(request.to, "a@b.c");
        assert_eq!(request.data["Link"], "https://httpbin.org");
        assert_eq!(request.template_name.as_deref(), Some("forgot_password"));
    }

    #[test]
    fn test_render_request_with_payload() {
        #[derive(Serialize)]
        struct Payload {
            #[serde(rename = "Link")]
            link: &'static str,
        }

        let handle = TemplateStore::bundled().load::<&str>("layout.html", &[]).unwrap();
        let request = RenderRequest::new("a@b.c", "s", handle)
            .with_payload(&Payload { link: "https://httpbin.org" })
            .unwrap();

        assert_eq!(request.data, json!({"Link": "https://httpbin.org"}));
    }

    #[test]
    fn test_unserializable_payload_is_execution_error() {
        struct Unserializable;

        impl Serialize for Unserializable {
            fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("payload refused"))
            }
        }

        fn build(handle: TemplateHandle) -> crate::ExecutionResult<RenderRequest> {
            Ok(RenderRequest::new("a@b.c", "s", handle).with_payload(&Unserializable)?)
        }

        let handle = TemplateStore::bundled().load::<&str>("layout.html", &[]).unwrap();
        let err = build(handle).unwrap_err();

        assert!(matches!(err, crate::TemplateExecutionError::Payload(_)));
        assert!(err.to_string().contains("payload refused"));
    }
}
