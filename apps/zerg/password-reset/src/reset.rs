//! Forgot-password email flow.

use std::io::Write;

use core_config::{ConfigError, FromEnv, env_optional, env_or_default};
use mailer::{ExecutionResult, Notifier, RenderRequest, RenderedMessage, TemplateHandle};
use serde::Serialize;
use tracing::debug;

use crate::links::{ResetLinkIssuer, StaticResetLink, TokenResetLink};

/// Sub-template holding the reset message itself
pub const FORGOT_PASSWORD_TEMPLATE: &str = "forgot_password";

/// Configuration for the password reset flow
#[derive(Debug, Clone)]
pub struct PasswordResetConfig {
    /// Base URL for tokenised links; the static demo link is used when unset
    pub frontend_url: Option<String>,
    pub subject: String,
}

impl Default for PasswordResetConfig {
    fn default() -> Self {
        Self {
            frontend_url: None,
            subject: "Reset Password".to_string(),
        }
    }
}

impl FromEnv for PasswordResetConfig {
    /// - FRONTEND_URL: optional
    /// - PASSWORD_RESET_SUBJECT: defaults to "Reset Password"
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            frontend_url: env_optional("FRONTEND_URL"),
            subject: env_or_default("PASSWORD_RESET_SUBJECT", "Reset Password"),
        })
    }
}

impl PasswordResetConfig {
    /// Link issuer matching this configuration
    pub fn link_issuer(&self) -> Box<dyn ResetLinkIssuer> {
        match &self.frontend_url {
            Some(url) => Box::new(TokenResetLink::new(url.as_str())),
            None => Box::new(StaticResetLink::default()),
        }
    }
}

/// Payload of the forgot-password template
#[derive(Debug, Clone, Serialize)]
pub struct ForgotPasswordData {
    #[serde(rename = "Link")]
    pub link: String,
}

/// Sends forgot-password emails through a `Notifier`
pub struct PasswordResetMailer<W: Write> {
    notifier: Notifier<W>,
    template: TemplateHandle,
    links: Box<dyn ResetLinkIssuer>,
    subject: String,
}

impl<W: Write> PasswordResetMailer<W> {
    pub fn new(
        notifier: Notifier<W>,
        template: TemplateHandle,
        links: Box<dyn ResetLinkIssuer>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            notifier,
            template,
            links,
            subject: subject.into(),
        }
    }

    /// Build from configuration
    pub fn from_config(
        notifier: Notifier<W>,
        template: TemplateHandle,
        config: &PasswordResetConfig,
    ) -> Self {
        Self::new(notifier, template, config.link_issuer(), config.subject.clone())
    }

    /// Render and send the forgot-password email to `address`
    pub fn send_forgot_password(&self, address: &str) -> ExecutionResult<RenderedMessage> {
        let data = ForgotPasswordData {
            link: self.links.issue(address),
        };
        debug!(to = %address, "Issued password reset link");

        let request = RenderRequest::new(address, &self.subject, self.template.clone())
            .with_payload(&data)?;

        self.notifier.send(&request)
    }

    pub fn notifier(&self) -> &Notifier<W> {
        &self.notifier
    }

    /// Consume the mailer and return its notifier
    pub fn into_notifier(self) -> Notifier<W> {
        self.notifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailer::{CapturingSink, TemplateStore};
    use std::sync::Arc;

    fn mailer_with(sink: CapturingSink, config: &PasswordResetConfig) -> PasswordResetMailer<CapturingSink> {
        let store = Arc::new(TemplateStore::bundled());
        let template = store
            .load("layout.html", &["forgot_password.html"])
            .unwrap();
        PasswordResetMailer::from_config(Notifier::new(store, sink), template, config)
    }

    #[test]
    fn test_send_forgot_password_default_link() {
        let sink = CapturingSink::new();
        let mailer = mailer_with(sink.clone(), &PasswordResetConfig::default());

        let message = mailer.send_forgot_password("test@email.com").unwrap();

        assert_eq!(message.subject, "Reset Password");
        assert!(message.body.contains("https://httpbin.org"));
        assert!(sink.was_sent_to("test@email.com"));
    }

    #[test]
    fn test_send_forgot_password_token_link() {
        let config = PasswordResetConfig {
            frontend_url: Some("https://app.example.com".to_string()),
            subject: "Reset your password".to_string(),
        };
        let mailer = mailer_with(CapturingSink::new(), &config);

        let message = mailer.send_forgot_password("user@example.com").unwrap();

        assert_eq!(message.subject, "Reset your password");
        assert!(message.body.contains("https://app.example.com/reset-password/"));
    }

    #[test]
    fn test_sink_failure_propagates() {
        let mailer = mailer_with(
            CapturingSink::failing("offline"),
            &PasswordResetConfig::default(),
        );
        assert!(mailer.send_forgot_password("test@email.com").is_err());
    }

    #[test]
    fn test_config_from_env() {
        temp_env::with_vars(
            [
                ("FRONTEND_URL", Some("http://localhost:3000")),
                ("PASSWORD_RESET_SUBJECT", None),
            ],
            || {
                let config = PasswordResetConfig::from_env().unwrap();
                assert_eq!(config.frontend_url.as_deref(), Some("http://localhost:3000"));
                assert_eq!(config.subject, "Reset Password");
            },
        );
    }

    #[test]
    fn test_forgot_password_data_uses_template_field_name() {
        let value = serde_json::to_value(ForgotPasswordData {
            link: "x".to_string(),
        })
        .unwrap();
        assert_eq!(value, serde_json::json!({"Link": "x"}));
    }
}
