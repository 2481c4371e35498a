//! Password Reset Demo
//!
//! Renders a forgot-password email for a user and writes it to stdout.
//!
//! ## Flow
//!
//! ```text
//! User::reset_password
//!   ↓
//! PasswordResetMailer (asks ResetLinkIssuer for a link)
//!   ↓
//! Notifier (executes the layout + forgot_password template set)
//!   ↓
//! stdout
//! ```

pub mod links;
pub mod reset;
pub mod user;

use std::io::Stdout;
use std::sync::Arc;

use core_config::{Environment, FromEnv, TemplateSourceKind, TemplatesConfig, env_or_default};
use eyre::{Result, WrapErr};
use mailer::{Notifier, TemplateStore};
use tracing::info;

pub use links::{ResetLinkIssuer, StaticResetLink, TokenResetLink};
pub use reset::{PasswordResetConfig, PasswordResetMailer};
pub use user::User;

/// Build the template store described by `config`
pub fn template_store(config: &TemplatesConfig) -> TemplateStore {
    match config.source {
        TemplateSourceKind::Bundled => TemplateStore::bundled(),
        TemplateSourceKind::Files => TemplateStore::from_dir(&config.dir),
    }
}

/// Load templates and wire a mailer that prints to stdout.
///
/// Template problems surface here, before anything is sent.
pub fn build_mailer(
    templates: &TemplatesConfig,
    reset: &PasswordResetConfig,
) -> Result<PasswordResetMailer<Stdout>> {
    let store = Arc::new(template_store(templates));
    let template = store
        .load(&templates.layout, &templates.fragments)
        .wrap_err_with(|| format!("Failed to load template set '{}'", templates.layout))?;
    info!(
        origin = ?store.origin(),
        layout = %template.layout(),
        fragments = ?template.fragments(),
        "Templates loaded"
    );

    Ok(PasswordResetMailer::from_config(
        Notifier::stdout(store),
        template,
        reset,
    ))
}

/// Run the demo
///
/// 1. Sets up structured logging (JSON for prod, pretty for dev, on stderr)
/// 2. Loads template and reset configuration from the environment
/// 3. Parses the template set once
/// 4. Sends a reset email for the demo user
///
/// # Errors
///
/// Returns an error if configuration is invalid, templates fail to load,
/// or the message cannot be rendered or written.
pub fn run() -> Result<()> {
    let environment = Environment::from_env();
    core_config::tracing::init_tracing(&environment);

    info!(
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
        "Starting password reset demo"
    );

    let templates =
        TemplatesConfig::from_env().wrap_err("Failed to load template configuration")?;
    let reset =
        PasswordResetConfig::from_env().wrap_err("Failed to load password reset configuration")?;

    let mailer = build_mailer(&templates, &reset)?;

    let user = User::new(
        env_or_default("DEMO_USER_NAME", "Test User"),
        env_or_default("DEMO_USER_EMAIL", "test@email.com"),
    );

    user.reset_password(&mailer)
        .wrap_err_with(|| format!("Failed to send password reset email to {}", user.email))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_build_mailer_bundled() {
        assert!(build_mailer(&TemplatesConfig::default(), &PasswordResetConfig::default()).is_ok());
    }

    #[test]
    fn test_build_mailer_missing_directory() {
        let templates = TemplatesConfig {
            source: TemplateSourceKind::Files,
            dir: PathBuf::from("/nonexistent/templates"),
            ..TemplatesConfig::default()
        };

        let err = build_mailer(&templates, &PasswordResetConfig::default())
            .err()
            .unwrap();
        assert!(err.to_string().contains("layout.html"));
    }

    #[test]
    fn test_template_store_origin() {
        let templates = TemplatesConfig {
            source: TemplateSourceKind::Files,
            dir: PathBuf::from("mail"),
            ..TemplatesConfig::default()
        };
        assert_eq!(
            template_store(&templates).origin(),
            &mailer::TemplateOrigin::Directory(PathBuf::from("mail"))
        );
    }
}
