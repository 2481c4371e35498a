use std::io::Write;

use mailer::{ExecutionResult, RenderedMessage};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::reset::PasswordResetMailer;

/// An account holder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Send this user a forgot-password email.
    ///
    /// Failures are returned to the caller, which decides whether they are fatal.
    pub fn reset_password<W: Write>(
        &self,
        mailer: &PasswordResetMailer<W>,
    ) -> ExecutionResult<RenderedMessage> {
        let message = mailer.send_forgot_password(&self.email)?;
        info!(user = %self.name, email = %self.email, "Password reset email sent");
        Ok(message)
    }
}
