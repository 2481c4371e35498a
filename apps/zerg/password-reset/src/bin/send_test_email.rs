//! Test binary to print one forgot-password email
//!
//! Run with: cargo run -p zerg_password_reset --bin send_test_email -- user@example.com

use core_config::{FromEnv, TemplatesConfig};
use eyre::Result;
use zerg_password_reset::{PasswordResetConfig, User, build_mailer};

fn main() -> Result<()> {
    color_eyre::install()?;

    let address = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "test@email.com".to_string());

    let mailer = build_mailer(&TemplatesConfig::from_env()?, &PasswordResetConfig::from_env()?)?;

    eprintln!("Sending test email to: {}", address);
    let message = User::new("Test User", address).reset_password(&mailer)?;
    eprintln!();
    eprintln!("Sent {} byte body to {}", message.body.len(), message.to);

    Ok(())
}
