//! Reset link issuers
//!
//! The mailer never builds links itself; it asks a `ResetLinkIssuer` for one.

use rand::Rng;
use rand::distr::Alphanumeric;

/// Length of generated reset tokens
pub const TOKEN_LENGTH: usize = 64;

/// Produces the password-reset link for an address
pub trait ResetLinkIssuer: Send + Sync {
    fn issue(&self, address: &str) -> String;
}

/// Always returns the same link
#[derive(Debug, Clone)]
pub struct StaticResetLink(pub String);

impl Default for StaticResetLink {
    fn default() -> Self {
        Self("https://httpbin.org".to_string())
    }
}

impl ResetLinkIssuer for StaticResetLink {
    fn issue(&self, _address: &str) -> String {
        self.0.clone()
    }
}

/// Issues `<base_url>/reset-password/<token>` with a fresh random token
#[derive(Debug, Clone)]
pub struct TokenResetLink {
    base_url: String,
}

impl TokenResetLink {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Generate a random alphanumeric token
    pub fn generate_token() -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect()
    }
}

impl ResetLinkIssuer for TokenResetLink {
    fn issue(&self, _address: &str) -> String {
        format!("{}/reset-password/{}", self.base_url, Self::generate_token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_link_default() {
        let issuer = StaticResetLink::default();
        assert_eq!(issuer.issue("a@b.c"), "https://httpbin.org");
    }

    #[test]
    fn test_token_link_shape() {
        let issuer = TokenResetLink::new("http://localhost:3000/");
        let link = issuer.issue("a@b.c");

        let token = link
            .strip_prefix("http://localhost:3000/reset-password/")
            .unwrap();
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_tokens_differ() {
        assert_ne!(TokenResetLink::generate_token(), TokenResetLink::generate_token());
    }
}
