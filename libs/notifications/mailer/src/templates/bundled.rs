//! Templates compiled into the binary.

const BUNDLED: &[(&str, &str)] = &[
    ("layout.html", include_str!("../../templates/layout.html")),
    (
        "forgot_password.html",
        include_str!("../../templates/forgot_password.html"),
    ),
];

/// Look up a bundled template by identifier
pub fn get(id: &str) -> Option<&'static str> {
    BUNDLED
        .iter()
        .find(|(name, _)| *name == id)
        .map(|(_, contents)| *contents)
}

/// Identifiers of all bundled templates
pub fn identifiers() -> impl Iterator<Item = &'static str> {
    BUNDLED.iter().map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_templates_present() {
        assert!(get("layout.html").unwrap().contains("{{> content}}"));
        assert!(get("forgot_password.html").unwrap().contains("{{Link}}"));
    }

    #[test]
    fn test_unknown_identifier() {
        assert!(get("welcome.html").is_none());
    }

    #[test]
    fn test_identifiers() {
        let ids: Vec<_> = identifiers().collect();
        assert_eq!(ids, vec!["layout.html", "forgot_password.html"]);
    }
}
