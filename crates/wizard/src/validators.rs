use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use url::Url;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

static DOI_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^10\.\d{4,}/[-._;()/:a-zA-Z0-9]+$").expect("valid doi pattern")
});

/// `local@domain.tld` shape; no deliverability check.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

pub fn is_valid_doi(value: &str) -> bool {
    DOI_REGEX.is_match(value)
}

/// Absolute URL with a scheme, e.g. `https://example.com/data1`.
pub fn is_valid_url(value: &str) -> bool {
    Url::parse(value).is_ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

pub fn password_strength(password: &str) -> PasswordStrength {
    let length = password.chars().count();
    let checks = [
        length >= 8,
        length >= 12,
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];
    match checks.into_iter().filter(|passed| *passed).count() {
        0..=2 => PasswordStrength::Weak,
        3..=4 => PasswordStrength::Medium,
        _ => PasswordStrength::Strong,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        assert!(is_valid_email("admin@example.com"));
        assert!(is_valid_email("a.b+c@lab.example.org"));
        assert!(!is_valid_email("admin@example"));
        assert!(!is_valid_email("admin example@x.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn doi_pattern() {
        assert!(is_valid_doi("10.1038/s41586-024-12345"));
        assert!(is_valid_doi("10.1016/j.cell.2023.01.001"));
        assert!(is_valid_doi("10.12345/(abc);def:ghi"));
        assert!(!is_valid_doi("10.123/short-registrant"));
        assert!(!is_valid_doi("11.1038/abc"));
        assert!(!is_valid_doi("10.1038/"));
        assert!(!is_valid_doi("10.1038/with space"));
    }

    #[test]
    fn url_must_be_absolute() {
        assert!(is_valid_url("https://example.com/data1"));
        assert!(is_valid_url("ftp://ftp.ncbi.nlm.nih.gov/geo/"));
        assert!(!is_valid_url("example.com/data1"));
        assert!(!is_valid_url("not a url"));
    }

    #[test]
    fn password_strength_scores() {
        assert_eq!(password_strength("abc"), PasswordStrength::Weak);
        assert_eq!(password_strength("abcdefgh"), PasswordStrength::Weak);
        assert_eq!(password_strength("abcdefgh1"), PasswordStrength::Medium);
        assert_eq!(password_strength("Abcdefgh1"), PasswordStrength::Medium);
        assert_eq!(password_strength("Abcdefgh1!"), PasswordStrength::Strong);
        assert_eq!(password_strength("Abcdefghijk1!"), PasswordStrength::Strong);
        assert_eq!(
            serde_json::to_value(PasswordStrength::Medium).expect("strength"),
            "medium"
        );
    }
}
