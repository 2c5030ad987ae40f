//! Input checks shared by the services.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{DataError, Result};

static EMAIL_PATTERN: Lazy<std::result::Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$"));

/// Longest accepted email address.
pub const MAX_EMAIL_LEN: usize = 254;
/// Feedback title length bounds.
pub const FEEDBACK_TITLE_LEN: (usize, usize) = (3, 120);
/// Feedback body length bounds.
pub const FEEDBACK_BODY_LEN: (usize, usize) = (10, 5_000);
/// Longest accepted API key name.
pub const MAX_KEY_NAME_LEN: usize = 64;
/// Longest accepted API key lifetime in days.
pub const MAX_KEY_LIFETIME_DAYS: u32 = 365;

/// Trim and lowercase an email, rejecting malformed addresses.
pub fn normalize_email(raw: &str) -> Result<String> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(DataError::Validation {
            field: "email",
            reason: "is required",
        });
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(DataError::Validation {
            field: "email",
            reason: "is too long",
        });
    }
    let pattern = EMAIL_PATTERN.as_ref().map_err(|_| DataError::Validation {
        field: "email",
        reason: "could not be checked",
    })?;
    if !pattern.is_match(&email) {
        return Err(DataError::Validation {
            field: "email",
            reason: "is not a valid address",
        });
    }
    Ok(email)
}

/// Trimmed text whose character count lies within `bounds`.
pub fn bounded_text(field: &'static str, raw: &str, bounds: (usize, usize)) -> Result<String> {
    let text = raw.trim();
    let len = text.chars().count();
    if len < bounds.0 {
        return Err(DataError::Validation {
            field,
            reason: "is too short",
        });
    }
    if len > bounds.1 {
        return Err(DataError::Validation {
            field,
            reason: "is too long",
        });
    }
    Ok(text.to_string())
}

/// URL slug: lowercase ASCII alphanumerics separated by single hyphens.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Accept an explicit slug only if it is already in canonical form.
pub fn check_slug(slug: &str) -> Result<()> {
    if slug.is_empty() || slugify(slug) != slug {
        return Err(DataError::Validation {
            field: "slug",
            reason: "must be lowercase letters, digits and single hyphens",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_normalised_and_checked() {
        assert_eq!(
            normalize_email("  Ada@Example.COM ").ok().as_deref(),
            Some("ada@example.com")
        );
        for bad in ["", "ada", "ada@", "ada@example", "a da@example.com"] {
            assert!(normalize_email(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn bounded_text_counts_characters() {
        assert!(bounded_text("title", "  ok ", (3, 10)).is_err());
        assert_eq!(
            bounded_text("title", " héllo ", (3, 5)).ok().as_deref(),
            Some("héllo")
        );
        assert!(bounded_text("title", "abcdef", (3, 5)).is_err());
    }

    #[test]
    fn slugs_collapse_punctuation() {
        assert_eq!(slugify("Hello, World! 2025 edition"), "hello-world-2025-edition");
        assert_eq!(slugify("--Rust & Yew--"), "rust-yew");
        assert!(check_slug("rust-yew").is_ok());
        assert!(check_slug("Rust Yew").is_err());
        assert!(check_slug("").is_err());
    }
}
