//! Input validation helpers for account fields.

use once_cell::sync::Lazy;
use regex::Regex;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const BIRTH_YEAR_MIN: i32 = 1920;
pub const BIRTH_YEAR_MAX: i32 = 2020;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new("^([a-z0-9.!#$%&'*+/=?^_`{|}~-]+)@([a-z0-9-]+)(\\.[a-z0-9-]+)+$")
        .expect("email regex is valid")
});

/// Check a lowercased email address for well-formedness.
pub fn email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

/// Validate a mobile phone number: whitespace is stripped, an optional
/// leading `+` is allowed, and 10-15 digits must remain. Returns the
/// normalized form.
pub fn mobile_phone(s: &str) -> Option<String> {
    let stripped: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = stripped.strip_prefix('+').unwrap_or(&stripped);
    if digits.len() < 10 || digits.len() > 15 {
        return None;
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(stripped)
}

/// Inclusive plausibility range for birth years.
pub fn birth_year(year: i32) -> bool {
    (BIRTH_YEAR_MIN..=BIRTH_YEAR_MAX).contains(&year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_email() {
        assert!(email("alice@example.com"));
        assert!(email("a.b+c@sub.domain.org"));
    }

    #[test]
    fn rejects_malformed_email() {
        assert!(!email("not-an-email"));
        assert!(!email("missing@tld"));
        assert!(!email("@example.com"));
        assert!(!email("spaced name@example.com"));
    }

    #[test]
    fn phone_strips_whitespace() {
        assert_eq!(
            mobile_phone("555 123 45 67").as_deref(),
            Some("5551234567")
        );
        assert_eq!(
            mobile_phone("+90 555 123 45 67").as_deref(),
            Some("+905551234567")
        );
    }

    #[test]
    fn phone_rejects_short_and_letters() {
        assert!(mobile_phone("12345").is_none());
        assert!(mobile_phone("555-123-4567").is_none());
        assert!(mobile_phone("phone number").is_none());
    }

    #[test]
    fn birth_year_bounds_are_inclusive() {
        assert!(!birth_year(1919));
        assert!(birth_year(1920));
        assert!(birth_year(2020));
        assert!(!birth_year(2021));
    }
}
