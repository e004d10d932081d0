//! Input checks shared by the identity and job handlers.

use std::sync::OnceLock;

use regex::Regex;

fn indian_mobile_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[6-9]\d{9}$").expect("static phone pattern is valid"))
}

/// Removes every non-digit character.
pub fn clean_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Indian mobile number: 10 digits starting with 6-9, after stripping
/// separators such as spaces and dashes.
pub fn validate_indian_phone(phone: &str) -> bool {
    indian_mobile_pattern().is_match(&clean_phone(phone))
}

/// Returns the canonical (digits-only) phone number, or `None` if invalid.
pub fn normalize_indian_phone(phone: &str) -> Option<String> {
    let cleaned = clean_phone(phone);
    validate_indian_phone(&cleaned).then_some(cleaned)
}

/// Strips all HTML from user-supplied text and trims it.
pub fn sanitize_input(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    ammonia::Builder::empty()
        .clean_content_tags(["script", "style"].into_iter().collect())
        .clean(text)
        .to_string()
        .trim()
        .to_string()
}

/// Names of required fields whose value is absent or blank, in the order given.
pub fn missing_fields(fields: &[(&str, Option<&str>)]) -> Vec<String> {
    fields
        .iter()
        .filter(|(_, value)| value.map(|v| v.trim().is_empty()).unwrap_or(true))
        .map(|(name, _)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_mobile_numbers() {
        assert!(validate_indian_phone("9876543210"));
        assert!(validate_indian_phone("6000000000"));
        assert!(validate_indian_phone("98765-43210"));
        assert!(validate_indian_phone("98765 43210"));
    }

    #[test]
    fn test_invalid_mobile_numbers() {
        assert!(!validate_indian_phone("1234567890"));
        assert!(!validate_indian_phone("5876543210"));
        assert!(!validate_indian_phone("987654321"));
        assert!(!validate_indian_phone("98765432100"));
        assert!(!validate_indian_phone(""));
        assert!(!validate_indian_phone("phone"));
    }

    #[test]
    fn test_every_leading_digit() {
        for lead in '0'..='9' {
            let phone = format!("{lead}123456789");
            assert_eq!(validate_indian_phone(&phone), ('6'..='9').contains(&lead), "{phone}");
        }
    }

    #[test]
    fn test_normalize_returns_digits_only() {
        assert_eq!(normalize_indian_phone("98765-43210").as_deref(), Some("9876543210"));
        assert_eq!(normalize_indian_phone("12345-67890"), None);
    }

    #[test]
    fn test_sanitize_strips_tags() {
        assert_eq!(sanitize_input("<b>Ravi</b> Kumar"), "Ravi Kumar");
        assert_eq!(sanitize_input("<script>alert(1)</script>Welder"), "Welder");
        assert_eq!(sanitize_input(""), "");
    }

    #[test]
    fn test_missing_fields_preserves_order() {
        let missing = missing_fields(&[
            ("title", Some("  ")),
            ("trade", Some("Welder")),
            ("description", None),
        ]);
        assert_eq!(missing, vec!["title", "description"]);
    }
}
