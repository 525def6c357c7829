//! Field format checks and display formatters for client forms.
//!
//! Every function here is total: malformed input yields `false` or a
//! `(false, message)` pair, never a panic.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// Number of digits in a SIRET.
pub const TAX_ID_DIGITS: usize = 14;
/// Number of digits in a French postal code.
pub const POSTAL_CODE_DIGITS: usize = 5;
/// Number of digits in a French phone number.
pub const PHONE_DIGITS: usize = 10;

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Removes spaces and hyphens from a tax id.
#[must_use]
pub fn normalize_tax_id(tax_id: &str) -> String {
    tax_id.chars().filter(|c| *c != ' ' && *c != '-').collect()
}

/// Removes spaces, dots and hyphens from a phone number.
#[must_use]
pub fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '.' | '-'))
        .collect()
}

/// Checks a `local@domain.tld` address. Empty is invalid.
#[must_use]
pub fn validate_email(email: &str) -> bool {
    !email.is_empty() && EMAIL_RE.is_match(email)
}

/// Checks a SIRET (14 digits once spaces and hyphens are removed).
#[must_use]
pub fn validate_tax_id(tax_id: &str) -> (bool, String) {
    if tax_id.is_empty() {
        return (
            false,
            "Tax id (SIRET) is required for organizations.".to_string(),
        );
    }

    let clean = normalize_tax_id(tax_id);

    if !all_digits(&clean) {
        return (false, "Tax id (SIRET) must contain digits only".to_string());
    }

    if clean.len() != TAX_ID_DIGITS {
        return (
            false,
            format!(
                "Tax id (SIRET) must contain {TAX_ID_DIGITS} digits (currently {})",
                clean.len()
            ),
        );
    }

    (true, "Valid tax id".to_string())
}

/// Checks a postal code: exactly 5 digits once spaces are removed.
#[must_use]
pub fn validate_postal_code(code: &str) -> bool {
    let clean: String = code.chars().filter(|c| *c != ' ').collect();
    all_digits(&clean) && clean.len() == POSTAL_CODE_DIGITS
}

/// Checks a phone number. Empty is valid since the field is optional.
#[must_use]
pub fn validate_phone(phone: &str) -> bool {
    if phone.is_empty() {
        return true;
    }

    let clean = normalize_phone(phone);
    all_digits(&clean) && clean.len() == PHONE_DIGITS && clean.starts_with('0')
}

/// Groups a valid phone number by pairs: `06 12 34 56 78`.
///
/// Input failing [`validate_phone`] is returned unchanged.
#[must_use]
pub fn format_phone(phone: &str) -> String {
    if phone.is_empty() || !validate_phone(phone) {
        return phone.to_string();
    }

    let clean = normalize_phone(phone);
    let pairs: Vec<&str> = (0..PHONE_DIGITS)
        .step_by(2)
        .map(|i| &clean[i..i + 2])
        .collect();
    pairs.join(" ")
}

/// Groups a valid SIRET for display: `123 456 789 01234`.
///
/// Input failing [`validate_tax_id`] is returned unchanged.
#[must_use]
pub fn format_tax_id(tax_id: &str) -> String {
    if !validate_tax_id(tax_id).0 {
        return tax_id.to_string();
    }

    let clean = normalize_tax_id(tax_id);
    format!(
        "{} {} {} {}",
        &clean[0..3],
        &clean[3..6],
        &clean[6..9],
        &clean[9..14]
    )
}

/// Checks that a required field is not blank.
#[must_use]
pub fn validate_required(value: &str, field_label: &str) -> (bool, String) {
    if value.trim().is_empty() {
        return (false, format!("{field_label} is required"));
    }
    (true, String::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("test@example.com", true)]
    #[case("marie.dupont@email.fr", true)]
    #[case("a+b_c%d@sub.domain.co", true)]
    #[case("", false)]
    #[case("invalid-email", false)]
    #[case("no-tld@domain", false)]
    #[case("@example.com", false)]
    #[case("user@example.c", false)]
    #[case("user name@example.com", false)]
    fn test_validate_email(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(validate_email(input), expected);
    }

    #[rstest]
    #[case("12345678901234", true)]
    #[case("123 456 789 01234", true)]
    #[case("123-456-789-01234", true)]
    #[case("123456789", false)]
    #[case("1234567890123A", false)]
    #[case("123456789012345", false)]
    fn test_validate_tax_id(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(validate_tax_id(input).0, expected);
    }

    #[test]
    fn test_validate_tax_id_messages() {
        let (ok, msg) = validate_tax_id("");
        assert!(!ok);
        assert!(msg.contains("required for organizations."));

        let (_, msg) = validate_tax_id("123456789");
        assert!(msg.contains("(currently 9)"));

        let (_, msg) = validate_tax_id("12345abc");
        assert!(msg.contains("digits only"));
    }

    #[rstest]
    #[case("75001", true)]
    #[case("75 001", true)]
    #[case("7500", false)]
    #[case("750011", false)]
    #[case("7500A", false)]
    #[case("", false)]
    fn test_validate_postal_code(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(validate_postal_code(input), expected);
    }

    #[rstest]
    #[case("", true)]
    #[case("0612345678", true)]
    #[case("06 12 34 56 78", true)]
    #[case("06.12.34.56.78", true)]
    #[case("06-12-34-56-78", true)]
    #[case("123", false)]
    #[case("1612345678", false)]
    #[case("06123456789", false)]
    #[case("06 12 34 56 7A", false)]
    fn test_validate_phone(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(validate_phone(input), expected);
    }

    #[test]
    fn test_format_phone() {
        assert_eq!(format_phone("0612345678"), "06 12 34 56 78");
        assert_eq!(format_phone("06.12.34.56.78"), "06 12 34 56 78");
        assert_eq!(format_phone(""), "");
        // invalid input is never partially formatted
        assert_eq!(format_phone("123"), "123");
        assert_eq!(format_phone("1612345678"), "1612345678");
    }

    #[test]
    fn test_format_phone_round_trip() {
        let raw = "0612345678";
        assert_eq!(format_phone(raw).replace(' ', ""), raw);
    }

    #[test]
    fn test_format_tax_id() {
        assert_eq!(format_tax_id("12345678901234"), "123 456 789 01234");
        assert_eq!(format_tax_id("123-456-789-01234"), "123 456 789 01234");
        assert_eq!(format_tax_id("123456789"), "123456789");
        assert_eq!(format_tax_id(""), "");
    }

    #[test]
    fn test_validate_required() {
        assert_eq!(
            validate_required("   ", "City"),
            (false, "City is required".to_string())
        );
        assert_eq!(validate_required("Lyon", "City"), (true, String::new()));
    }
}
