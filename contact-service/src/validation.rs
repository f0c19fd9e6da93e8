use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::models::{ContactRequest, OptionalField};

/// Practical RFC 5322 address pattern, applied after trimming and lowercasing
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?$",
    )
    .expect("EMAIL_REGEX is a valid regex pattern")
});

static ZIP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{5})(?:-?\d{4})?$").expect("ZIP_REGEX is a valid regex pattern")
});

const MAX_EMAIL_LENGTH: usize = 254;

/// The first field that failed validation, and why
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{field}: {error}")]
pub struct ValidationError {
    pub field: &'static str,
    pub error: String,
}

/// Contact fields after validation.
///
/// `None` means the field was absent or null. Blank strings also become
/// `None` for email, phone and zip; the unchecked fields (names, levels,
/// note) keep whatever string was sent. A `Some` value has passed every rule
/// configured for its field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedContact {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub zip: Option<String>,
    pub support_level: Option<String>,
    pub volunteer_level: Option<String>,
    pub note: Option<String>,
}

/// A single validation/normalization step. Receives `None` for a present
/// `null` and returns the normalized value or a reason.
type FieldRule = fn(Option<String>) -> Result<Option<String>, String>;

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn validate_email_not_required(value: Option<String>) -> Result<Option<String>, String> {
    let Some(value) = non_blank(value) else {
        return Ok(None);
    };

    let email = value.trim().to_lowercase();
    if email.len() > MAX_EMAIL_LENGTH || !EMAIL_REGEX.is_match(&email) {
        return Err("Invalid email address".to_string());
    }

    Ok(Some(email))
}

/// Accepts US numbers with or without a leading country code and
/// normalizes them to ten digits.
pub fn validate_phone_not_required(value: Option<String>) -> Result<Option<String>, String> {
    let Some(value) = non_blank(value) else {
        return Ok(None);
    };

    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    let digits = if digits.len() == 11 && digits.starts_with('1') {
        digits[1..].to_string()
    } else {
        digits
    };

    if digits.len() != 10 || value.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err("Invalid phone number".to_string());
    }

    Ok(Some(digits))
}

/// Accepts ZIP and ZIP+4 and keeps the five-digit prefix
pub fn validate_zip_not_required(value: Option<String>) -> Result<Option<String>, String> {
    let Some(value) = non_blank(value) else {
        return Ok(None);
    };

    ZIP_REGEX
        .captures(value.trim())
        .and_then(|caps| caps.get(1))
        .map(|zip| Some(zip.as_str().to_string()))
        .ok_or_else(|| "Invalid zip code".to_string())
}

/// Runs `rules` over a field that was present in the request. Absent fields
/// are skipped entirely.
fn check_field(
    field: &'static str,
    input: Option<OptionalField<String>>,
    rules: &[FieldRule],
) -> Result<Option<String>, ValidationError> {
    let initial = match input {
        None => return Ok(None),
        Some(OptionalField::Value(value)) => Some(value),
        Some(OptionalField::Null) => None,
        Some(OptionalField::WrongType(kind)) => {
            return Err(ValidationError {
                field,
                error: format!("Expected a string, got {}", kind),
            })
        }
    };

    rules
        .iter()
        .try_fold(initial, |value, rule| rule(value))
        .map_err(|error| ValidationError { field, error })
}

/// Validates and normalizes a contact submission, stopping at the first
/// invalid field in request order.
pub fn validate_contact(request: ContactRequest) -> Result<NormalizedContact, ValidationError> {
    Ok(NormalizedContact {
        email: check_field("email", request.email, &[validate_email_not_required])?,
        first_name: check_field("firstName", request.first_name, &[])?,
        last_name: check_field("lastName", request.last_name, &[])?,
        phone: check_field("phone", request.phone, &[validate_phone_not_required])?,
        zip: check_field("zip", request.zip, &[validate_zip_not_required])?,
        support_level: check_field("supportLevel", request.support_level, &[])?,
        volunteer_level: check_field("volunteerLevel", request.volunteer_level, &[])?,
        note: check_field("note", request.note, &[])?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(s: &str) -> Option<OptionalField<String>> {
        Some(OptionalField::Value(s.to_string()))
    }

    #[test]
    fn test_email_is_trimmed_and_lowercased() {
        assert_eq!(
            validate_email_not_required(Some("  Jane.Doe+tag@Example.COM ".to_string())),
            Ok(Some("jane.doe+tag@example.com".to_string()))
        );
    }

    #[test]
    fn test_email_rejects_malformed() {
        for bad in ["not-an-email", "@example.com", "user@", "a b@example.com", "user@host"] {
            assert_eq!(
                validate_email_not_required(Some(bad.to_string())),
                Err("Invalid email address".to_string()),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_not_required_rules_accept_null_and_blank() {
        assert_eq!(validate_email_not_required(None), Ok(None));
        assert_eq!(validate_phone_not_required(Some("   ".to_string())), Ok(None));
        assert_eq!(validate_zip_not_required(Some(String::new())), Ok(None));
    }

    #[test]
    fn test_phone_normalizes_to_ten_digits() {
        assert_eq!(
            validate_phone_not_required(Some("(617) 555-0123".to_string())),
            Ok(Some("6175550123".to_string()))
        );
        assert_eq!(
            validate_phone_not_required(Some("+1 617.555.0123".to_string())),
            Ok(Some("6175550123".to_string()))
        );
    }

    #[test]
    fn test_phone_rejects_wrong_length_and_letters() {
        assert!(validate_phone_not_required(Some("555-0123".to_string())).is_err());
        assert!(validate_phone_not_required(Some("2617555012345".to_string())).is_err());
        assert!(validate_phone_not_required(Some("617-555-CALL".to_string())).is_err());
    }

    #[test]
    fn test_zip_accepts_zip_plus_four() {
        assert_eq!(
            validate_zip_not_required(Some("02134".to_string())),
            Ok(Some("02134".to_string()))
        );
        assert_eq!(
            validate_zip_not_required(Some(" 02134-1234 ".to_string())),
            Ok(Some("02134".to_string()))
        );
        assert_eq!(
            validate_zip_not_required(Some("021341234".to_string())),
            Ok(Some("02134".to_string()))
        );
        assert!(validate_zip_not_required(Some("2134".to_string())).is_err());
        assert!(validate_zip_not_required(Some("ABCDE".to_string())).is_err());
    }

    #[test]
    fn test_validate_contact_passes_unchecked_fields_through() {
        let request = ContactRequest {
            first_name: value(" Ada "),
            support_level: value("strong"),
            note: Some(OptionalField::Null),
            ..Default::default()
        };

        let contact = validate_contact(request).unwrap();
        assert_eq!(contact.first_name.as_deref(), Some(" Ada "));
        assert_eq!(contact.support_level.as_deref(), Some("strong"));
        assert_eq!(contact.note, None);
        assert_eq!(contact.email, None);
    }

    #[test]
    fn test_validate_contact_reports_first_failing_field() {
        let request = ContactRequest {
            email: value("bad"),
            phone: value("123"),
            zip: value("nope"),
            ..Default::default()
        };

        let err = validate_contact(request).unwrap_err();
        assert_eq!(err.field, "email");
        assert_eq!(err.error, "Invalid email address");

        let request = ContactRequest {
            email: value("ok@example.com"),
            phone: value("123"),
            zip: value("nope"),
            ..Default::default()
        };
        assert_eq!(validate_contact(request).unwrap_err().field, "phone");
    }

    #[test]
    fn test_validate_contact_rejects_non_string_values() {
        let request = ContactRequest {
            first_name: value("A"),
            zip: Some(OptionalField::WrongType("number")),
            ..Default::default()
        };

        let err = validate_contact(request).unwrap_err();
        assert_eq!(err.field, "zip");
        assert_eq!(err.error, "Expected a string, got number");
    }

    #[test]
    fn test_unchecked_fields_keep_blank_strings() {
        let request = ContactRequest {
            first_name: value(""),
            note: value("  "),
            ..Default::default()
        };

        let contact = validate_contact(request).unwrap();
        assert_eq!(contact.first_name.as_deref(), Some(""));
        assert_eq!(contact.note.as_deref(), Some("  "));
    }

    #[test]
    fn test_validate_contact_skips_absent_validated_fields() {
        let request = ContactRequest {
            first_name: value("A"),
            ..Default::default()
        };

        let contact = validate_contact(request).unwrap();
        assert_eq!(contact.zip, None);
        assert_eq!(contact.phone, None);
    }
}
