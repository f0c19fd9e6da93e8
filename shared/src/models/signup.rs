use serde::{Deserialize, Serialize};

/// Discriminator stored on every record written by the contact endpoint
pub const CONTACT_SIGNUP_TYPE: &str = "contact";

/// Prefix marking an identity synthesized for a contact without an email
pub const PLACEHOLDER_EMAIL_PREFIX: &str = "missing::";

/// Escapes the key separator so each component stays unambiguous
fn escape_key_part(part: &str) -> String {
    part.replace('%', "%25").replace('#', "%23")
}

/// Builds the composite natural key used as the DynamoDB partition key.
///
/// A record is identified by the contact's email (real or placeholder), the
/// recruiter who logged it and the campaign it was logged for. `%` and `#`
/// are percent-encoded inside each component, so distinct triples never
/// share a key.
pub fn signup_key(email: &str, recruited_by: &str, campaign: &str) -> String {
    format!(
        "{}#{}#{}",
        escape_key_part(campaign),
        escape_key_part(recruited_by),
        escape_key_part(email)
    )
}

/// A stored signup in the `signups` table.
///
/// `email` is always non-empty: contacts submitted without one carry a
/// `missing::<token>` placeholder instead.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignupRecord {
    pub signup_key: String,
    pub email: String,
    pub recruited_by: String,
    pub campaign: String,
    #[serde(rename = "type")]
    pub signup_type: String,
    pub last_updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volunteer_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl SignupRecord {
    pub fn is_placeholder_email(&self) -> bool {
        self.email.starts_with(PLACEHOLDER_EMAIL_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_key_orders_campaign_recruiter_email() {
        assert_eq!(signup_key("a@b.com", "R1", "C1"), "C1#R1#a@b.com");
    }

    #[test]
    fn test_signup_key_separator_in_components_does_not_collide() {
        let first = signup_key("x#a@b.com", "R1", "C1");
        let second = signup_key("a@b.com", "R1#x", "C1");

        assert_ne!(first, second);
        assert_eq!(first, "C1#R1#x%23a@b.com");
        assert_eq!(second, "C1#R1%23x#a@b.com");
    }

    #[test]
    fn test_signup_key_escapes_percent_before_separator() {
        // "%23" literally must not read back as an escaped "#"
        assert_ne!(
            signup_key("a%23b@c.com", "R1", "C1"),
            signup_key("a#b@c.com", "R1", "C1")
        );
    }

    #[test]
    fn test_record_serializes_camel_case_and_skips_absent_fields() {
        let record = SignupRecord {
            signup_key: signup_key("a@b.com", "R1", "C1"),
            email: "a@b.com".to_string(),
            recruited_by: "R1".to_string(),
            campaign: "C1".to_string(),
            signup_type: CONTACT_SIGNUP_TYPE.to_string(),
            last_updated_at: 1_700_000_000_000,
            first_name: Some("A".to_string()),
            last_name: None,
            phone: None,
            zip: None,
            support_level: Some("strong".to_string()),
            volunteer_level: None,
            note: None,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["signupKey"], "C1#R1#a@b.com");
        assert_eq!(json["recruitedBy"], "R1");
        assert_eq!(json["type"], "contact");
        assert_eq!(json["firstName"], "A");
        assert_eq!(json["supportLevel"], "strong");
        assert!(json.get("lastName").is_none());
        assert!(json.get("note").is_none());
        assert!(!record.is_placeholder_email());
    }
}
