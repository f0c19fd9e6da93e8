use log::{info, warn};
use recruit_shared::bsd::{CrmError, ExternalPayload, FormSubmitter};

use crate::config::ContactConfig;
use crate::validation::NormalizedContact;

/// Support level keys and the codes BSD stores for them
const SUPPORT_CODES: &[(&str, &str)] = &[
    ("strong", "1"),
    ("lean", "2"),
    ("undecided", "3"),
    ("leanAgainst", "4"),
    ("against", "5"),
];

const VOLUNTEER_CODES: &[(&str, &str)] = &[("yes", "1"), ("maybe", "2"), ("later", "3"), ("no", "4")];

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(level, _)| *level == key)
        .map(|(_, code)| *code)
}

pub fn support_code(level: &str) -> Option<&'static str> {
    lookup(SUPPORT_CODES, level)
}

pub fn volunteer_code(level: &str) -> Option<&'static str> {
    lookup(VOLUNTEER_CODES, level)
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Maps a validated contact onto the BSD contact form.
///
/// An unrecognized support or volunteer level leaves its field out of the
/// payload rather than failing the request.
pub fn build_contact_payload(
    contact: &NormalizedContact,
    recruiter_email: &str,
    config: &ContactConfig,
) -> ExternalPayload {
    let mut payload = ExternalPayload::new();

    // BSD requires the email key even when it is empty
    payload.insert("email", contact.email.as_deref().unwrap_or(""));
    payload.insert_opt("firstname", contact.first_name.as_deref());
    payload.insert_opt("lastname", contact.last_name.as_deref());
    payload.insert_opt("phone", contact.phone.as_deref());
    payload.insert_opt("zip", contact.zip.as_deref());
    payload.insert(config.friend_field_id.as_str(), recruiter_email);

    if let Some(level) = present(&contact.support_level) {
        match support_code(level) {
            Some(code) => payload.insert(config.support_field_id.as_str(), code),
            None => warn!("Unknown support level '{}', leaving it out of BSD payload", level),
        }
    }

    if let Some(level) = present(&contact.volunteer_level) {
        match volunteer_code(level) {
            Some(code) => payload.insert(config.volunteer_field_id.as_str(), code),
            None => warn!("Unknown volunteer level '{}', leaving it out of BSD payload", level),
        }
    }

    if let Some(note) = present(&contact.note) {
        payload.insert(config.note_field_id.as_str(), note);
    }

    payload
}

/// Sends the contact to the configured BSD form. Must succeed before the
/// signup is persisted.
pub async fn sync_contact<F>(
    crm: &F,
    config: &ContactConfig,
    contact: &NormalizedContact,
    recruiter_email: &str,
) -> Result<(), CrmError>
where
    F: FormSubmitter + ?Sized,
{
    let payload = build_contact_payload(contact, recruiter_email, config);
    crm.submit_form(&config.form_slug, &payload).await?;
    info!("Synced contact to BSD form {}", config.form_slug);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ContactConfig {
        ContactConfig {
            friend_field_id: "custom-friend".to_string(),
            support_field_id: "custom-support".to_string(),
            volunteer_field_id: "custom-volunteer".to_string(),
            note_field_id: "custom-note".to_string(),
            form_slug: "contact-form".to_string(),
        }
    }

    #[test]
    fn test_payload_maps_fields_and_friend() {
        let contact = NormalizedContact {
            email: Some("a@b.com".to_string()),
            first_name: Some("A".to_string()),
            last_name: Some("B".to_string()),
            support_level: Some("strong".to_string()),
            ..Default::default()
        };

        let payload = build_contact_payload(&contact, "r@x.com", &config());

        assert_eq!(payload.get("email"), Some("a@b.com"));
        assert_eq!(payload.get("firstname"), Some("A"));
        assert_eq!(payload.get("lastname"), Some("B"));
        assert_eq!(payload.get("custom-friend"), Some("r@x.com"));
        assert_eq!(payload.get("custom-support"), Some("1"));
        assert!(!payload.contains("phone"));
        assert!(!payload.contains("zip"));
        assert!(!payload.contains("custom-volunteer"));
        assert!(!payload.contains("custom-note"));
    }

    #[test]
    fn test_payload_sends_empty_email_when_missing() {
        let payload = build_contact_payload(&NormalizedContact::default(), "r@x.com", &config());

        assert_eq!(payload.get("email"), Some(""));
        assert_eq!(payload.len(), 2);
    }

    #[test]
    fn test_payload_volunteer_and_note() {
        let contact = NormalizedContact {
            volunteer_level: Some("maybe".to_string()),
            note: Some("Met at the farmers market".to_string()),
            ..Default::default()
        };

        let payload = build_contact_payload(&contact, "r@x.com", &config());
        assert_eq!(payload.get("custom-volunteer"), Some("2"));
        assert_eq!(payload.get("custom-note"), Some("Met at the farmers market"));
    }

    #[test]
    fn test_unknown_levels_are_omitted() {
        let contact = NormalizedContact {
            support_level: Some("ecstatic".to_string()),
            volunteer_level: Some("sometimes".to_string()),
            ..Default::default()
        };

        let payload = build_contact_payload(&contact, "r@x.com", &config());
        assert!(!payload.contains("custom-support"));
        assert!(!payload.contains("custom-volunteer"));
    }

    #[test]
    fn test_level_tables() {
        assert_eq!(support_code("against"), Some("5"));
        assert_eq!(volunteer_code("no"), Some("4"));
        assert_eq!(support_code("Strong"), None);
    }
}
