use log::info;
use rand::{rngs::OsRng, RngCore};
use recruit_shared::models::PLACEHOLDER_EMAIL_PREFIX;
use thiserror::Error;

const TOKEN_BYTES: usize = 24;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Failed to generate random token: {0}")]
    RandomSource(String),
}

/// Hex-encoded token read from the OS CSPRNG
pub fn random_token() -> Result<String, IdentityError> {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| IdentityError::RandomSource(e.to_string()))?;
    Ok(hex::encode(bytes))
}

/// Returns the submitted email, or a fresh `missing::<token>` placeholder
/// when none was supplied. Placeholders are unique per submission.
pub fn resolve_email(email: Option<String>) -> Result<String, IdentityError> {
    resolve_email_with(email, random_token)
}

pub fn resolve_email_with<F>(email: Option<String>, generate: F) -> Result<String, IdentityError>
where
    F: FnOnce() -> Result<String, IdentityError>,
{
    match email {
        Some(email) if !email.is_empty() => Ok(email),
        _ => {
            let placeholder = format!("{}{}", PLACEHOLDER_EMAIL_PREFIX, generate()?);
            info!("No email supplied, using placeholder identity");
            Ok(placeholder)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_email_is_kept() {
        assert_eq!(
            resolve_email(Some("a@b.com".to_string())).unwrap(),
            "a@b.com"
        );
    }

    #[test]
    fn test_missing_email_gets_unique_placeholder() {
        let first = resolve_email(None).unwrap();
        let second = resolve_email(Some(String::new())).unwrap();

        for placeholder in [&first, &second] {
            let token = placeholder.strip_prefix(PLACEHOLDER_EMAIL_PREFIX).unwrap();
            assert_eq!(token.len(), TOKEN_BYTES * 2);
            assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        }
        assert_ne!(first, second);
    }

    #[test]
    fn test_generator_failure_is_fatal() {
        let result = resolve_email_with(None, || {
            Err(IdentityError::RandomSource("entropy unavailable".to_string()))
        });
        assert!(matches!(result, Err(IdentityError::RandomSource(_))));
    }

    #[test]
    fn test_generator_not_called_for_real_email() {
        let result = resolve_email_with(Some("a@b.com".to_string()), || {
            panic!("generator must not run")
        });
        assert_eq!(result.unwrap(), "a@b.com");
    }
}
