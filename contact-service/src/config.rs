use std::env;

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// BSD field and form identifiers used when syncing a contact.
///
/// These are opaque ids assigned by BSD; all of them must be set for the
/// deployment to work, so loading fails at startup when any is missing.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactConfig {
    pub friend_field_id: String,
    pub support_field_id: String,
    pub volunteer_field_id: String,
    pub note_field_id: String,
    pub form_slug: String,
}

impl ContactConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        Ok(Self {
            friend_field_id: required("BSD_CONTACT_FRIEND_ID")?,
            support_field_id: required("BSD_CONTACT_SUPPORT_ID")?,
            volunteer_field_id: required("BSD_CONTACT_VOLUNTEER_ID")?,
            note_field_id: required("BSD_CONTACT_NOTE_ID")?,
            form_slug: required("BSD_CONTACT_FORM_SLUG")?,
        })
    }
}

/// Process-level settings for the binary
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub bsd_base_url: String,
    pub route_prefix: String,
    pub port: u16,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bsd_base_url = lookup("BSD_API_BASE_URL")
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing("BSD_API_BASE_URL"))?;

        // Under API Gateway the stage name is part of the path
        let remove_base_path = lookup("REMOVE_BASE_PATH")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);
        let route_prefix = if remove_base_path { "" } else { "/Prod" }.to_string();

        let port = match lookup("PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: value.clone(),
            })?,
            None => 3000,
        };

        Ok(Self {
            bsd_base_url,
            route_prefix,
            port,
        })
    }
}
