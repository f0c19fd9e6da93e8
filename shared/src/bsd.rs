use std::collections::BTreeMap;

use async_trait::async_trait;
use log::{error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrmError {
    #[error("Failed to reach BSD: {0}")]
    Request(String),

    #[error("BSD returned error status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("BSD rejected the submission: {0}")]
    Rejected(String),

    #[error("Failed to parse BSD response: {0}")]
    Parse(String),
}

/// Form fields sent to a BSD signup form, keyed by BSD field id.
///
/// Only fields that were actually supplied are inserted, so absent values
/// are omitted from the form body rather than sent empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExternalPayload(BTreeMap<String, String>);

impl ExternalPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn insert_opt(&mut self, field: impl Into<String>, value: Option<&str>) {
        if let Some(value) = value {
            self.insert(field, value);
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Submits a payload to a signup form in the external CRM
#[async_trait]
pub trait FormSubmitter: Send + Sync + 'static {
    async fn submit_form(&self, form_slug: &str, payload: &ExternalPayload) -> Result<(), CrmError>;
}

#[derive(Debug, Deserialize)]
struct BsdSignupResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

/// Client for the BSD signup API (`/page/sapi/<form slug>`)
#[derive(Clone)]
pub struct BsdClient {
    http: Client,
    base_url: String,
}

impl BsdClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn form_url(&self, form_slug: &str) -> String {
        format!("{}/page/sapi/{}", self.base_url, form_slug)
    }
}

#[async_trait]
impl FormSubmitter for BsdClient {
    async fn submit_form(&self, form_slug: &str, payload: &ExternalPayload) -> Result<(), CrmError> {
        info!(
            "Submitting {} fields to BSD form {}",
            payload.len(),
            form_slug
        );

        let response = self
            .http
            .post(self.form_url(form_slug))
            .header("Accept", "application/json")
            .form(payload)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to submit BSD form {}: {}", form_slug, e);
                CrmError::Request(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                "BSD form {} returned error status {}: {}",
                form_slug, status, body
            );
            return Err(CrmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let signup: BsdSignupResponse = response.json().await.map_err(|e| {
            error!("Failed to parse BSD response for form {}: {}", form_slug, e);
            CrmError::Parse(e.to_string())
        })?;

        if signup.status != "success" {
            let reason = signup.message.unwrap_or(signup.status);
            error!("BSD form {} rejected submission: {}", form_slug, reason);
            return Err(CrmError::Rejected(reason));
        }

        info!("BSD form {} accepted submission", form_slug);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn sample_payload() -> ExternalPayload {
        let mut payload = ExternalPayload::new();
        payload.insert("email", "a@b.com");
        payload.insert("firstname", "A");
        payload.insert("custom-friend", "r@x.com");
        payload
    }

    #[test]
    fn test_insert_opt_skips_absent_values() {
        let mut payload = ExternalPayload::new();
        payload.insert_opt("phone", None);
        payload.insert_opt("zip", Some("02134"));

        assert!(!payload.contains("phone"));
        assert_eq!(payload.get("zip"), Some("02134"));
        assert_eq!(payload.len(), 1);
    }

    #[tokio::test]
    async fn test_submit_form_posts_urlencoded_fields() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/page/sapi/contact-form")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("email".into(), "a@b.com".into()),
                Matcher::UrlEncoded("firstname".into(), "A".into()),
                Matcher::UrlEncoded("custom-friend".into(), "r@x.com".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":"success"}"#)
            .create_async()
            .await;

        let client = BsdClient::new(server.url());
        let result = client.submit_form("contact-form", &sample_payload()).await;

        assert!(result.is_ok(), "expected success, got {:?}", result);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_submit_form_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/page/sapi/contact-form")
            .with_status(503)
            .with_body("unavailable")
            .create_async()
            .await;

        let client = BsdClient::new(format!("{}/", server.url()));
        let result = client.submit_form("contact-form", &sample_payload()).await;

        match result {
            Err(CrmError::Status { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "unavailable");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_submit_form_rejected_by_bsd() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/page/sapi/contact-form")
            .with_status(200)
            .with_body(r#"{"status":"fail","message":"invalid form"}"#)
            .create_async()
            .await;

        let client = BsdClient::new(server.url());
        let result = client.submit_form("contact-form", &sample_payload()).await;

        assert!(matches!(result, Err(CrmError::Rejected(ref m)) if m == "invalid form"));
    }

    #[tokio::test]
    async fn test_submit_form_unparseable_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/page/sapi/contact-form")
            .with_status(200)
            .with_body("<html>ok</html>")
            .create_async()
            .await;

        let client = BsdClient::new(server.url());
        let result = client.submit_form("contact-form", &sample_payload()).await;

        assert!(matches!(result, Err(CrmError::Parse(_))));
    }
}
