use std::collections::HashMap;
use std::env;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use log::{debug, error, info};

use super::{CampaignStore, SignupStore, StoreError};
use crate::models::{signup_key, Campaign, SignupRecord};

pub const SIGNUP_KEY_ATTRIBUTE: &str = "signupKey";
pub const CAMPAIGN_KEY_ATTRIBUTE: &str = "code";

const DEFAULT_SIGNUPS_TABLE: &str = "signups";
const DEFAULT_CAMPAIGNS_TABLE: &str = "campaigns";

/// Builds a DynamoDB client from the ambient AWS configuration.
///
/// `DYNAMODB_ENDPOINT` overrides the endpoint, which is how local runs
/// point at DynamoDB Local.
pub async fn create_client() -> Client {
    let config = aws_config::load_from_env().await;

    match env::var("DYNAMODB_ENDPOINT") {
        Ok(endpoint) if !endpoint.is_empty() => {
            info!("Using DynamoDB endpoint override: {}", endpoint);
            let dynamo_config = aws_sdk_dynamodb::config::Builder::from(&config)
                .endpoint_url(endpoint)
                .build();
            Client::from_conf(dynamo_config)
        }
        _ => Client::new(&config),
    }
}

/// DynamoDB implementation of SignupStore
#[derive(Clone)]
pub struct DynamoSignupStore {
    client: Client,
    table_name: String,
}

impl DynamoSignupStore {
    pub async fn new() -> Self {
        let table_name =
            env::var("SIGNUPS_TABLE").unwrap_or_else(|_| DEFAULT_SIGNUPS_TABLE.to_string());
        info!("Using signups table: {}", table_name);
        Self::with_client_and_table(create_client().await, table_name)
    }

    pub fn with_client_and_table(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }
}

#[async_trait]
impl SignupStore for DynamoSignupStore {
    async fn upsert_signup(&self, record: SignupRecord) -> Result<SignupRecord, StoreError> {
        let item: HashMap<String, AttributeValue> = serde_dynamo::to_item(&record)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        debug!(
            "Putting signup item {} into table {}",
            record.signup_key, self.table_name
        );

        // PutItem replaces any item under the same key, so the write is an
        // atomic insert-or-replace on the composite key.
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| {
                error!("Failed to put signup {}: {:?}", record.signup_key, e);
                StoreError::Database(e.to_string())
            })?;

        Ok(record)
    }

    async fn get_signup(
        &self,
        email: &str,
        recruited_by: &str,
        campaign: &str,
    ) -> Result<SignupRecord, StoreError> {
        let key = signup_key(email, recruited_by, campaign);

        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(SIGNUP_KEY_ATTRIBUTE, AttributeValue::S(key.clone()))
            .send()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let item = output
            .item
            .ok_or_else(|| StoreError::NotFound(format!("Signup {} not found", key)))?;

        serde_dynamo::from_item(item).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

/// DynamoDB implementation of CampaignStore, keyed by campaign code
#[derive(Clone)]
pub struct DynamoCampaignStore {
    client: Client,
    table_name: String,
}

impl DynamoCampaignStore {
    pub async fn new() -> Self {
        let table_name =
            env::var("CAMPAIGNS_TABLE").unwrap_or_else(|_| DEFAULT_CAMPAIGNS_TABLE.to_string());
        info!("Using campaigns table: {}", table_name);
        Self::with_client_and_table(create_client().await, table_name)
    }

    pub fn with_client_and_table(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }
}

#[async_trait]
impl CampaignStore for DynamoCampaignStore {
    async fn get_campaign_by_code(&self, code: &str) -> Result<Campaign, StoreError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(CAMPAIGN_KEY_ATTRIBUTE, AttributeValue::S(code.to_string()))
            .send()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let item = output
            .item
            .ok_or_else(|| StoreError::NotFound(format!("Campaign {} not found", code)))?;

        serde_dynamo::from_item(item).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}
