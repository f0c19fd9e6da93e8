use std::env;

use aws_sdk_dynamodb::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType,
};
use aws_sdk_dynamodb::Client;
use log::debug;

use crate::models::SignupRecord;
use crate::store::dynamo::SIGNUP_KEY_ATTRIBUTE;

type TestResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// True when tests should run against DynamoDB Local instead of mocks
pub fn use_dynamodb() -> bool {
    env::var("USE_DYNAMODB")
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(false)
}

/// Client for DynamoDB Local (`DYNAMODB_ENDPOINT`, default http://localhost:8000)
pub async fn create_dynamo_client() -> Client {
    let endpoint =
        env::var("DYNAMODB_ENDPOINT").unwrap_or_else(|_| "http://localhost:8000".to_string());
    debug!("Connecting to DynamoDB Local at {}", endpoint);

    let config = aws_sdk_dynamodb::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(Credentials::new("test", "test", None, None, "test"))
        .endpoint_url(endpoint)
        .build();

    Client::from_conf(config)
}

pub async fn create_signup_table(client: &Client, table_name: &str) -> TestResult {
    client
        .create_table()
        .table_name(table_name)
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(SIGNUP_KEY_ATTRIBUTE)
                .attribute_type(ScalarAttributeType::S)
                .build()?,
        )
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(SIGNUP_KEY_ATTRIBUTE)
                .key_type(KeyType::Hash)
                .build()?,
        )
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await
        .map_err(aws_sdk_dynamodb::Error::from)?;
    Ok(())
}

/// Deletes every item in a signups table
pub async fn clear_dynamo_table(client: &Client, table_name: &str) -> TestResult {
    let output = client
        .scan()
        .table_name(table_name)
        .send()
        .await
        .map_err(aws_sdk_dynamodb::Error::from)?;

    for item in output.items.unwrap_or_default() {
        if let Some(key) = item.get(SIGNUP_KEY_ATTRIBUTE) {
            client
                .delete_item()
                .table_name(table_name)
                .key(SIGNUP_KEY_ATTRIBUTE, key.clone())
                .send()
                .await
                .map_err(aws_sdk_dynamodb::Error::from)?;
        }
    }

    Ok(())
}

/// Reads every signup in the table
pub async fn scan_signups(
    client: &Client,
    table_name: &str,
) -> Result<Vec<SignupRecord>, Box<dyn std::error::Error + Send + Sync>> {
    let output = client
        .scan()
        .table_name(table_name)
        .send()
        .await
        .map_err(aws_sdk_dynamodb::Error::from)?;

    let signups = serde_dynamo::from_items(output.items.unwrap_or_default())?;
    Ok(signups)
}
