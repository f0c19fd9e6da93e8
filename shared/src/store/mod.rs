use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Campaign, SignupRecord};

pub mod dynamo;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Storage for contact signups
#[async_trait]
pub trait SignupStore: Send + Sync + 'static {
    /// Inserts the record, or replaces the one already stored under the same
    /// (email, recruitedBy, campaign) key, in a single storage operation.
    async fn upsert_signup(&self, record: SignupRecord) -> Result<SignupRecord, StoreError>;

    async fn get_signup(
        &self,
        email: &str,
        recruited_by: &str,
        campaign: &str,
    ) -> Result<SignupRecord, StoreError>;
}

/// Read-only campaign lookup
#[async_trait]
pub trait CampaignStore: Send + Sync + 'static {
    async fn get_campaign_by_code(&self, code: &str) -> Result<Campaign, StoreError>;
}
