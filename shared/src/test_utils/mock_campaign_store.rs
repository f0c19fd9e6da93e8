use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::models::Campaign;
use crate::store::{CampaignStore, StoreError};

#[derive(Default)]
pub struct MockCampaignStore {
    campaigns: Mutex<HashMap<String, Campaign>>,
}

impl MockCampaignStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_campaign(id: &str, code: &str) -> Self {
        let store = Self::new();
        store.add_campaign(Campaign {
            id: id.to_string(),
            code: code.to_string(),
            name: None,
        });
        store
    }

    pub fn add_campaign(&self, campaign: Campaign) {
        self.campaigns
            .lock()
            .unwrap()
            .insert(campaign.code.clone(), campaign);
    }
}

#[async_trait]
impl CampaignStore for MockCampaignStore {
    async fn get_campaign_by_code(&self, code: &str) -> Result<Campaign, StoreError> {
        self.campaigns
            .lock()
            .unwrap()
            .get(code)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("Campaign {} not found", code)))
    }
}
