use std::sync::Arc;

use recruit_shared::bsd::FormSubmitter;
use recruit_shared::store::{CampaignStore, SignupStore};

use crate::config::ContactConfig;

/// Collaborators shared by every request
pub struct AppState<S, C, F> {
    pub signups: Arc<S>,
    pub campaigns: Arc<C>,
    pub crm: Arc<F>,
    pub config: ContactConfig,
}

impl<S, C, F> AppState<S, C, F>
where
    S: SignupStore,
    C: CampaignStore,
    F: FormSubmitter,
{
    pub fn new(signups: Arc<S>, campaigns: Arc<C>, crm: Arc<F>, config: ContactConfig) -> Self {
        Self {
            signups,
            campaigns,
            crm,
            config,
        }
    }
}
