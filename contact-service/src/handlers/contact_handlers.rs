use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use log::{info, warn};
use recruit_shared::auth::AuthUser;
use recruit_shared::bsd::FormSubmitter;
use recruit_shared::models::{now_millis, signup_key, SignupRecord, CONTACT_SIGNUP_TYPE};
use recruit_shared::store::{CampaignStore, SignupStore};

use crate::error::Result;
use crate::identity::resolve_email;
use crate::models::ContactRequest;
use crate::state::AppState;
use crate::sync::sync_contact;
use crate::validation::{validate_contact, NormalizedContact};

fn build_signup_record(
    contact: NormalizedContact,
    email: String,
    recruited_by: &str,
    campaign: &str,
) -> SignupRecord {
    SignupRecord {
        signup_key: signup_key(&email, recruited_by, campaign),
        email,
        recruited_by: recruited_by.to_string(),
        campaign: campaign.to_string(),
        signup_type: CONTACT_SIGNUP_TYPE.to_string(),
        last_updated_at: now_millis(),
        first_name: contact.first_name,
        last_name: contact.last_name,
        phone: contact.phone,
        zip: contact.zip,
        support_level: contact.support_level,
        volunteer_level: contact.volunteer_level,
        note: contact.note,
    }
}

// POST /campaigns/:code/contact
// Validate, sync to BSD, then upsert the signup. A failed BSD sync means
// nothing is written locally.
pub async fn record_contact<S, C, F>(
    State(state): State<Arc<AppState<S, C, F>>>,
    Path(code): Path<String>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ContactRequest>,
) -> Result<Json<serde_json::Value>>
where
    S: SignupStore,
    C: CampaignStore,
    F: FormSubmitter,
{
    let campaign = state.campaigns.get_campaign_by_code(&code).await?;

    let contact = validate_contact(payload).map_err(|e| {
        warn!(
            "Rejected contact from recruiter {} for campaign {}: {}",
            user.id, campaign.id, e
        );
        e
    })?;

    sync_contact(&*state.crm, &state.config, &contact, &user.email).await?;

    let email = resolve_email(contact.email.clone())?;
    let record = build_signup_record(contact, email, &user.id, &campaign.id);

    let saved = state.signups.upsert_signup(record).await?;

    info!(
        "Recorded contact {} for recruiter {} in campaign {}",
        saved.signup_key, user.id, campaign.id
    );

    Ok(Json(serde_json::json!({ "ok": true })))
}
