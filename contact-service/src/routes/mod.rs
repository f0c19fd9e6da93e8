use axum::{extract::Request, middleware, routing::post, Router};
use log::{info, warn};
use recruit_shared::auth::auth_middleware;
use recruit_shared::bsd::{BsdClient, FormSubmitter};
use recruit_shared::store::dynamo::{DynamoCampaignStore, DynamoSignupStore};
use recruit_shared::store::{CampaignStore, SignupStore};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::{ConfigError, ContactConfig, ServiceConfig};
use crate::handlers::contact_handlers::record_contact;
use crate::state::AppState;

/// Creates a router backed by DynamoDB and the BSD API
pub async fn create_router(service: &ServiceConfig) -> Result<Router, ConfigError> {
    info!("Creating router with DynamoDB stores");

    let config = ContactConfig::from_env()?;
    let signups = Arc::new(DynamoSignupStore::new().await);
    let campaigns = Arc::new(DynamoCampaignStore::new().await);
    let crm = Arc::new(BsdClient::new(service.bsd_base_url.clone()));

    info!("Using API route prefix: {}", service.route_prefix);

    let state = AppState::new(signups, campaigns, crm, config);
    Ok(create_router_with_state(Arc::new(state), &service.route_prefix))
}

/// Creates a router with the given collaborators
pub fn create_router_with_state<S, C, F>(state: Arc<AppState<S, C, F>>, prefix: &str) -> Router
where
    S: SignupStore,
    C: CampaignStore,
    F: FormSubmitter,
{
    info!("Setting up API routes with prefix: '{}'", prefix);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Logging middleware to trace all requests
    async fn logging_middleware(
        req: Request,
        next: axum::middleware::Next,
    ) -> impl axum::response::IntoResponse {
        info!(
            "Router received request: method={}, uri={}",
            req.method(),
            req.uri()
        );
        next.run(req).await
    }

    let api_routes = Router::new()
        .route("/campaigns/:code/contact", post(record_contact::<S, C, F>))
        .layer(middleware::from_fn(auth_middleware))
        .with_state(state);

    let router = if prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(prefix, api_routes)
    };

    router
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware))
        .fallback(|req: Request| async move {
            warn!("No route matched for: {} {}", req.method(), req.uri());
            (
                axum::http::StatusCode::NOT_FOUND,
                "The requested resource was not found".to_string(),
            )
        })
}
