use std::env;

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};

/// JWT claims issued by the session service
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub exp: usize,
}

/// The authenticated user, inserted into request extensions by `auth_middleware`
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
        }
    }
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

/// Verifies a bearer token and returns the user it was issued to
pub fn verify_token(token: &str, secret: &str) -> Result<AuthUser, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims.into())
}

/// Rejects requests without a valid `Authorization: Bearer` token
pub async fn auth_middleware(mut req: Request, next: Next) -> Response {
    let secret = match env::var("JWT_SECRET") {
        Ok(secret) if !secret.is_empty() => secret,
        _ => {
            error!("JWT_SECRET is not configured");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Authentication is not configured" })),
            )
                .into_response();
        }
    };

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string);

    let Some(token) = token else {
        warn!("Missing bearer token for {} {}", req.method(), req.uri());
        return unauthorized("Missing authorization token");
    };

    match verify_token(&token, &secret) {
        Ok(user) => {
            debug!("Authenticated user {}", user.id);
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(e) => {
            warn!("Rejected token: {}", e);
            unauthorized("Invalid authorization token")
        }
    }
}

/// Secret used by `create_test_request` when `JWT_SECRET` is unset
#[cfg(any(test, feature = "test_utils"))]
pub const TEST_JWT_SECRET: &str = "test-jwt-secret";

/// Builds a request carrying a signed bearer token for the given user
#[cfg(any(test, feature = "test_utils"))]
pub fn create_test_request_with_email(
    method: &str,
    uri: &str,
    user_id: &str,
    email: &str,
    body: Option<serde_json::Value>,
) -> axum::http::Request<axum::body::Body> {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let secret = env::var("JWT_SECRET").unwrap_or_else(|_| TEST_JWT_SECRET.to_string());
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to sign test token");

    let builder = axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token));

    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(json.to_string()))
            .expect("failed to build test request"),
        None => builder
            .body(axum::body::Body::empty())
            .expect("failed to build test request"),
    }
}

/// Builds a request for `user_id`, whose email is `<user_id>@example.com`
#[cfg(any(test, feature = "test_utils"))]
pub fn create_test_request(
    method: &str,
    uri: &str,
    user_id: &str,
    body: Option<serde_json::Value>,
) -> axum::http::Request<axum::body::Body> {
    let email = format!("{}@example.com", user_id);
    create_test_request_with_email(method, uri, user_id, &email, body)
}
