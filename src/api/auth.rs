use axum::{extract::State, http::HeaderMap, Json};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    models::ApiResponse,
};

use super::{require_fid, AppState};

/// Quick-auth style session token claims: the Farcaster fid travels in
/// `sub` and the mini app's deployment domain in `aud`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: u64, // fid
    pub iat: usize,
    pub exp: usize,
    pub aud: String, // app domain
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatus {
    pub fid: u64,
    pub authenticated: bool,
    pub iat: usize,
    pub exp: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// GET /api/v1/auth
/// Returns the authenticated user's fid.
pub async fn verify(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<AuthStatus>>> {
    let claims = require_fid(&headers, &state)?;

    Ok(Json(ApiResponse::success(AuthStatus {
        fid: claims.sub,
        authenticated: true,
        iat: claims.iat,
        exp: claims.exp,
        message: None,
    })))
}

/// POST /api/v1/auth
pub async fn confirm(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<AuthStatus>>> {
    let claims = require_fid(&headers, &state)?;

    Ok(Json(ApiResponse::success(AuthStatus {
        fid: claims.sub,
        authenticated: true,
        iat: claims.iat,
        exp: claims.exp,
        message: Some("Authentication successful".to_string()),
    })))
}

pub fn verify_token(token: &str, secret: &str, domain: &str) -> Result<Claims> {
    let mut validation = Validation::default();
    validation.set_audience(&[domain]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| AppError::InvalidToken)?;

    Ok(token_data.claims)
}
