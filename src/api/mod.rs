// src/api/mod.rs

pub mod auth;
pub mod challenge;
pub mod health;
pub mod leaderboard;
pub mod share;
pub mod transactions;
pub mod webhook;

use axum::http::{header::AUTHORIZATION, HeaderMap};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::{NotificationService, SponsoredTransactionService, UsageLimiter};
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub limiter: UsageLimiter,
    pub sponsor: SponsoredTransactionService,
    pub notifications: NotificationService,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let limiter = UsageLimiter::from_config(&config);
        Self {
            store: Store::new(),
            sponsor: SponsoredTransactionService::new(limiter.clone()),
            notifications: NotificationService::new(config.clone()),
            limiter,
            config,
        }
    }
}

/// Extracts and verifies the bearer token, returning the caller's fid.
pub fn require_fid(headers: &HeaderMap, state: &AppState) -> Result<auth::Claims> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::AuthError("Missing Authorization header".to_string()))?;
    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::AuthError("Invalid Authorization header".to_string()))?;
    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::AuthError("Invalid Authorization scheme".to_string()))?;

    auth::verify_token(token, &state.config.jwt_secret, &state.config.app_domain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    #[test]
    fn require_fid_rejects_missing_header() {
        let state = AppState::new(test_config());
        let headers = HeaderMap::new();
        assert!(require_fid(&headers, &state).is_err());
    }

    #[test]
    fn require_fid_rejects_non_bearer_scheme() {
        let state = AppState::new(test_config());
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Basic abc".parse().unwrap());
        assert!(require_fid(&headers, &state).is_err());
    }
}
