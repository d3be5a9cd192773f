// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! Development-only token issuance.
//!
//! The platform's real login flow lives in the web frontend, which calls the
//! codec's issue side after its own credential exchange. For development and
//! integration testing this endpoint issues a token for any seeded user.
//! Production environments refuse it outright.

use axum::{extract::State, Json};
use chrono::Duration;

use crate::auth::IdentityAssertion;
use crate::error::ApiError;
use crate::models::{DevLoginRequest, SessionResponse};
use crate::state::AppState;

/// Session token lifetime for dev logins.
const DEV_SESSION_TTL_HOURS: i64 = 24;

#[utoipa::path(
    post,
    path = "/api/auth/dev-login",
    request_body = DevLoginRequest,
    tag = "Session",
    responses(
        (status = 200, body = SessionResponse),
        (status = 404, description = "Unavailable in production")
    )
)]
pub async fn dev_login(
    State(state): State<AppState>,
    Json(request): Json<DevLoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    if state.config.environment.is_production() {
        return Err(ApiError::not_found("Not Found"));
    }

    let store = state.store.read().await;
    let user = store
        .user_by_email(&request.email)
        .ok_or_else(|| ApiError::not_found("Unknown user"))?;
    drop(store);

    let identity = IdentityAssertion::new(user.id, user.email, user.role);
    let token = state
        .codec
        .issue(&identity, Duration::hours(DEV_SESSION_TTL_HOURS))
        .map_err(|_| ApiError::internal())?;

    Ok(Json(SessionResponse { token }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dev_login_issues_verifiable_token() {
        let state = crate::state::test_support::state();
        let Json(session) = dev_login(
            State(state.clone()),
            Json(DevLoginRequest {
                email: "manager.one@propgate.example".to_string(),
            }),
        )
        .await
        .unwrap();

        let identity = state.codec.verify(&session.token).unwrap();
        assert_eq!(identity.subject_id, "M1");
    }

    #[tokio::test]
    async fn dev_login_rejects_unknown_user() {
        let state = crate::state::test_support::state();
        let result = dev_login(
            State(state),
            Json(DevLoginRequest {
                email: "nobody@propgate.example".to_string(),
            }),
        )
        .await;
        assert!(result.is_err());
    }
}
