// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! Administrative operations.

use axum::{extract::State, http::StatusCode};
use chrono::Utc;
use serde_json::json;

use crate::audit::{AuditEntry, PaymentKind, PaymentRecord, PaymentStatus};
use crate::auth::Auth;
use crate::error::ApiError;
use crate::state::AppState;

/// Demo payment created alongside the seeded records so the payment flow
/// is exercisable immediately after a seed.
const SEED_PAYMENT_ID: &str = "pay_1";

#[utoipa::path(
    post,
    path = "/api/admin/seed",
    tag = "Admin",
    responses(
        (status = 204, description = "Demo data loaded"),
        (status = 403, description = "Not an admin, or production without opt-in")
    )
)]
pub async fn seed(
    Auth(identity): Auth,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    if !identity.is_admin() {
        return Err(ApiError::forbidden());
    }
    // Seeding wipes records. Production refuses unless explicitly opted in.
    if state.config.environment.is_production() && !state.config.allow_production_seed {
        return Err(ApiError::forbidden());
    }

    {
        let mut store = state.store.write().await;
        store.seed();
    }

    if state
        .ledger
        .get_payment(SEED_PAYMENT_ID)
        .map_err(|e| {
            tracing::error!(event = "admin.seed_failed", error = %e, "ledger seed check failed");
            ApiError::internal()
        })?
        .is_none()
    {
        let now = Utc::now();
        state
            .ledger
            .insert_payment(&PaymentRecord {
                id: SEED_PAYMENT_ID.to_string(),
                contract_id: "contract_1".to_string(),
                kind: PaymentKind::Payment,
                amount_cents: 90_000,
                status: PaymentStatus::Pending,
                created_at: now,
                updated_at: now,
            })
            .map_err(|e| {
                tracing::error!(event = "admin.seed_failed", error = %e, "ledger seed failed");
                ApiError::internal()
            })?;
    }

    state.audit.record(
        AuditEntry::new("seed.executed", "system")
            .with_actor(&identity)
            .with_details(json!({"environment": state.config.environment.to_string()})),
    );

    Ok(StatusCode::NO_CONTENT)
}
