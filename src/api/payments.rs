// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! Payment status transitions and the compliance view of their ledger.
//!
//! The transition handler is the one place monetary state changes: the
//! status update and its financial audit entry are committed by the same
//! redb transaction inside [`LedgerDb::transition_payment`], so a crash can
//! never leave one without the other.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::audit::{FinancialAuditEntry, LedgerError};
use crate::auth::{rbac, Auth, Role};
use crate::correlation::CorrelationId;
use crate::error::ApiError;
use crate::models::TransitionPaymentRequest;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/payments/{payment_id}/status",
    params(("payment_id" = String, Path, description = "Payment to transition")),
    request_body = TransitionPaymentRequest,
    tag = "Payments",
    responses(
        (status = 200, body = FinancialAuditEntry),
        (status = 403, description = "Caller may not manage this payment"),
        (status = 404, description = "Unknown payment"),
        (status = 422, description = "Illegal status transition")
    )
)]
pub async fn transition_payment(
    Path(payment_id): Path<String>,
    correlation_id: CorrelationId,
    Auth(identity): Auth,
    State(state): State<AppState>,
    Json(request): Json<TransitionPaymentRequest>,
) -> Result<Json<FinancialAuditEntry>, ApiError> {
    let payment = state
        .ledger
        .get_payment(&payment_id)
        .map_err(|e| internal(e, &correlation_id))?
        .ok_or_else(|| ApiError::not_found("Payment not found"))?;

    // Money moves under the property manager's authority (or an admin's).
    let scope = {
        let store = state.store.read().await;
        store
            .contract_scope(&payment.contract_id)
            .ok_or_else(|| ApiError::not_found("Payment contract not found"))?
    };
    if !rbac::can_manage_property(&identity, &scope.property_manager_id) {
        return Err(ApiError::forbidden());
    }

    let entry = state
        .ledger
        .transition_payment(
            &payment_id,
            request.to_status,
            Some(&identity.subject_id),
            Some(correlation_id.as_str()),
            request.metadata,
        )
        .map_err(|e| match e {
            LedgerError::PaymentNotFound(_) => ApiError::not_found("Payment not found"),
            LedgerError::InvalidTransition { from, to } => {
                ApiError::unprocessable(format!("Cannot transition payment from {from} to {to}"))
            }
            other => internal(other, &correlation_id),
        })?;

    Ok(Json(entry))
}

#[utoipa::path(
    get,
    path = "/api/payments/{payment_id}/ledger",
    params(("payment_id" = String, Path, description = "Payment whose trail to read")),
    tag = "Payments",
    responses(
        (status = 200, body = [FinancialAuditEntry]),
        (status = 403, description = "Admins only")
    )
)]
pub async fn payment_ledger(
    Path(payment_id): Path<String>,
    correlation_id: CorrelationId,
    Auth(identity): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<FinancialAuditEntry>>, ApiError> {
    if !rbac::has_any_role(Some(&identity), &[Role::Admin]) {
        return Err(ApiError::forbidden());
    }

    let entries = state
        .ledger
        .entries_for_entity(&payment_id)
        .map_err(|e| internal(e, &correlation_id))?;
    Ok(Json(entries))
}

/// Log the cause with its correlation id; hand the client a generic 500.
fn internal(error: LedgerError, correlation_id: &CorrelationId) -> ApiError {
    tracing::error!(
        event = "payments.ledger_error",
        correlation_id = %correlation_id,
        error = %error,
        "ledger operation failed"
    );
    ApiError::internal()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{PaymentKind, PaymentRecord, PaymentStatus};
    use crate::auth::IdentityAssertion;
    use axum::http::StatusCode;
    use chrono::Utc;

    fn identity(id: &str, role: Role) -> IdentityAssertion {
        IdentityAssertion::new(id, format!("{id}@propgate.example"), role)
    }

    fn seed_payment(state: &AppState, id: &str) {
        let now = Utc::now();
        state
            .ledger
            .insert_payment(&PaymentRecord {
                id: id.to_string(),
                contract_id: "contract_1".to_string(),
                kind: PaymentKind::Payment,
                amount_cents: 90_000,
                status: PaymentStatus::Pending,
                created_at: now,
                updated_at: now,
            })
            .unwrap();
    }

    #[tokio::test]
    async fn manager_completes_payment_with_ledger_entry() {
        let state = crate::state::test_support::state();
        seed_payment(&state, "pay_1");

        let Json(entry) = transition_payment(
            Path("pay_1".to_string()),
            CorrelationId::generate(),
            Auth(identity("M1", Role::Manager)),
            State(state.clone()),
            Json(TransitionPaymentRequest {
                to_status: PaymentStatus::Completed,
                metadata: Some(serde_json::json!({"method": "sepa"})),
            }),
        )
        .await
        .unwrap();

        assert_eq!(entry.from_status, Some(PaymentStatus::Pending));
        assert_eq!(entry.to_status, PaymentStatus::Completed);
        assert_eq!(entry.actor_id.as_deref(), Some("M1"));
        assert!(entry.correlation_id.is_some());
    }

    #[tokio::test]
    async fn foreign_manager_is_forbidden() {
        let state = crate::state::test_support::state();
        seed_payment(&state, "pay_1");

        let result = transition_payment(
            Path("pay_1".to_string()),
            CorrelationId::generate(),
            Auth(identity("M2", Role::Manager)),
            State(state),
            Json(TransitionPaymentRequest {
                to_status: PaymentStatus::Completed,
                metadata: None,
            }),
        )
        .await;
        let err = result.err().expect("must be rejected");
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn tenant_cannot_move_money() {
        let state = crate::state::test_support::state();
        seed_payment(&state, "pay_1");

        let result = transition_payment(
            Path("pay_1".to_string()),
            CorrelationId::generate(),
            Auth(identity("T1", Role::Tenant)),
            State(state),
            Json(TransitionPaymentRequest {
                to_status: PaymentStatus::Completed,
                metadata: None,
            }),
        )
        .await;
        let err = result.err().expect("must be rejected");
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn illegal_transition_is_unprocessable() {
        let state = crate::state::test_support::state();
        seed_payment(&state, "pay_1");

        let result = transition_payment(
            Path("pay_1".to_string()),
            CorrelationId::generate(),
            Auth(identity("A1", Role::Admin)),
            State(state.clone()),
            Json(TransitionPaymentRequest {
                to_status: PaymentStatus::Refunded,
                metadata: None,
            }),
        )
        .await;
        let err = result.err().expect("must be rejected");
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);

        // Nothing committed.
        let payment = state.ledger.get_payment("pay_1").unwrap().unwrap();
        assert_eq!(payment.status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn ledger_view_is_admin_only() {
        let state = crate::state::test_support::state();
        seed_payment(&state, "pay_1");

        let result = payment_ledger(
            Path("pay_1".to_string()),
            CorrelationId::generate(),
            Auth(identity("M1", Role::Manager)),
            State(state.clone()),
        )
        .await;
        let err = result.err().expect("must be rejected");
        assert_eq!(err.status, StatusCode::FORBIDDEN);

        let Json(entries) = payment_ledger(
            Path("pay_1".to_string()),
            CorrelationId::generate(),
            Auth(identity("A1", Role::Admin)),
            State(state),
        )
        .await
        .unwrap();
        assert_eq!(entries.len(), 1);
    }
}
