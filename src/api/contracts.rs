// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

use axum::{
    extract::{Path, State},
    Json,
};

use crate::auth::{rbac, Auth};
use crate::error::ApiError;
use crate::models::Contract;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/contracts/{contract_id}",
    params(("contract_id" = String, Path, description = "Contract to fetch")),
    tag = "Contracts",
    responses(
        (status = 200, body = Contract),
        (status = 403, description = "Outside the caller's contract scope"),
        (status = 404, description = "Unknown contract")
    )
)]
pub async fn get_contract(
    Path(contract_id): Path<String>,
    Auth(identity): Auth,
    State(state): State<AppState>,
) -> Result<Json<Contract>, ApiError> {
    let store = state.store.read().await;
    let scope = store
        .contract_scope(&contract_id)
        .ok_or_else(|| ApiError::not_found("Contract not found"))?;

    if !rbac::can_access_contract_scope(&identity, &scope) {
        return Err(ApiError::forbidden());
    }

    let contract = store
        .contract(&contract_id)
        .ok_or_else(|| ApiError::not_found("Contract not found"))?;
    Ok(Json(contract))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{IdentityAssertion, Role};
    use axum::http::StatusCode;

    fn identity(id: &str, role: Role) -> IdentityAssertion {
        IdentityAssertion::new(id, format!("{id}@propgate.example"), role)
    }

    #[tokio::test]
    async fn tenant_reads_own_contract() {
        let state = crate::state::test_support::state();
        let Json(contract) = get_contract(
            Path("contract_1".to_string()),
            Auth(identity("T1", Role::Tenant)),
            State(state),
        )
        .await
        .unwrap();
        assert_eq!(contract.tenant_id, "T1");
    }

    #[tokio::test]
    async fn tenant_cannot_read_foreign_contract() {
        let state = crate::state::test_support::state();
        let result = get_contract(
            Path("contract_2".to_string()),
            Auth(identity("T1", Role::Tenant)),
            State(state),
        )
        .await;
        let err = result.err().expect("must be rejected");
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn property_manager_reads_contract() {
        let state = crate::state::test_support::state();
        let result = get_contract(
            Path("contract_1".to_string()),
            Auth(identity("M1", Role::Manager)),
            State(state),
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn unknown_contract_is_404() {
        let state = crate::state::test_support::state();
        let result = get_contract(
            Path("contract_99".to_string()),
            Auth(identity("A1", Role::Admin)),
            State(state),
        )
        .await;
        let err = result.err().expect("must be rejected");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
