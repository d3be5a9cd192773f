// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::json;

use crate::audit::AuditEntry;
use crate::auth::{rbac, Auth};
use crate::error::ApiError;
use crate::models::{Property, UpdatePropertyRequest};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/properties",
    tag = "Properties",
    responses((status = 200, body = [Property]))
)]
pub async fn list_properties(
    Auth(identity): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Property>>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(
        store.properties_visible_to(&identity.subject_id, identity.role),
    ))
}

#[utoipa::path(
    put,
    path = "/api/properties/{property_id}",
    params(("property_id" = String, Path, description = "Property to update")),
    request_body = UpdatePropertyRequest,
    tag = "Properties",
    responses(
        (status = 200, body = Property),
        (status = 403, description = "Not the managing user"),
        (status = 404, description = "Unknown property")
    )
)]
pub async fn update_property(
    Path(property_id): Path<String>,
    Auth(identity): Auth,
    State(state): State<AppState>,
    Json(request): Json<UpdatePropertyRequest>,
) -> Result<Json<Property>, ApiError> {
    let mut store = state.store.write().await;
    let property = store
        .property(&property_id)
        .ok_or_else(|| ApiError::not_found("Property not found"))?;

    if !rbac::can_manage_property(&identity, &property.manager_id) {
        return Err(ApiError::forbidden());
    }

    let updated = store
        .rename_property(&property_id, request.name.clone())
        .ok_or_else(|| ApiError::not_found("Property not found"))?;
    drop(store);

    state.audit.record(
        AuditEntry::new("property.updated", "property")
            .with_actor(&identity)
            .with_target(&property_id)
            .with_details(json!({"name": request.name})),
    );

    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{IdentityAssertion, Role};

    fn identity(id: &str, role: Role) -> IdentityAssertion {
        IdentityAssertion::new(id, format!("{id}@propgate.example"), role)
    }

    #[tokio::test]
    async fn manager_sees_own_portfolio() {
        let state = crate::state::test_support::state();
        let Json(properties) = list_properties(
            Auth(identity("M1", Role::Manager)),
            State(state),
        )
        .await
        .unwrap();
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].id, "prop_1");
    }

    #[tokio::test]
    async fn manager_updates_own_property() {
        let state = crate::state::test_support::state();
        let Json(updated) = update_property(
            Path("prop_1".to_string()),
            Auth(identity("M1", Role::Manager)),
            State(state.clone()),
            Json(UpdatePropertyRequest {
                name: "Rue Verte 12bis".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Rue Verte 12bis");
    }

    #[tokio::test]
    async fn manager_cannot_update_foreign_property() {
        let state = crate::state::test_support::state();
        let result = update_property(
            Path("prop_2".to_string()),
            Auth(identity("M1", Role::Manager)),
            State(state),
            Json(UpdatePropertyRequest {
                name: "hijacked".to_string(),
            }),
        )
        .await;
        let err = result.err().expect("must be rejected");
        assert_eq!(err.status, axum::http::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_updates_any_property() {
        let state = crate::state::test_support::state();
        let result = update_property(
            Path("prop_2".to_string()),
            Auth(identity("A1", Role::Admin)),
            State(state),
            Json(UpdatePropertyRequest {
                name: "Hafenblick 3a".to_string(),
            }),
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn unknown_property_is_404() {
        let state = crate::state::test_support::state();
        let result = update_property(
            Path("prop_99".to_string()),
            Auth(identity("A1", Role::Admin)),
            State(state),
            Json(UpdatePropertyRequest {
                name: "ghost".to_string(),
            }),
        )
        .await;
        let err = result.err().expect("must be rejected");
        assert_eq!(err.status, axum::http::StatusCode::NOT_FOUND);
    }
}
