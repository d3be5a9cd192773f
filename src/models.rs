// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! API-visible record types and request bodies.
//!
//! The full relational model (and its migrations) lives outside this
//! service; these are the ownership facts and payloads the gateway and its
//! handlers need.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::audit::PaymentStatus;
use crate::auth::Role;

/// A managed property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Property {
    pub id: String,
    pub name: String,
    pub address: String,
    /// Subject id of the managing user.
    pub manager_id: String,
}

/// A rental contract binding a tenant to a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Contract {
    pub id: String,
    pub property_id: String,
    /// Subject id of the tenant party.
    pub tenant_id: String,
}

/// A platform user, as far as the gateway needs to know one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub role: Role,
}

/// Body for `PUT /api/properties/{property_id}`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdatePropertyRequest {
    pub name: String,
}

/// Body for `POST /api/payments/{payment_id}/status`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TransitionPaymentRequest {
    pub to_status: PaymentStatus,
    /// Optional structured context recorded verbatim in the ledger entry.
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<serde_json::Value>,
}

/// Body for the development-only login endpoint.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DevLoginRequest {
    pub email: String,
}

/// Response carrying a freshly issued session token.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionResponse {
    pub token: String,
}
