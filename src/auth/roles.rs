// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! User roles for authorization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User roles for authorization.
///
/// ## Role Hierarchy
///
/// - `Admin` - Full access to every property, contract and payment
/// - `Manager` - Manages the properties assigned to them (and their contracts)
/// - `Tenant` - Party to their own contracts only
///
/// The set is closed: tokens carrying any other role string fail
/// deserialization and therefore fail verification. There is deliberately no
/// `Default` fallback role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Full administrative access
    Admin,
    /// Property manager (owns a set of properties)
    Manager,
    /// Tenant (party to contracts)
    Tenant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "ADMIN"),
            Role::Manager => write!(f, "MANAGER"),
            Role::Tenant => write!(f, "TENANT"),
        }
    }
}
