// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! JWT claims and the verified identity assertion.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::roles::Role;

/// Claims carried inside a session token.
///
/// The `role` claim deserializes into the closed [`Role`] enum; a token with
/// an unknown role string fails to decode and is therefore invalid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,

    /// User's email address
    pub email: String,

    /// User's role (closed enumeration)
    pub role: Role,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Verified identity extracted from a session token.
///
/// This is the primary type used throughout the application to represent
/// the authenticated caller. It is immutable once issued; revocation is only
/// via cookie deletion or token expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IdentityAssertion {
    /// Canonical user ID (JWT `sub` claim)
    pub subject_id: String,

    /// User's email address
    pub email: String,

    /// User's role
    pub role: Role,
}

impl IdentityAssertion {
    /// Build an assertion for the given subject.
    pub fn new(subject_id: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            subject_id: subject_id.into(),
            email: email.into(),
            role,
        }
    }

    /// Check if this identity is an admin.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<SessionClaims> for IdentityAssertion {
    fn from(claims: SessionClaims) -> Self {
        Self {
            subject_id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_claims() -> SessionClaims {
        SessionClaims {
            sub: "user_123".to_string(),
            email: "manager@example.com".to_string(),
            role: Role::Manager,
            iat: 1700000000,
            exp: 1700003600,
        }
    }

    #[test]
    fn from_claims_extracts_identity() {
        let identity = IdentityAssertion::from(sample_claims());
        assert_eq!(identity.subject_id, "user_123");
        assert_eq!(identity.email, "manager@example.com");
        assert_eq!(identity.role, Role::Manager);
    }

    #[test]
    fn is_admin_checks_role() {
        let mut claims = sample_claims();
        claims.role = Role::Admin;
        assert!(IdentityAssertion::from(claims).is_admin());
        assert!(!IdentityAssertion::from(sample_claims()).is_admin());
    }

    #[test]
    fn claims_reject_unknown_role_string() {
        let json = r#"{"sub":"u1","email":"a@b.c","role":"ROOT","iat":0,"exp":9999999999}"#;
        assert!(serde_json::from_str::<SessionClaims>(json).is_err());
    }
}
