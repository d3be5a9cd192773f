// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! Token codec: issuance and verification of signed session tokens.
//!
//! Tokens are HS256 JWTs signed with the process-wide session secret, which
//! is resolved once at startup and immutable afterwards. Verification is a
//! pure computation (signature + claims + expiry, no I/O), so it is equally
//! usable from the route-gateway middleware and from request handlers - both
//! call the single [`TokenCodec::verify`], which is how the two entry points
//! are guaranteed to agree on every input.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::{IdentityAssertion, SessionClaims};
use super::error::AuthError;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Codec for session tokens.
///
/// Holds the derived signing keys; cheap to share behind an `Arc`.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Build a codec from the raw session secret.
    ///
    /// Secret strength is enforced by configuration at startup, not here;
    /// by the time a codec exists the process has already committed to its
    /// secret.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a signed token for the given identity, valid for `ttl`.
    pub fn issue(
        &self,
        identity: &IdentityAssertion,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: identity.subject_id.clone(),
            email: identity.email.clone(),
            role: identity.role,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| AuthError::MalformedToken)
    }

    /// Verify a token and return the identity it asserts.
    ///
    /// Fails with an explicit error (never panics) when the signature does
    /// not match, the token is structurally malformed, required claims are
    /// missing or mistyped, the role is outside the closed enumeration, or
    /// the expiry has passed.
    pub fn verify(&self, token: &str) -> Result<IdentityAssertion, AuthError> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            })?;

        Ok(IdentityAssertion::from(token_data.claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::roles::Role;

    const TEST_SECRET: &str = "test-secret-that-is-long-enough-xx";

    fn codec() -> TokenCodec {
        TokenCodec::new(TEST_SECRET)
    }

    /// Sign arbitrary claims with the test secret, bypassing the typed
    /// claims struct.
    fn signed_token(claims: serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn sample_identity() -> IdentityAssertion {
        IdentityAssertion::new("user_123", "tenant@example.com", Role::Tenant)
    }

    #[test]
    fn verify_round_trips_issue() {
        let codec = codec();
        let token = codec.issue(&sample_identity(), Duration::hours(1)).unwrap();
        let identity = codec.verify(&token).unwrap();
        assert_eq!(identity, sample_identity());
    }

    #[test]
    fn verify_rejects_expired_token() {
        let codec = codec();
        // Expired well past the 60s leeway.
        let token = codec.issue(&sample_identity(), Duration::hours(-2)).unwrap();
        assert_eq!(codec.verify(&token), Err(AuthError::TokenExpired));
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let token = codec().issue(&sample_identity(), Duration::hours(1)).unwrap();
        let other = TokenCodec::new("a-completely-different-signing-secret");
        assert_eq!(other.verify(&token), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn verify_rejects_malformed_tokens() {
        let codec = codec();
        for garbage in ["", "not-a-jwt", "a.b", "a.b.c.d", "🦀🦀🦀"] {
            assert!(codec.verify(garbage).is_err(), "accepted {garbage:?}");
        }
    }

    /// A correctly signed token with an unknown role claim; the closed Role
    /// enum must reject it during claims deserialization.
    #[test]
    fn verify_rejects_unknown_role() {
        let token = signed_token(serde_json::json!({
            "sub": "u1",
            "email": "a@b.c",
            "role": "ROOT",
            "iat": 0,
            "exp": 9_999_999_999i64,
        }));
        assert_eq!(codec().verify(&token), Err(AuthError::MalformedToken));
    }

    #[test]
    fn verify_rejects_missing_claims() {
        // No email, no role.
        let token = signed_token(serde_json::json!({
            "sub": "u1",
            "iat": 0,
            "exp": 9_999_999_999i64,
        }));
        assert!(codec().verify(&token).is_err());
    }

    #[test]
    fn issued_tokens_preserve_role() {
        let codec = codec();
        for role in [Role::Admin, Role::Manager, Role::Tenant] {
            let identity = IdentityAssertion::new("u", "u@example.com", role);
            let token = codec.issue(&identity, Duration::minutes(5)).unwrap();
            assert_eq!(codec.verify(&token).unwrap().role, role);
        }
    }
}
