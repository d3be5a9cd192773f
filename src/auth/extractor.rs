// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! Axum extractors for the verified identity.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(identity): Auth) -> impl IntoResponse {
//!     // identity is IdentityAssertion
//! }
//! ```
//!
//! On protected routes the gateway middleware has already verified the
//! credential and stored the assertion in the request extensions, so the
//! extractor is a lookup. Handlers mounted outside the protected prefixes
//! can still use `Auth` directly; it runs the same [`TokenCodec::verify`]
//! the middleware runs, so the two paths agree on every input.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use super::{claims::IdentityAssertion, error::AuthError, token::TokenCodec};
use crate::state::AppState;

/// Name of the session cookie carrying the bearer token.
pub const SESSION_COOKIE: &str = "session_token";

/// Extract the bearer credential from a request: session cookie first,
/// `Authorization: Bearer` header as fallback.
pub fn extract_credential(headers: &HeaderMap) -> Option<String> {
    cookie_value(headers, SESSION_COOKIE).or_else(|| bearer_token(headers))
}

/// Read a cookie value out of the `Cookie` header(s).
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    for header in headers.get_all(header::COOKIE) {
        let Ok(raw) = header.to_str() else { continue };
        for pair in raw.split(';') {
            if let Some((key, value)) = pair.trim().split_once('=') {
                if key == name && !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

/// Read a `Bearer` token from the `Authorization` header.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Verify the request's credential, wherever it is carried.
///
/// An `Authorization` header in a scheme other than `Bearer` is reported
/// as a malformed carrier, distinct from no credential at all.
pub fn verify_request(headers: &HeaderMap, codec: &TokenCodec) -> Result<IdentityAssertion, AuthError> {
    match extract_credential(headers) {
        Some(token) => codec.verify(&token),
        None if headers.contains_key(header::AUTHORIZATION) => Err(AuthError::InvalidAuthHeader),
        None => Err(AuthError::MissingCredential),
    }
}

/// Extractor for authenticated identities.
pub struct Auth(pub IdentityAssertion);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Fast path: the gateway middleware already verified the credential.
        if let Some(identity) = parts.extensions.get::<IdentityAssertion>().cloned() {
            return Ok(Auth(identity));
        }

        let identity = verify_request(&parts.headers, &state.codec)?;
        Ok(Auth(identity))
    }
}
