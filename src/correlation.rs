// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! Per-request correlation identifiers.
//!
//! An inbound `x-correlation-id` header is honored when present and
//! non-empty; otherwise a fresh UUID v4 (122 random bits) is generated.
//! The chosen id is memoized in the request's extensions so every lookup
//! within one request agrees, and it is always echoed back on the response
//! so client and server logs line up.

use axum::{
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Header carrying the correlation id in both directions.
pub const CORRELATION_HEADER: &str = "x-correlation-id";

/// Opaque correlation identifier threading one request's logs and audit
/// entries together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Derive an id from inbound headers: header value if present and
    /// non-empty, fresh UUID v4 otherwise.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(CORRELATION_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(|v| Self(v.to_string()))
            .unwrap_or_else(Self::generate)
    }

    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extractor returning the request's correlation id.
///
/// Returns the memoized id when the correlation middleware (or an earlier
/// extraction) already derived one; otherwise derives it from the headers
/// and memoizes it, so repeated extractions within one request always agree
/// without re-reading headers.
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<CorrelationId>() {
            return Ok(id.clone());
        }
        let id = CorrelationId::from_headers(&parts.headers);
        parts.extensions.insert(id.clone());
        Ok(id)
    }
}

/// Outermost middleware: derive the id, memoize it for the rest of the
/// chain, and echo it on the response.
pub async fn correlation_layer(mut request: Request, next: Next) -> Response {
    let id = CorrelationId::from_headers(request.headers());
    request.extensions_mut().insert(id.clone());

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(id.as_str()) {
        response.headers_mut().insert(CORRELATION_HEADER, value);
    }
    response
}
