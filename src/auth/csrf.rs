// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! CSRF guard for cookie-authenticated, state-changing requests.
//!
//! ## Decision chain
//!
//! 1. Safe methods (GET/HEAD/OPTIONS) always pass.
//! 2. Requests carrying `Authorization: Bearer` always pass: a bearer header
//!    cannot be replayed cross-site by a browser, unlike a cookie.
//! 3. Otherwise the expected origin is computed from the request itself,
//!    preferring `X-Forwarded-Host`/`X-Forwarded-Proto` over the socket-level
//!    `Host` so reverse-proxy deployments compare against the public origin.
//! 4. An `Origin` header must match the expected origin exactly.
//! 5. Without `Origin`, `Sec-Fetch-Site` of `same-origin` or `none` passes.
//!    Anything else, including the absence of both headers, is rejected:
//!    no origin signal means untrusted.

use axum::{
    extract::Request,
    http::{header, HeaderMap, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use url::Url;

/// Why a request failed the CSRF check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsrfRejection {
    /// `Origin` header present but not equal to the expected origin.
    InvalidOrigin,
    /// `Sec-Fetch-Site` indicates a cross-site (or same-site) fetch.
    InvalidFetchSite,
    /// Neither `Origin` nor `Sec-Fetch-Site` present.
    MissingOriginContext,
}

impl CsrfRejection {
    /// Stable reason string, useful for telling a misconfigured reverse
    /// proxy apart from a genuine forgery attempt.
    pub fn reason(&self) -> &'static str {
        match self {
            CsrfRejection::InvalidOrigin => "invalid origin",
            CsrfRejection::InvalidFetchSite => "invalid fetch site",
            CsrfRejection::MissingOriginContext => "missing origin context",
        }
    }
}

#[derive(Serialize)]
struct CsrfErrorBody {
    error: &'static str,
}

impl IntoResponse for CsrfRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::FORBIDDEN,
            Json(CsrfErrorBody {
                error: self.reason(),
            }),
        )
            .into_response()
    }
}

/// Run the CSRF check for one request.
pub fn check(method: &Method, headers: &HeaderMap) -> Result<(), CsrfRejection> {
    if matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS) {
        return Ok(());
    }

    if headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer "))
    {
        return Ok(());
    }

    match headers.get(header::ORIGIN).and_then(|v| v.to_str().ok()) {
        Some(origin) => {
            if origin_matches(origin, headers) {
                Ok(())
            } else {
                Err(CsrfRejection::InvalidOrigin)
            }
        }
        None => match headers.get("sec-fetch-site").and_then(|v| v.to_str().ok()) {
            Some("same-origin") | Some("none") => Ok(()),
            Some(_) => Err(CsrfRejection::InvalidFetchSite),
            None => Err(CsrfRejection::MissingOriginContext),
        },
    }
}

/// Middleware wrapper over [`check`].
pub async fn csrf_guard(request: Request, next: Next) -> Response {
    if let Err(rejection) = check(request.method(), request.headers()) {
        tracing::warn!(
            reason = rejection.reason(),
            method = %request.method(),
            route = request.uri().path(),
            "csrf rejection"
        );
        return rejection.into_response();
    }
    next.run(request).await
}

/// Compare the `Origin` header against the origin the request itself claims
/// to be served from. Unparseable values (e.g. `Origin: null`) never match.
fn origin_matches(origin: &str, headers: &HeaderMap) -> bool {
    let Some(expected) = expected_origin(headers) else {
        return false;
    };
    let Ok(origin) = Url::parse(origin) else {
        return false;
    };
    origin.origin() == expected.origin()
}

/// Derive the expected origin, preferring forwarded headers over the literal
/// socket host.
fn expected_origin(headers: &HeaderMap) -> Option<Url> {
    let proto = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get("x-forwarded-host")
        .or_else(|| headers.get(header::HOST))
        .and_then(|v| v.to_str().ok())?;

    Url::parse(&format!("{proto}://{host}")).ok()
}
