// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! Route gateway: the single mandatory choke point in front of every
//! protected path.
//!
//! Per-request state machine:
//!
//! 1. Locale resolution (`/` redirects to the default locale root; page
//!    paths without a recognized locale prefix are rewritten onto the
//!    default locale so one locale-parameterized route set serves them;
//!    API and infrastructure paths are never locale-prefixed).
//! 2. Protection check against the locale-stripped path.
//! 3. Credential extraction: session cookie, then bearer header.
//! 4. Verification through the token codec. Failures answer by route kind:
//!    API routes get `401 {"error":"Unauthorized"}`, page routes a 302 to
//!    the locale-appropriate login page. No stack trace ever reaches the
//!    caller.
//! 5. Pass-through: the verified assertion lands in the request extensions
//!    and the credential is forwarded unchanged.
//!
//! Handlers behind the gateway never re-verify signatures; they only apply
//! the `auth::rbac` predicates for record-level scope.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::auth::extractor::verify_request;
use crate::correlation::CorrelationId;
use crate::error::ApiError;
use crate::locale::{login_path, split_locale, DEFAULT_LOCALE};
use crate::logging::redact_details;
use crate::state::AppState;

/// Page path prefixes that require authentication.
const PROTECTED_PAGE_PREFIXES: &[&str] = &["/dashboard"];

/// API path prefixes that require authentication.
const PROTECTED_API_PREFIXES: &[&str] = &[
    "/api/properties",
    "/api/contracts",
    "/api/payments",
    "/api/admin",
];

/// Path prefixes that are never locale-prefixed and must not be rewritten.
const LOCALE_EXEMPT_PREFIXES: &[&str] = &["/api", "/healthz", "/docs", "/api-doc"];

/// How a protected route answers a failed authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RouteKind {
    /// Server-rendered page: redirect to the login page.
    Page,
    /// API route: structured 401, API clients expect status codes.
    Api,
}

/// Classify a locale-stripped path, `None` meaning unprotected.
fn protected_route(path: &str) -> Option<RouteKind> {
    if PROTECTED_API_PREFIXES.iter().any(|p| prefix_matches(path, p)) {
        return Some(RouteKind::Api);
    }
    if PROTECTED_PAGE_PREFIXES.iter().any(|p| prefix_matches(path, p)) {
        return Some(RouteKind::Page);
    }
    None
}

/// Segment-aware prefix test: `/dashboard/settings` matches `/dashboard`,
/// `/dashboard-v2` does not.
fn prefix_matches(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Whether a path lives outside the locale-prefixed page tree.
fn locale_exempt(path: &str) -> bool {
    LOCALE_EXEMPT_PREFIXES.iter().any(|p| prefix_matches(path, p))
}

/// Rewrite the request URI onto the default locale, keeping the query.
fn rewrite_with_locale(request: &mut Request, path: &str) {
    let rewritten = match request.uri().query() {
        Some(query) => format!("/{DEFAULT_LOCALE}{path}?{query}"),
        None => format!("/{DEFAULT_LOCALE}{path}"),
    };
    if let Ok(uri) = rewritten.parse() {
        *request.uri_mut() = uri;
    }
}

/// Build a 302 redirect.
fn redirect_found(location: &str) -> Response {
    Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, location)
        .body(Body::empty())
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// The gateway middleware.
pub async fn route_gateway(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    // Step 1: locale resolution. A redirect here returns immediately.
    if path == "/" {
        return redirect_found(&format!("/{DEFAULT_LOCALE}"));
    }
    let (locale, stripped) = split_locale(&path);

    // Page paths whose first segment is not a supported locale (including
    // unknown locales like /xx/...) are rewritten onto the default locale,
    // so the locale-parameterized routes serve them and unknown locales
    // fall through to 404 instead of matching as page routes.
    if stripped.len() == path.len() && !locale_exempt(&path) {
        rewrite_with_locale(&mut request, &path);
    }

    // Step 2: protection check on the locale-stripped path.
    let Some(kind) = protected_route(stripped) else {
        return next.run(request).await;
    };

    // Steps 3 + 4: credential extraction and verification.
    let correlation_id = request
        .extensions()
        .get::<CorrelationId>()
        .cloned()
        .unwrap_or_else(CorrelationId::generate);

    match verify_request(request.headers(), &state.codec) {
        Ok(identity) => {
            tracing::debug!(
                event = "gateway.allowed",
                correlation_id = %correlation_id,
                user_id = %identity.subject_id,
                role = %identity.role,
                route = %path,
                "request authenticated"
            );
            // Step 5: pass through, assertion available to extractors.
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(error) => {
            tracing::warn!(
                event = "gateway.denied",
                correlation_id = %correlation_id,
                route = %path,
                details = %redact_details(&json!({"error_code": error.error_code()})),
                "request rejected"
            );
            match kind {
                RouteKind::Api => ApiError::unauthorized().into_response(),
                RouteKind::Page => redirect_found(&login_path(locale)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_prefixes_are_protected() {
        assert_eq!(protected_route("/api/properties"), Some(RouteKind::Api));
        assert_eq!(protected_route("/api/properties/prop_1"), Some(RouteKind::Api));
        assert_eq!(protected_route("/api/payments/p1/status"), Some(RouteKind::Api));
        assert_eq!(protected_route("/api/admin/seed"), Some(RouteKind::Api));
    }

    #[test]
    fn page_prefixes_are_protected() {
        assert_eq!(protected_route("/dashboard"), Some(RouteKind::Page));
        assert_eq!(protected_route("/dashboard/settings"), Some(RouteKind::Page));
    }

    #[test]
    fn other_paths_pass_through() {
        assert_eq!(protected_route("/"), None);
        assert_eq!(protected_route("/login"), None);
        assert_eq!(protected_route("/healthz"), None);
        assert_eq!(protected_route("/api/auth/dev-login"), None);
    }

    #[test]
    fn prefix_matching_respects_segment_boundaries() {
        assert_eq!(protected_route("/dashboard-v2"), None);
        assert_eq!(protected_route("/api/propertiesX"), None);
    }

    #[test]
    fn infrastructure_paths_are_locale_exempt() {
        assert!(locale_exempt("/api/properties"));
        assert!(locale_exempt("/api/auth/dev-login"));
        assert!(locale_exempt("/healthz"));
        assert!(locale_exempt("/docs"));
        assert!(locale_exempt("/api-doc/openapi.json"));

        assert!(!locale_exempt("/dashboard"));
        assert!(!locale_exempt("/login"));
        assert!(!locale_exempt("/apis"));
    }

    #[test]
    fn rewrite_prefixes_default_locale_and_keeps_query() {
        let mut request = Request::builder()
            .uri("/dashboard?tab=payments")
            .body(axum::body::Body::empty())
            .unwrap();
        rewrite_with_locale(&mut request, "/dashboard");
        assert_eq!(request.uri().path(), "/en/dashboard");
        assert_eq!(request.uri().query(), Some("tab=payments"));

        let mut request = Request::builder()
            .uri("/xx/dashboard")
            .body(axum::body::Body::empty())
            .unwrap();
        rewrite_with_locale(&mut request, "/xx/dashboard");
        assert_eq!(request.uri().path(), "/en/xx/dashboard");
    }

    #[test]
    fn redirect_is_302_with_location() {
        let response = redirect_found("/en/login");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/en/login"
        );
    }
}
