// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! Minimal page endpoints.
//!
//! Real page rendering lives in the web frontend; these handlers exist so
//! locale-prefixed page paths terminate somewhere once the gateway has let
//! them through.

use axum::{extract::Path, response::Html};

use crate::auth::Auth;

/// Dashboard shell. The gateway guarantees `identity` is verified before
/// this runs.
pub async fn dashboard(Path(locale): Path<String>, Auth(identity): Auth) -> Html<String> {
    Html(format!(
        "<!doctype html><html lang=\"{locale}\"><body>Dashboard for {}</body></html>",
        identity.email
    ))
}

/// Login shell; reachable without a session.
pub async fn login(Path(locale): Path<String>) -> Html<String> {
    Html(format!(
        "<!doctype html><html lang=\"{locale}\"><body>Login</body></html>"
    ))
}
