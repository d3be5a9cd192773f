// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    audit::{FinancialAuditEntry, PaymentKind, PaymentRecord, PaymentStatus},
    auth::csrf,
    correlation, gateway,
    models::{
        Contract, DevLoginRequest, Property, SessionResponse, TransitionPaymentRequest,
        UpdatePropertyRequest,
    },
    state::AppState,
};

pub mod admin;
pub mod contracts;
pub mod health;
pub mod pages;
pub mod payments;
pub mod properties;
pub mod session;

/// Build the application router.
///
/// Layer order matters: execution runs correlation, then tracing, then the
/// route gateway, then the CSRF guard, then the handler. The gateway sits
/// outside the CSRF guard so unauthenticated requests are rejected before
/// any origin checking happens, and correlation is outermost so every
/// response carries the id.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/{locale}/login", get(pages::login))
        .route("/{locale}/dashboard", get(pages::dashboard))
        .route("/api/auth/dev-login", post(session::dev_login))
        .route("/api/properties", get(properties::list_properties))
        .route(
            "/api/properties/{property_id}",
            put(properties::update_property),
        )
        .route("/api/contracts/{contract_id}", get(contracts::get_contract))
        .route(
            "/api/payments/{payment_id}/status",
            post(payments::transition_payment),
        )
        .route(
            "/api/payments/{payment_id}/ledger",
            get(payments::payment_ledger),
        )
        .route("/api/admin/seed", post(admin::seed))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(csrf::csrf_guard))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            gateway::route_gateway,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(correlation::correlation_layer))
        .with_state(state)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        session::dev_login,
        properties::list_properties,
        properties::update_property,
        contracts::get_contract,
        payments::transition_payment,
        payments::payment_ledger,
        admin::seed
    ),
    components(
        schemas(
            health::HealthResponse,
            Property,
            Contract,
            UpdatePropertyRequest,
            DevLoginRequest,
            SessionResponse,
            TransitionPaymentRequest,
            PaymentRecord,
            PaymentKind,
            PaymentStatus,
            FinancialAuditEntry
        )
    ),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Session", description = "Development token issuance"),
        (name = "Properties", description = "Property portfolio"),
        (name = "Contracts", description = "Rental contracts"),
        (name = "Payments", description = "Payment transitions and their ledger"),
        (name = "Admin", description = "Administrative operations")
    )
)]
struct ApiDoc;
