// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! Propgate - Authentication & Authorization Gateway
//!
//! Request gateway for a multi-tenant property management platform: session
//! token issuance and verification, route protection, role-based access
//! control, CSRF defense and the audit trails behind them.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers and the router (Axum)
//! - `auth` - Token codec, RBAC predicates, CSRF guard
//! - `gateway` - The protected-route middleware
//! - `audit` - Best-effort audit log and the transactional financial ledger
//! - `correlation` - Per-request correlation ids

pub mod api;
pub mod audit;
pub mod auth;
pub mod config;
pub mod correlation;
pub mod error;
pub mod gateway;
pub mod locale;
pub mod logging;
pub mod models;
pub mod state;
pub mod store;
