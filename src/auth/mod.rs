// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! # Authentication & Authorization
//!
//! ## Request flow
//!
//! 1. The web frontend (or an API client) presents a session token, either
//!    as the `session_token` cookie or as `Authorization: Bearer <token>`.
//! 2. The route gateway middleware verifies the token for protected paths
//!    and stores the resulting [`IdentityAssertion`] in the request
//!    extensions.
//! 3. Handlers pick the assertion up through the [`Auth`] extractor and
//!    apply the [`rbac`] predicates for record-level scope checks.
//! 4. Cookie-authenticated unsafe requests additionally pass the
//!    [`csrf`] guard.
//!
//! ## Security
//!
//! - Tokens are HS256-signed with the process session secret; production
//!   refuses to start with a secret shorter than 32 bytes.
//! - Verification is pure (no I/O) and fails closed: malformed input is an
//!   explicit error, never a panic.
//! - Roles are a closed enumeration validated at the deserialization
//!   boundary; unknown role strings invalidate the whole token.

pub mod claims;
pub mod csrf;
pub mod error;
pub mod extractor;
pub mod rbac;
pub mod roles;
pub mod token;

pub use claims::IdentityAssertion;
pub use error::AuthError;
pub use extractor::{Auth, SESSION_COOKIE};
pub use roles::Role;
pub use token::TokenCodec;
