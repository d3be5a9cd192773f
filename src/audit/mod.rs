// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! Audit trails.
//!
//! Two writers with deliberately different guarantees:
//!
//! - [`log::AuditLog`] - best-effort, fire-and-forget trail for
//!   administrative and security events. Persistence failures never block
//!   the triggering operation.
//! - [`ledger::FinancialLedger`] - strict, append-only trail for monetary
//!   state transitions, committed inside the same transaction as the state
//!   change it documents. Failures abort the whole transaction.
//!
//! The two are distinct capabilities on purpose, so callers cannot
//! accidentally treat the financial ledger as fire-and-forget.

pub mod ledger;
pub mod log;

pub use ledger::{
    FinancialAuditEntry, FinancialLedger, LedgerDb, LedgerError, PaymentKind, PaymentRecord,
    PaymentStatus,
};
pub use log::{AuditEntry, AuditLog};
