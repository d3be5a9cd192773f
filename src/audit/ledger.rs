// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! Financial audit ledger backed by redb (pure Rust, ACID).
//!
//! Every monetary state transition must produce exactly one ledger entry
//! recording the prior and new status, committed atomically with the state
//! change itself. [`FinancialLedger::append`] therefore takes an explicit
//! open write transaction: the caller updates the payment and appends the
//! entry inside the same transaction, and a failure on either side aborts
//! both. A status change without its ledger entry cannot be observed, even
//! across a crash.
//!
//! ## Table Layout
//!
//! - `payments`: payment_id → serialized PaymentRecord
//! - `financial_audit`: composite key (entity_id|!timestamp|entry_id) →
//!   serialized FinancialAuditEntry, newest-first per entity

use std::path::Path;

use chrono::{DateTime, Utc};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// =============================================================================
// Table Definitions
// =============================================================================

/// Payments: payment_id → serialized PaymentRecord (JSON bytes).
const PAYMENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("payments");

/// Ledger: composite key → serialized FinancialAuditEntry (JSON bytes).
/// Key format: `entity_id|!timestamp_be|entry_id` for descending-time scans.
const FINANCIAL_AUDIT: TableDefinition<&[u8], &[u8]> = TableDefinition::new("financial_audit");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("payment not found: {0}")]
    PaymentNotFound(String),

    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: PaymentStatus,
        to: PaymentStatus,
    },
}

pub type LedgerResult<T> = Result<T, LedgerError>;

// =============================================================================
// Domain Types
// =============================================================================

/// Kind of monetary movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentKind {
    Payment,
    Withdrawal,
}

/// Lifecycle status of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    /// Whether `self -> to` is a legal monetary state transition.
    pub fn can_transition_to(self, to: PaymentStatus) -> bool {
        matches!(
            (self, to),
            (PaymentStatus::Pending, PaymentStatus::Completed)
                | (PaymentStatus::Pending, PaymentStatus::Failed)
                | (PaymentStatus::Completed, PaymentStatus::Refunded)
        )
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "PENDING"),
            PaymentStatus::Completed => write!(f, "COMPLETED"),
            PaymentStatus::Failed => write!(f, "FAILED"),
            PaymentStatus::Refunded => write!(f, "REFUNDED"),
        }
    }
}

/// A stored payment record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentRecord {
    pub id: String,
    pub contract_id: String,
    pub kind: PaymentKind,
    pub amount_cents: i64,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One immutable financial audit entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FinancialAuditEntry {
    pub id: String,
    pub kind: PaymentKind,
    /// The payment (or withdrawal) this entry documents.
    pub entity_id: String,
    /// Prior status; `None` for the creating transition.
    pub from_status: Option<PaymentStatus>,
    pub to_status: PaymentStatus,
    pub actor_id: Option<String>,
    pub correlation_id: Option<String>,
    /// Structured payload, serialized verbatim. Callers keep secrets out.
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl FinancialAuditEntry {
    /// Build the entry documenting one status transition.
    pub fn for_transition(
        payment: &PaymentRecord,
        from: Option<PaymentStatus>,
        to: PaymentStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: payment.kind,
            entity_id: payment.id.clone(),
            from_status: from,
            to_status: to,
            actor_id: None,
            correlation_id: None,
            metadata: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_actor(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = Some(actor_id.into());
        self
    }

    pub fn with_correlation(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

// =============================================================================
// Index Key Helpers
// =============================================================================

/// Build a composite key for the financial_audit table.
///
/// Format: `entity_id | inverted_timestamp_be_bytes | entry_id`
///
/// The inverted timestamp ensures newest-first ordering when scanning
/// forward.
fn make_entry_key(entity_id: &str, timestamp: i64, entry_id: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(entity_id.len() + 1 + 8 + 1 + entry_id.len());
    key.extend_from_slice(entity_id.as_bytes());
    key.push(b'|');
    key.extend_from_slice(&(!timestamp as u64).to_be_bytes());
    key.push(b'|');
    key.extend_from_slice(entry_id.as_bytes());
    key
}

/// Build a prefix for range scanning all entries of one entity.
fn make_prefix(entity_id: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(entity_id.len() + 1);
    prefix.extend_from_slice(entity_id.as_bytes());
    prefix.push(b'|');
    prefix
}

/// Build the upper bound for a range scan (prefix with 0xFF bytes appended).
fn make_prefix_end(entity_id: &str) -> Vec<u8> {
    let mut end = make_prefix(entity_id);
    end.extend_from_slice(&[0xFF; 20]);
    end
}

// =============================================================================
// FinancialLedger - the transactional append capability
// =============================================================================

/// Append-only writer over an externally owned transaction.
///
/// Callers must invoke [`FinancialLedger::append`] inside the same write
/// transaction as the state change the entry documents; the shared commit
/// is what makes the trail tamper-evident across crashes. Errors propagate
/// so the enclosing transaction aborts.
pub struct FinancialLedger;

impl FinancialLedger {
    /// Append one entry within the caller's open transaction.
    pub fn append(txn: &WriteTransaction, entry: &FinancialAuditEntry) -> LedgerResult<()> {
        let json = serde_json::to_vec(entry)?;
        // Microsecond precision so entries written in quick succession keep
        // their relative order in the index.
        let key = make_entry_key(
            &entry.entity_id,
            entry.created_at.timestamp_micros(),
            &entry.id,
        );

        let mut table = txn.open_table(FINANCIAL_AUDIT)?;
        table.insert(key.as_slice(), json.as_slice())?;
        Ok(())
    }
}

// =============================================================================
// LedgerDb
// =============================================================================

/// Embedded ACID database holding payments and their audit ledger.
pub struct LedgerDb {
    db: Database,
}

impl LedgerDb {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> LedgerResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create tables so later read transactions don't fail.
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(PAYMENTS)?;
            let _ = write_txn.open_table(FINANCIAL_AUDIT)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Begin a write transaction for callers composing their own atomic
    /// units with [`FinancialLedger::append`].
    pub fn begin_write(&self) -> LedgerResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Insert a payment in its initial status, with its creating ledger
    /// entry, atomically.
    pub fn insert_payment(&self, payment: &PaymentRecord) -> LedgerResult<FinancialAuditEntry> {
        let entry = FinancialAuditEntry::for_transition(payment, None, payment.status);
        let json = serde_json::to_vec(payment)?;

        let txn = self.begin_write()?;
        {
            let mut payments = txn.open_table(PAYMENTS)?;
            payments.insert(payment.id.as_str(), json.as_slice())?;
            FinancialLedger::append(&txn, &entry)?;
        }
        txn.commit()?;
        Ok(entry)
    }

    /// Look up a payment by id.
    pub fn get_payment(&self, payment_id: &str) -> LedgerResult<Option<PaymentRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PAYMENTS)?;
        match table.get(payment_id)? {
            Some(value) => {
                let payment: PaymentRecord = serde_json::from_slice(value.value())?;
                Ok(Some(payment))
            }
            None => Ok(None),
        }
    }

    /// Apply a status transition and append its ledger entry in one atomic
    /// unit: either both the new status and the entry commit, or neither.
    ///
    /// An illegal transition aborts before anything is written.
    pub fn transition_payment(
        &self,
        payment_id: &str,
        to: PaymentStatus,
        actor_id: Option<&str>,
        correlation_id: Option<&str>,
        metadata: Option<serde_json::Value>,
    ) -> LedgerResult<FinancialAuditEntry> {
        let txn = self.begin_write()?;
        let entry = {
            let mut payments = txn.open_table(PAYMENTS)?;

            let mut payment: PaymentRecord = match payments.get(payment_id)? {
                Some(value) => serde_json::from_slice(value.value())?,
                None => return Err(LedgerError::PaymentNotFound(payment_id.to_string())),
            };

            let from = payment.status;
            if !from.can_transition_to(to) {
                return Err(LedgerError::InvalidTransition { from, to });
            }

            payment.status = to;
            payment.updated_at = Utc::now();
            let json = serde_json::to_vec(&payment)?;
            payments.insert(payment_id, json.as_slice())?;

            let mut entry = FinancialAuditEntry::for_transition(&payment, Some(from), to);
            if let Some(actor_id) = actor_id {
                entry = entry.with_actor(actor_id);
            }
            if let Some(correlation_id) = correlation_id {
                entry = entry.with_correlation(correlation_id);
            }
            if let Some(metadata) = metadata {
                entry = entry.with_metadata(metadata);
            }
            FinancialLedger::append(&txn, &entry)?;
            entry
        };
        txn.commit()?;
        Ok(entry)
    }

    /// Compliance query: all ledger entries for one entity, newest first.
    pub fn entries_for_entity(&self, entity_id: &str) -> LedgerResult<Vec<FinancialAuditEntry>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(FINANCIAL_AUDIT)?;

        let start = make_prefix(entity_id);
        let end = make_prefix_end(entity_id);

        let mut entries = Vec::new();
        for item in table.range(start.as_slice()..end.as_slice())? {
            let (_key, value) = item?;
            let entry: FinancialAuditEntry = serde_json::from_slice(value.value())?;
            entries.push(entry);
        }
        Ok(entries)
    }
}
