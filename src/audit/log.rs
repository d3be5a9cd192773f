// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! Best-effort audit trail for administrative and security events.
//!
//! Entries are appended as JSONL to a daily file under the data directory.
//! The trail is informational, not a correctness gate: a failed append is
//! logged locally and swallowed, and the triggering business operation is
//! never blocked or rolled back. Contrast with the financial ledger
//! (`audit::ledger`), where a missing entry is a correctness violation.
//!
//! Callers are responsible for keeping secrets out of `details`; the writer
//! serializes the payload verbatim.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::roles::Role;

/// An audit log entry. Append-only; never updated or deleted by the
/// application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditEntry {
    /// Acting user, when known.
    pub actor_id: Option<String>,
    /// Acting user's email, when known.
    pub actor_email: Option<String>,
    /// Acting user's role, when known.
    pub actor_role: Option<Role>,
    /// What happened, e.g. `property.updated`.
    pub action: String,
    /// Kind of record affected, e.g. `property`.
    pub target_type: String,
    /// Identifier of the affected record.
    pub target_id: Option<String>,
    /// Free-form structured context.
    pub details: Option<serde_json::Value>,
    /// When the event occurred.
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    /// Start an entry for an action on a target type.
    pub fn new(action: impl Into<String>, target_type: impl Into<String>) -> Self {
        Self {
            actor_id: None,
            actor_email: None,
            actor_role: None,
            action: action.into(),
            target_type: target_type.into(),
            target_id: None,
            details: None,
            created_at: Utc::now(),
        }
    }

    /// Attach the acting identity.
    pub fn with_actor(mut self, identity: &crate::auth::IdentityAssertion) -> Self {
        self.actor_id = Some(identity.subject_id.clone());
        self.actor_email = Some(identity.email.clone());
        self.actor_role = Some(identity.role);
        self
    }

    /// Set the affected record.
    pub fn with_target(mut self, target_id: impl Into<String>) -> Self {
        self.target_id = Some(target_id.into());
        self
    }

    /// Add structured context.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Writer for the best-effort audit trail.
pub struct AuditLog {
    dir: PathBuf,
}

impl AuditLog {
    /// Create a writer rooted at `<data_dir>/audit`.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            dir: data_dir.join("audit"),
        }
    }

    /// Record an entry, fire-and-forget.
    ///
    /// The append runs on a blocking task off the response path; failures
    /// are logged and swallowed.
    pub fn record(self: &Arc<Self>, entry: AuditEntry) {
        let log = Arc::clone(self);
        tokio::spawn(async move {
            let action = entry.action.clone();
            let result = tokio::task::spawn_blocking(move || log.append(&entry)).await;
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!(error = %e, action, "audit append failed"),
                Err(e) => tracing::warn!(error = %e, action, "audit task panicked"),
            }
        });
    }

    /// Append an entry synchronously as one JSONL line in the daily file.
    pub fn append(&self, entry: &AuditEntry) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        let date = entry.created_at.format("%Y-%m-%d").to_string();
        let path = self.dir.join(format!("{date}.jsonl"));
        let line = serde_json::to_string(entry)?;

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(line.as_bytes())?;
        file.write_all(b"\n")
    }

    /// Read back the entries for one date (`YYYY-MM-DD`).
    pub fn read_entries(&self, date: &str) -> std::io::Result<Vec<AuditEntry>> {
        let path = self.dir.join(format!("{date}.jsonl"));
        let content = std::fs::read_to_string(path)?;

        let mut entries = Vec::new();
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let entry: AuditEntry = serde_json::from_str(line)?;
            entries.push(entry);
        }
        Ok(entries)
    }
}
