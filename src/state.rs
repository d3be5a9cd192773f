// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::audit::{AuditLog, LedgerDb};
use crate::auth::TokenCodec;
use crate::config::AppConfig;
use crate::store::InMemoryStore;

/// Shared application state.
///
/// Everything here is read-only after startup except the record store
/// (behind its lock) and the append-only stores behind their own
/// transactional APIs. The gateway itself holds no cross-request mutable
/// state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub codec: Arc<TokenCodec>,
    pub store: Arc<RwLock<InMemoryStore>>,
    pub ledger: Arc<LedgerDb>,
    pub audit: Arc<AuditLog>,
}

impl AppState {
    pub fn new(config: AppConfig, store: InMemoryStore, ledger: LedgerDb) -> Self {
        let codec = TokenCodec::new(&config.session_secret);
        let audit = AuditLog::new(&config.data_dir);
        Self {
            config: Arc::new(config),
            codec: Arc::new(codec),
            store: Arc::new(RwLock::new(store)),
            ledger: Arc::new(ledger),
            audit: Arc::new(audit),
        }
    }
}
