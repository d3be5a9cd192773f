// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

use std::net::SocketAddr;
use std::process::ExitCode;

use propgate::api::router;
use propgate::audit::LedgerDb;
use propgate::config::AppConfig;
use propgate::state::AppState;
use propgate::store::InMemoryStore;

#[tokio::main]
async fn main() -> ExitCode {
    // Config errors are fatal before logging is up, so they go to stderr.
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("configuration error: {error}");
            return ExitCode::FAILURE;
        }
    };

    propgate::logging::init(config.log_format);

    let ledger = match LedgerDb::open(&config.data_dir.join("ledger.redb")) {
        Ok(ledger) => ledger,
        Err(error) => {
            tracing::error!(error = %error, "failed to open ledger database");
            return ExitCode::FAILURE;
        }
    };

    let mut store = InMemoryStore::new();
    if !config.environment.is_production() {
        store.seed();
        tracing::info!("development mode: demo records seeded");
    }

    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(error) => {
            tracing::error!(error = %error, "invalid bind address");
            return ExitCode::FAILURE;
        }
    };

    let environment = config.environment;
    let state = AppState::new(config, store, ledger);
    let app = router(state);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(error = %error, %addr, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(%addr, %environment, "propgate listening (docs at /docs)");

    let serve = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal());
    if let Err(error) = serve.await {
        tracing::error!(error = %error, "server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %error, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}
