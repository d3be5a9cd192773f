// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! # Runtime Configuration
//!
//! Configuration is resolved from the environment exactly once at startup
//! into an immutable [`AppConfig`]; nothing re-reads the environment per
//! request. Validation failures are fatal: the process refuses to serve
//! traffic rather than run with a weak signing secret.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `APP_ENV` | `production` or `development` | `development` |
//! | `SESSION_SECRET` | Token signing secret (≥ 32 bytes in production) | dev-only fallback |
//! | `DATA_DIR` | Root directory for ledger db and audit files | `/data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | `json` or `pretty` | `json` in production, else `pretty` |
//! | `ALLOW_PRODUCTION_SEED` | Opt-in for destructive seeding in production | unset |
//! | `RUST_LOG` | Log level filter | `info` |

use std::path::PathBuf;

/// Minimum signing-secret length accepted in production.
pub const MIN_SECRET_LEN: usize = 32;

/// Fallback secret for development environments only.
const DEV_SECRET: &str = "propgate-development-secret-do-not-deploy";

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn from_env() -> Self {
        match std::env::var("APP_ENV").as_deref() {
            Ok("production") => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Fatal configuration errors. Any of these aborts startup.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("SESSION_SECRET is required in production")]
    MissingSecret,

    #[error("SESSION_SECRET must be at least {MIN_SECRET_LEN} bytes in production (got {0})")]
    WeakSecret(usize),

    #[error("invalid PORT value: {0}")]
    InvalidPort(String),
}

/// Resolved process configuration, immutable after startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub session_secret: String,
    pub data_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
    /// Explicit opt-in required before destructive seeding runs in
    /// production.
    pub allow_production_seed: bool,
}

impl AppConfig {
    /// Resolve configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        let secret = std::env::var("SESSION_SECRET").ok();
        let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
        let log_format = std::env::var("LOG_FORMAT").ok();
        let allow_seed = std::env::var("ALLOW_PRODUCTION_SEED")
            .map(|v| v == "true")
            .unwrap_or(false);
        let data_dir = std::env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/data"));
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        Self::resolve(environment, secret, data_dir, host, port, log_format, allow_seed)
    }

    /// Pure resolution step, separated from env reading so validation is
    /// testable without mutating process state.
    #[allow(clippy::too_many_arguments)]
    fn resolve(
        environment: Environment,
        secret: Option<String>,
        data_dir: PathBuf,
        host: String,
        port: String,
        log_format: Option<String>,
        allow_production_seed: bool,
    ) -> Result<Self, ConfigError> {
        let session_secret = match (environment, secret) {
            (Environment::Production, None) => return Err(ConfigError::MissingSecret),
            (Environment::Production, Some(s)) if s.len() < MIN_SECRET_LEN => {
                return Err(ConfigError::WeakSecret(s.len()));
            }
            (_, Some(s)) => s,
            (Environment::Development, None) => DEV_SECRET.to_string(),
        };

        let port: u16 = port.parse().map_err(|_| ConfigError::InvalidPort(port))?;

        let log_format = match log_format.as_deref() {
            Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            _ if environment.is_production() => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            environment,
            session_secret,
            data_dir,
            host,
            port,
            log_format,
            allow_production_seed,
        })
    }
}
