//! Run configuration resolved from layered settings.
//!
//! Loop count and CLI override are validated strictly; a bad value is fatal
//! before any connection is attempted. Booleans, the pause interval and the
//! port fall back to defaults instead.

pub mod parse;

use smoke_settings::Settings;
use sqlserver_demo::{select_server, ConnectionTarget, DEFAULT_PORT};
use std::time::Duration;
use thiserror::Error;

use parse::{parse_bool, parse_i32, parse_u16};

/// Settings keys read by dbtest. Nested keys use `:` (`db__x` in the environment).
pub mod keys {
    pub const LOOPS: &str = "iLoops";
    pub const CLI_OVERRIDE: &str = "iCliOverride";
    pub const READ_ONLY: &str = "isReadOnly";
    pub const PAUSE_MS: &str = "iMsPause";
    pub const FAILOVER: &str = "isFailover";
    pub const DB_DATABASE: &str = "db:database";
    pub const DB_USER_ID: &str = "db:userId";
    pub const DB_PASSWORD: &str = "db:password";
    pub const DB_PRIMARY_SERVER: &str = "db:primaryServer";
    pub const DB_SECONDARY_SERVER: &str = "db:secondaryServer";
    pub const DB_PORT: &str = "db:port";
    pub const DB_ENCRYPT: &str = "db:encrypt";
    pub const DB_TRUST_SERVER_CERTIFICATE: &str = "db:trustServerCertificate";

    /// Every key consumed, in display order.
    pub const ALL: &[&str] = &[
        LOOPS,
        CLI_OVERRIDE,
        READ_ONLY,
        PAUSE_MS,
        FAILOVER,
        DB_DATABASE,
        DB_USER_ID,
        DB_PASSWORD,
        DB_PRIMARY_SERVER,
        DB_SECONDARY_SERVER,
        DB_PORT,
        DB_ENCRYPT,
        DB_TRUST_SERVER_CERTIFICATE,
    ];
}

const REDACTED: &str = "********";
const UNSET: &str = "<unset>";

/// Fatal configuration errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "invalid loop count {}: expected an integer greater than 1",
        .value.as_deref().unwrap_or(UNSET)
    )]
    InvalidLoopCount { value: Option<String> },

    #[error(
        "invalid CLI override {}: expected 0 or 1",
        .value.as_deref().unwrap_or(UNSET)
    )]
    InvalidCliOverride { value: Option<String> },
}

impl ConfigError {
    /// Line printed to the console before exiting.
    pub fn console_message(&self) -> &'static str {
        match self {
            ConfigError::InvalidLoopCount { .. } => "Invalid loop value, exiting...",
            ConfigError::InvalidCliOverride { .. } => "Invalid CLI override value, exiting...",
        }
    }
}

/// Validated loop count (`iLoops`), strictly greater than 1.
pub fn loop_count(settings: &Settings) -> Result<u32, ConfigError> {
    let raw = settings.get(keys::LOOPS);
    match parse_i32(raw) {
        Some(n) if n > 1 => Ok(n as u32),
        _ => Err(ConfigError::InvalidLoopCount {
            value: raw.map(str::to_string),
        }),
    }
}

/// Validated CLI override (`iCliOverride`): `true` when it is 1.
pub fn wait_for_key(settings: &Settings) -> Result<bool, ConfigError> {
    let raw = settings.get(keys::CLI_OVERRIDE);
    match parse_i32(raw) {
        Some(0) => Ok(false),
        Some(1) => Ok(true),
        _ => Err(ConfigError::InvalidCliOverride {
            value: raw.map(str::to_string),
        }),
    }
}

/// Immutable configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub loops: u32,
    pub wait_for_key: bool,
    pub read_only: bool,
    pub pause: Duration,
    pub failover: bool,
    pub target: ConnectionTarget,
}

impl RunConfig {
    /// Validate and coerce every setting.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let loops = loop_count(settings)?;
        let wait_for_key = wait_for_key(settings)?;
        Ok(Self::resolve(settings, loops, wait_for_key))
    }

    /// Coerce the lenient settings around an already validated loop count
    /// and CLI override.
    pub fn resolve(settings: &Settings, loops: u32, wait_for_key: bool) -> Self {
        let read_only = parse_bool(settings.get(keys::READ_ONLY)).unwrap_or(false);
        let failover = parse_bool(settings.get(keys::FAILOVER)).unwrap_or(false);

        let pause_ms = parse_i32(settings.get(keys::PAUSE_MS)).unwrap_or(0);
        if pause_ms < 0 {
            tracing::warn!("Negative {} ({}) treated as 0", keys::PAUSE_MS, pause_ms);
        }
        let pause = Duration::from_millis(pause_ms.max(0) as u64);

        let server = select_server(
            failover,
            settings.get(keys::DB_PRIMARY_SERVER),
            settings.get(keys::DB_SECONDARY_SERVER),
        );

        let text = |key: &str| settings.get(key).unwrap_or_default().to_string();
        let target = ConnectionTarget {
            server: server.unwrap_or_default().to_string(),
            database: text(keys::DB_DATABASE),
            user: text(keys::DB_USER_ID),
            password: text(keys::DB_PASSWORD),
            default_port: parse_u16(settings.get(keys::DB_PORT)).unwrap_or(DEFAULT_PORT),
            encrypt: parse_bool(settings.get(keys::DB_ENCRYPT)).unwrap_or(false),
            trust_server_certificate: parse_bool(settings.get(keys::DB_TRUST_SERVER_CERTIFICATE))
                .unwrap_or(false),
        };

        Self {
            loops,
            wait_for_key,
            read_only,
            pause,
            failover,
            target,
        }
    }
}

/// The resolved settings dbtest consumes, as `(key, value)` pairs in key
/// order, password redacted. Unrelated keys (most of the environment) are
/// omitted.
pub fn dump(settings: &Settings) -> Vec<(&str, String)> {
    settings
        .iter()
        .filter(|(key, _)| keys::ALL.iter().any(|k| k.eq_ignore_ascii_case(key)))
        .map(|(key, value)| {
            let shown = if key.eq_ignore_ascii_case(keys::DB_PASSWORD) && !value.is_empty() {
                REDACTED.to_string()
            } else {
                value.to_string()
            };
            (key, shown)
        })
        .collect()
}
