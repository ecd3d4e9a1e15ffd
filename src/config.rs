//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

use crate::domain::Address;
use crate::logging::LogFormat;

/// Label hashed into the default pool registry address.
pub const DEFAULT_REGISTRY_LABEL: &str = "stake-pool-registry";

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Deployer identity allowed to bind the escrow ledger.
    pub admin_address: Address,

    /// Address the pool registry is deployed at.
    pub registry_address: Address,

    /// Bind the ledger to the hosted registry at startup.
    pub auto_bind_registry: bool,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// Per-request timeout for REST handlers.
    pub request_timeout: Duration,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            admin_address: default_admin(),
            registry_address: Address::derive(DEFAULT_REGISTRY_LABEL),
            auto_bind_registry: false,
            event_bus_capacity: 10_000,
            request_timeout: Duration::from_secs(30),
            log_format: LogFormat::Pretty,
        }
    }
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR`, `ADMIN_ADDRESS` or
    /// `REGISTRY_ADDRESS` is set but cannot be parsed.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr = match std::env::var("LISTEN_ADDR") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("invalid LISTEN_ADDR {raw:?}"))?,
            Err(_) => defaults.listen_addr,
        };

        let admin_address = parse_address("ADMIN_ADDRESS", defaults.admin_address)?;
        let registry_address = parse_address("REGISTRY_ADDRESS", defaults.registry_address)?;

        let auto_bind_registry =
            parse_env_bool("AUTO_BIND_REGISTRY", defaults.auto_bind_registry);
        let event_bus_capacity = parse_env("EVENT_BUS_CAPACITY", defaults.event_bus_capacity);
        let request_timeout = Duration::from_secs(parse_env(
            "REQUEST_TIMEOUT_SECS",
            defaults.request_timeout.as_secs(),
        ));
        let log_format = parse_env("LOG_FORMAT", defaults.log_format);

        Ok(Self {
            listen_addr,
            admin_address,
            registry_address,
            auto_bind_registry,
            event_bus_capacity,
            request_timeout,
            log_format,
        })
    }
}

/// `0x0000000000000000000000000000000000000001`.
fn default_admin() -> Address {
    let mut bytes = [0u8; 20];
    if let Some(last) = bytes.last_mut() {
        *last = 1;
    }
    Address::from_bytes(bytes)
}

fn parse_address(key: &str, default: Address) -> anyhow::Result<Address> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("invalid {key} {raw:?}")),
        Err(_) => Ok(default),
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key)
        .ok()
        .map(|v| v.to_ascii_lowercase())
        .as_deref()
    {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}
