//! Application configuration management

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host (for the startup banner)
    pub host: Option<String>,

    /// Server port
    pub port: u16,

    /// Endpoint queried by the `hello` field
    pub hello_url: String,

    /// Timeout for the `hello` request
    pub hello_timeout: Duration,

    /// Interval between timestamp publishes
    pub tick_interval: Duration,

    /// Topic the ticker publishes to and `newMessage` subscribes to
    pub message_topic: String,

    /// Per-topic subscriber buffer
    pub pubsub_capacity: usize,

    /// Path read by the `readError` diagnostic field
    pub read_error_path: PathBuf,

    /// Keep the `code` extension on masked errors
    pub expose_error_codes: bool,
}

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_HELLO_URL: &str = "https://fourtonfish.com/hellosalut/?mode=auto";
pub const DEFAULT_MESSAGE_TOPIC: &str = "something_changed";
pub const DEFAULT_READ_ERROR_PATH: &str = "/does/not/exist";

impl Default for Config {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_PORT,
            hello_url: DEFAULT_HELLO_URL.to_string(),
            hello_timeout: Duration::from_secs(10),
            tick_interval: Duration::from_millis(1000),
            message_topic: DEFAULT_MESSAGE_TOPIC.to_string(),
            pubsub_capacity: 64,
            read_error_path: PathBuf::from(DEFAULT_READ_ERROR_PATH),
            expose_error_codes: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let tick_ms: u64 = parse_or(&lookup, "TICK_INTERVAL_MS", 1000)?;
        if tick_ms == 0 {
            anyhow::bail!("TICK_INTERVAL_MS must be greater than zero");
        }

        let hello_timeout_secs: u64 = parse_or(&lookup, "HELLO_TIMEOUT_SECS", 10)?;
        if hello_timeout_secs == 0 {
            anyhow::bail!("HELLO_TIMEOUT_SECS must be greater than zero");
        }

        let pubsub_capacity: usize = parse_or(&lookup, "PUBSUB_CAPACITY", defaults.pubsub_capacity)?;
        if pubsub_capacity == 0 {
            anyhow::bail!("PUBSUB_CAPACITY must be greater than zero");
        }

        Ok(Self {
            host: lookup("HOST").filter(|h| !h.is_empty()),

            port: parse_or(&lookup, "PORT", defaults.port)?,

            hello_url: lookup("HELLO_URL").unwrap_or(defaults.hello_url),

            hello_timeout: Duration::from_secs(hello_timeout_secs),

            tick_interval: Duration::from_millis(tick_ms),

            message_topic: lookup("MESSAGE_TOPIC").unwrap_or(defaults.message_topic),

            pubsub_capacity,

            read_error_path: lookup("READ_ERROR_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.read_error_path),

            expose_error_codes: lookup("GRAPHQL_EXPOSE_ERROR_CODES")
                .map(|v| parse_bool(&v).context("Invalid GRAPHQL_EXPOSE_ERROR_CODES"))
                .transpose()?
                .unwrap_or(defaults.expose_error_codes),
        })
    }

    /// Host shown in the startup banner and playground URL.
    pub fn public_host(&self) -> &str {
        self.host.as_deref().unwrap_or("localhost")
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {key}: {raw:?}")),
        None => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected a boolean, got {other:?}"),
    }
}
