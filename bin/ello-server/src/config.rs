//! Server configuration, loaded from environment variables at startup.

use std::time::Duration;

use ello_core::service::{DEFAULT_CHUNK_DELAY, DEFAULT_STREAM_BUFFER};
use ello_core::ServiceConfig;

/// Runtime configuration for ello-server.
///
/// Every field has a default so the server runs with no environment set.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:50051"`).
    pub bind_address: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,h2=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Simulated processing time between streamed chunks.
    pub chunk_delay: Duration,

    /// Per-call capacity of the streamed chunk channel.
    pub stream_buffer: usize,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let parse = |key: &str| get(key).and_then(|v| v.trim().parse::<u64>().ok());
        Self {
            bind_address: get("ELLO_BIND").unwrap_or_else(|| "0.0.0.0:50051".to_owned()),
            log_level: get("ELLO_LOG").unwrap_or_else(|| "info".to_owned()),
            log_json: get("ELLO_LOG_JSON")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            chunk_delay: parse("ELLO_CHUNK_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_CHUNK_DELAY),
            stream_buffer: parse("ELLO_STREAM_BUFFER")
                .and_then(|v| usize::try_from(v).ok())
                .unwrap_or(DEFAULT_STREAM_BUFFER),
        }
    }

    /// The subset of settings the service itself consumes.
    pub fn service(&self) -> ServiceConfig {
        ServiceConfig {
            chunk_delay: self.chunk_delay,
            stream_buffer: self.stream_buffer,
        }
    }
}
