// src/config.rs

use std::env;
use std::net::SocketAddr;

use chrono::TimeDelta;
use dotenvy::dotenv;

/// Maximum number of characters of source material sent to the generator.
pub const MAX_CONTENT_CHARS: usize = 20_000;

/// Bounds for the number of questions a user may request.
pub const MIN_QUESTIONS: u8 = 1;
pub const MAX_QUESTIONS: u8 = 20;
pub const DEFAULT_QUESTIONS: u8 = 5;

const DEFAULT_SESSION_TTL_MINUTES: i64 = 120;

pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-preview-09-2025:generateContent";

#[derive(Debug, Clone)]
pub struct Config {
    /// Access key for the generation endpoint. `None` disables generation.
    pub gemini_api_key: Option<String>,
    pub gemini_api_url: String,
    pub generation_timeout_secs: u64,
    /// Idle sessions older than this are evicted.
    pub session_ttl_minutes: i64,
    pub max_upload_bytes: usize,
    pub bind_addr: SocketAddr,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_api_url: DEFAULT_GEMINI_API_URL.to_string(),
            generation_timeout_secs: 120,
            session_ttl_minutes: DEFAULT_SESSION_TTL_MINUTES,
            max_upload_bytes: 10 * 1024 * 1024,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let defaults = Self::default();

        let gemini_api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let gemini_api_url = env::var("GEMINI_API_URL").unwrap_or(defaults.gemini_api_url);

        let generation_timeout_secs = parse_var("GENERATION_TIMEOUT_SECS")
            .unwrap_or(defaults.generation_timeout_secs);

        let session_ttl_minutes = parse_var("SESSION_TTL_MINUTES")
            .filter(|&minutes| ttl_from_minutes(minutes).is_some())
            .unwrap_or(defaults.session_ttl_minutes);

        let max_upload_bytes = parse_var("MAX_UPLOAD_BYTES").unwrap_or(defaults.max_upload_bytes);

        let bind_addr = parse_var("BIND_ADDR").unwrap_or(defaults.bind_addr);

        let rust_log = env::var("RUST_LOG").unwrap_or(defaults.rust_log);

        Self {
            gemini_api_key,
            gemini_api_url,
            generation_timeout_secs,
            session_ttl_minutes,
            max_upload_bytes,
            bind_addr,
            rust_log,
        }
    }

    /// Idle timeout for sessions. Falls back to the default when the configured
    /// value is not a positive, representable duration.
    pub fn session_ttl(&self) -> TimeDelta {
        ttl_from_minutes(self.session_ttl_minutes)
            .unwrap_or(TimeDelta::minutes(DEFAULT_SESSION_TTL_MINUTES))
    }
}

fn ttl_from_minutes(minutes: i64) -> Option<TimeDelta> {
    if minutes <= 0 {
        return None;
    }
    TimeDelta::try_minutes(minutes)
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
