use serde::Serialize;
use std::env;
use std::path::PathBuf;
use tracing::warn;

use crate::dashboard::DEFAULT_WIDTH;

pub const DEFAULT_SOURCE: &str = "social_media.csv";
pub const DEFAULT_OUT_DIR: &str = "out";

/// Settings for the `sharedash` binary, read from `SHAREDASH_*` variables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    /// CSV path or `http(s)` URL.
    pub source: String,
    pub width: f64,
    pub out_dir: PathBuf,
    /// Year to select after load instead of the first one.
    pub year: Option<String>,
    /// Platform to select after the year.
    pub platform: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            width: DEFAULT_WIDTH,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            year: None,
            platform: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let width = match get("SHAREDASH_WIDTH") {
            Some(raw) => match raw.parse::<f64>() {
                Ok(w) if w.is_finite() && w > 0.0 => w,
                _ => {
                    warn!(value = %raw, "invalid SHAREDASH_WIDTH, using default");
                    defaults.width
                }
            },
            None => defaults.width,
        };

        Self {
            source: get("SHAREDASH_SOURCE").unwrap_or(defaults.source),
            width,
            out_dir: get("SHAREDASH_OUT").map(PathBuf::from).unwrap_or(defaults.out_dir),
            year: get("SHAREDASH_YEAR"),
            platform: get("SHAREDASH_PLATFORM"),
        }
    }
}
