//! Runtime configuration parsed from environment variables.
//!
//! Every knob has a typed default; a missing or unparsable variable falls back
//! to it rather than failing startup.
//!
//! - `PORT`: listen port (3000)
//! - `STORE_BACKEND`: `file` (default) or `memory`
//! - `DATA_DIR`: project files directory for the file backend (`./data`)
//! - `AUTOSAVE_STEPS`: edits before a project is flushed (3)
//! - `PROJECT_FLUSH_INTERVAL_MS`: persistence worker period (1000)
//! - `DEFAULT_PROJECT`: project opened when none is named (`demo`)

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_AUTOSAVE_STEPS: usize = 3;
pub const DEFAULT_FLUSH_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_PROJECT: &str = "demo";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    File,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudioConfig {
    pub port: u16,
    pub store_backend: StoreBackend,
    pub data_dir: PathBuf,
    /// Mutations a project accumulates before the worker flushes it.
    pub autosave_steps: usize,
    pub flush_interval_ms: u64,
    pub default_project: String,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            store_backend: StoreBackend::File,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            autosave_steps: DEFAULT_AUTOSAVE_STEPS,
            flush_interval_ms: DEFAULT_FLUSH_INTERVAL_MS,
            default_project: DEFAULT_PROJECT.to_owned(),
        }
    }
}

impl StudioConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            port: env_parse("PORT", DEFAULT_PORT),
            store_backend: parse_backend(std::env::var("STORE_BACKEND").ok().as_deref()),
            data_dir: std::env::var("DATA_DIR").map_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from),
            autosave_steps: env_parse("AUTOSAVE_STEPS", DEFAULT_AUTOSAVE_STEPS).max(1),
            flush_interval_ms: env_parse("PROJECT_FLUSH_INTERVAL_MS", DEFAULT_FLUSH_INTERVAL_MS),
            default_project: std::env::var("DEFAULT_PROJECT").unwrap_or_else(|_| DEFAULT_PROJECT.to_owned()),
        }
    }
}

fn parse_backend(raw: Option<&str>) -> StoreBackend {
    match raw.map(str::trim) {
        Some(v) if v.eq_ignore_ascii_case("memory") => StoreBackend::Memory,
        _ => StoreBackend::File,
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
