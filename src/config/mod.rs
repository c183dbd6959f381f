// src/config/mod.rs
pub mod filter;

pub use filter::FilterConfig;

/// Directory for the file-backed boundary cache.
pub const ENV_STATE_DIR: &str = "ALERTS_STATE_DIR";
pub const DEFAULT_STATE_DIR: &str = "state";

pub fn state_dir() -> std::path::PathBuf {
    std::env::var(ENV_STATE_DIR)
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from(DEFAULT_STATE_DIR))
}
