//! Session settings.
//!
//! Layered: built-in defaults, then an optional JSON file, then
//! `WORD_GRAPH_*` environment variables. Every layer is range-checked by
//! [`SessionConfig::validate`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use word_graph_core::PageRankConfig;

use crate::error::{Result, SessionError};
use crate::util::{check_range, parse_bool};

pub const ENV_PREFIX: &str = "WORD_GRAPH_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Refuse to load files larger than this.
    pub max_file_mb: u64,
    pub damping: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
    /// Fixed seed for walks; `None` seeds from the OS.
    pub walk_seed: Option<u64>,
    /// Pause after each walk step, so a viewer can follow along.
    pub walk_step_delay_ms: u64,
    /// Reload when the source file changes on disk.
    pub auto_reload: bool,
    /// Minimum seconds between auto-reloads. 0 disables debouncing.
    pub reload_debounce_sec: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_file_mb: 64,
            damping: 0.85,
            tolerance: 1e-10,
            max_iterations: 100,
            walk_seed: None,
            walk_step_delay_ms: 0,
            auto_reload: true,
            reload_debounce_sec: 5,
        }
    }
}

impl SessionConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SessionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| SessionError::io(path, e))?;
        Self::from_json_str(&raw)
    }

    /// Defaults, overridden by the process environment.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env()
    }

    /// Apply `WORD_GRAPH_*` overrides from the process environment.
    pub fn with_env(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(format!("{}{}", ENV_PREFIX, key)).ok())
    }

    /// Apply overrides from `lookup`, keyed by the upper-case field name
    /// without prefix (`DAMPING`, `WALK_SEED`, ...).
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("MAX_FILE_MB") {
            self.max_file_mb = parse_number(&v, "max_file_mb")?;
        }
        if let Some(v) = lookup("DAMPING") {
            self.damping = parse_number(&v, "damping")?;
        }
        if let Some(v) = lookup("TOLERANCE") {
            self.tolerance = parse_number(&v, "tolerance")?;
        }
        if let Some(v) = lookup("MAX_ITERATIONS") {
            self.max_iterations = parse_number(&v, "max_iterations")?;
        }
        if let Some(v) = lookup("WALK_SEED") {
            self.walk_seed = if v.trim().is_empty() {
                None
            } else {
                Some(parse_number(&v, "walk_seed")?)
            };
        }
        if let Some(v) = lookup("WALK_STEP_DELAY_MS") {
            self.walk_step_delay_ms = parse_number(&v, "walk_step_delay_ms")?;
        }
        if let Some(v) = lookup("AUTO_RELOAD") {
            self.auto_reload = parse_bool(&v, "auto_reload")?;
        }
        if let Some(v) = lookup("RELOAD_DEBOUNCE_SEC") {
            self.reload_debounce_sec = parse_number(&v, "reload_debounce_sec")?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        check_range(self.max_file_mb, 1, 4096, "max_file_mb")?;
        check_range(self.damping, 0.0, 1.0, "damping")?;
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(SessionError::Config(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        check_range(self.max_iterations, 1, 100_000, "max_iterations")?;
        check_range(self.walk_step_delay_ms, 0, 60_000, "walk_step_delay_ms")?;
        check_range(self.reload_debounce_sec, 0, 3600, "reload_debounce_sec")?;
        Ok(())
    }

    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_mb * 1024 * 1024
    }

    pub fn pagerank(&self) -> PageRankConfig {
        PageRankConfig {
            damping: self.damping,
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
        }
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str, name: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| {
        SessionError::Config(format!("{} must be a number, got '{}'", name, raw.trim()))
    })
}
