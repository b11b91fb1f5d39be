//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{PtlError, Result};
use crate::timeline::resolution::Resolution;

/// Longest padding / urgency window accepted, in days.
const MAX_WINDOW_DAYS: u32 = 3_660;

/// Full planning timeline configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub timeline: TimelineConfig,
    pub paths: PathsConfig,
}

/// Range padding, empty-set fallback, urgency, and startup resolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimelineConfig {
    /// Days added before the earliest and after the latest item date.
    pub padding_days: u32,
    /// Half-width of the `today ± n` window used when there are no items.
    pub fallback_half_window_days: u32,
    /// A delivery due within this many days (inclusive) is highlighted as urgent.
    pub urgency_window_days: u32,
    /// Resolution selected when a view is mounted.
    pub default_resolution: Resolution,
}

/// Filesystem paths used by the `ptl` binary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    pub config_file: PathBuf,
    pub jsonl_log: PathBuf,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            padding_days: 7,
            fallback_half_window_days: 30,
            urgency_window_days: 3,
            default_resolution: Resolution::Week,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let home_dir = env::var_os("HOME").map_or_else(
            || {
                tracing::warn!("HOME not set, falling back to /tmp for ptl paths");
                PathBuf::from("/tmp")
            },
            PathBuf::from,
        );
        let cfg = home_dir.join(".config").join("ptl").join("config.toml");
        let data = home_dir.join(".local").join("share").join("ptl");
        Self {
            config_file: cfg,
            jsonl_log: data.join("activity.jsonl"),
        }
    }
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathsConfig::default().config_file
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| PtlError::Io {
                path: path_buf.clone(),
                source,
            })?;
            let parsed: Self = toml::from_str(&raw)?;
            parsed
        } else if is_explicit_path {
            return Err(PtlError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.paths.config_file = path_buf;
        cfg.apply_env_overrides_from(env_var)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Deterministic hash of the effective config for logging.
    ///
    /// FNV-1a over the JSON form, stable across processes and toolchains.
    pub fn stable_hash(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in canonical.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        Ok(format!("{hash:016x}"))
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("PTL_TIMELINE_PADDING_DAYS") {
            self.timeline.padding_days = parse_env_u32("PTL_TIMELINE_PADDING_DAYS", &raw)?;
        }

        if let Some(raw) = lookup("PTL_TIMELINE_FALLBACK_HALF_WINDOW_DAYS") {
            self.timeline.fallback_half_window_days =
                parse_env_u32("PTL_TIMELINE_FALLBACK_HALF_WINDOW_DAYS", &raw)?;
        }

        if let Some(raw) = lookup("PTL_TIMELINE_URGENCY_WINDOW_DAYS") {
            self.timeline.urgency_window_days =
                parse_env_u32("PTL_TIMELINE_URGENCY_WINDOW_DAYS", &raw)?;
        }

        if let Some(raw) = lookup("PTL_TIMELINE_DEFAULT_RESOLUTION") {
            self.timeline.default_resolution =
                raw.parse::<Resolution>()
                    .map_err(|error| PtlError::ConfigParse {
                        context: "env",
                        details: format!("PTL_TIMELINE_DEFAULT_RESOLUTION={raw:?}: {error}"),
                    })?;
        }

        if let Some(raw) = lookup("PTL_PATHS_JSONL_LOG") {
            self.paths.jsonl_log = PathBuf::from(raw);
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.timeline.fallback_half_window_days == 0 {
            return Err(PtlError::InvalidConfig {
                details: "timeline.fallback_half_window_days must be >= 1".to_string(),
            });
        }

        for (name, val) in [
            ("padding_days", self.timeline.padding_days),
            (
                "fallback_half_window_days",
                self.timeline.fallback_half_window_days,
            ),
            ("urgency_window_days", self.timeline.urgency_window_days),
        ] {
            if val > MAX_WINDOW_DAYS {
                return Err(PtlError::InvalidConfig {
                    details: format!("timeline.{name} must be <= {MAX_WINDOW_DAYS}, got {val}"),
                });
            }
        }

        if self.paths.jsonl_log.as_os_str().is_empty() {
            return Err(PtlError::InvalidConfig {
                details: "paths.jsonl_log must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_env_u32(name: &str, raw: &str) -> Result<u32> {
    raw.trim()
        .parse::<u32>()
        .map_err(|error| PtlError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })
}
