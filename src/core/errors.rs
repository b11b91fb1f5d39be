//! PTL-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, PtlError>;

/// Top-level error type for the planning timeline.
#[derive(Debug, Error)]
pub enum PtlError {
    #[error("[PTL-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[PTL-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[PTL-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[PTL-2001] invalid date in {field} of item {item_id}: {value:?}")]
    InvalidDate {
        item_id: String,
        field: &'static str,
        value: String,
    },

    #[error("[PTL-2002] unknown resolution: {value:?} (expected day, week or month)")]
    UnknownResolution { value: String },

    #[error("[PTL-2003] unknown schedule item: {item_id}")]
    UnknownItem { item_id: String },

    #[error("[PTL-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[PTL-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PtlError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "PTL-1001",
            Self::MissingConfig { .. } => "PTL-1002",
            Self::ConfigParse { .. } => "PTL-1003",
            Self::InvalidDate { .. } => "PTL-2001",
            Self::UnknownResolution { .. } => "PTL-2002",
            Self::UnknownItem { .. } => "PTL-2003",
            Self::Serialization { .. } => "PTL-2101",
            Self::Io { .. } => "PTL-3002",
        }
    }

    /// Whether the failure came from caller-supplied data or configuration
    /// rather than the environment.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig { .. }
                | Self::MissingConfig { .. }
                | Self::ConfigParse { .. }
                | Self::InvalidDate { .. }
                | Self::UnknownResolution { .. }
                | Self::UnknownItem { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for PtlError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for PtlError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
