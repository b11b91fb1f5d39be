//! Resolution policy: the time unit one grid column stands for.
//!
//! Each resolution is bound to a fixed `(increment_days, base_unit_width)`
//! pair. Month resolution steps a flat 30 days; ticks drift against real
//! calendar month boundaries over long ranges.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::PtlError;

/// Time unit represented by one grid column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Day,
    #[default]
    Week,
    Month,
}

impl Resolution {
    /// Every resolution, in selector order.
    pub const ALL: [Self; 3] = [Self::Day, Self::Week, Self::Month];

    /// Calendar days covered by one tick.
    #[must_use]
    pub const fn increment_days(self) -> i64 {
        match self {
            Self::Day => 1,
            Self::Week => 7,
            Self::Month => 30,
        }
    }

    /// Width of one tick in pixels at zoom factor 1.0.
    #[must_use]
    pub const fn base_unit_width(self) -> f64 {
        match self {
            Self::Day => 30.0,
            Self::Week => 120.0,
            Self::Month => 200.0,
        }
    }

    /// Lowercase selector label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Resolution {
    type Err = PtlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "days" | "d" => Ok(Self::Day),
            "week" | "weeks" | "w" => Ok(Self::Week),
            "month" | "months" | "m" => Ok(Self::Month),
            _ => Err(PtlError::UnknownResolution {
                value: s.to_string(),
            }),
        }
    }
}
