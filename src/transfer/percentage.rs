//! Share of each wallet's balance to send
//!
//! The backend receives a plain integer; 100 means "send the maximum the
//! wallet can afford". Amount arithmetic stays on the backend.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Integer the backend interprets as "max balance"
pub const MAX_PERCENTAGE: u8 = 100;

/// Percentage selection
///
/// Only the options the backend understands exist as variants, so an
/// arbitrary share cannot be built without going through `TryFrom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Percentage {
    Quarter,
    Half,
    ThreeQuarters,
    /// Everything sendable
    Max,
}

impl Percentage {
    /// Validate an optional raw selection
    pub fn from_selection(selection: Option<u32>) -> Result<Self, ValidationError> {
        let value = selection.ok_or(ValidationError::NoPercentageSelected)?;
        Self::try_from(value)
    }

    /// Integer forwarded to the backend
    pub fn value(&self) -> u8 {
        match self {
            Percentage::Quarter => 25,
            Percentage::Half => 50,
            Percentage::ThreeQuarters => 75,
            Percentage::Max => MAX_PERCENTAGE,
        }
    }

    pub fn is_max(&self) -> bool {
        matches!(self, Percentage::Max)
    }
}

impl TryFrom<u32> for Percentage {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            25 => Ok(Percentage::Quarter),
            50 => Ok(Percentage::Half),
            75 => Ok(Percentage::ThreeQuarters),
            100 => Ok(Percentage::Max),
            v => Err(ValidationError::UnsupportedPercentage(v.to_string())),
        }
    }
}

impl FromStr for Percentage {
    type Err = ValidationError;

    /// Accepts "25", "25%", "max" or "100"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::NoPercentageSelected);
        }
        if s.eq_ignore_ascii_case("max") {
            return Ok(Percentage::Max);
        }
        s.trim_end_matches('%')
            .parse::<u32>()
            .map_err(|_| ValidationError::UnsupportedPercentage(s.to_string()))
            .and_then(Percentage::try_from)
    }
}

impl Serialize for Percentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.value())
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Percentage::Max => f.write_str("MAX"),
            other => write!(f, "{}%", other.value()),
        }
    }
}
