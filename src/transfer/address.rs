//! EVM address validation

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

lazy_static::lazy_static! {
    /// `0x` followed by exactly 40 hex digits, either case
    static ref ADDRESS_PATTERN: Regex =
        Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("Invalid address pattern");
}

/// A syntactically valid EVM address (no checksum enforcement)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Validate user input. Surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingRecipient);
        }
        if !is_valid_address(trimmed) {
            return Err(ValidationError::InvalidAddress(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Check the `0x` + 40 hex digits shape
pub fn is_valid_address(candidate: &str) -> bool {
    ADDRESS_PATTERN.is_match(candidate)
}

impl FromStr for Address {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
