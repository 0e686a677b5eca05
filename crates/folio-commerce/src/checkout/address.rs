//! Shipping address.

use crate::CommerceError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A free-text shipping address.
///
/// The storefront collects the address as one multi-line text field. The
/// only rule is that it is not blank; the text is otherwise sent verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShippingAddress(String);

impl ShippingAddress {
    /// Validate and wrap an address.
    pub fn parse(raw: impl Into<String>) -> Result<Self, CommerceError> {
        let raw = raw.into();
        if Self::is_blank(&raw) {
            return Err(CommerceError::EmptyShippingAddress);
        }
        Ok(Self(raw))
    }

    /// Check if an address string is empty or whitespace only.
    pub fn is_blank(raw: &str) -> bool {
        raw.trim().is_empty()
    }

    /// Get the address text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Format as single line.
    pub fn one_line(&self) -> String {
        self.0
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ShippingAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
