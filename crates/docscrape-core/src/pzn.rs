//! Canonical product numbers (PZN) and normalization of freeform input.
//!
//! Users paste lists copied from spreadsheets, order forms or e-mails, so a
//! single token may carry labels (`"PZN: 1234567"`), spaces or punctuation.
//! Everything except the digits is discarded, and short numbers are
//! left-padded with zeros, which is how leading zeros get lost in the first
//! place (spreadsheet cells formatted as numbers).

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::CoreError;

/// Minimum width of a canonical PZN. Shorter digit strings are zero-padded.
pub const PZN_WIDTH: usize = 8;

/// Placeholder that URL templates use for the product number.
pub const PZN_PLACEHOLDER: &str = "{pzn}";

/// A canonical product number: ASCII digits only, at least [`PZN_WIDTH`] long.
///
/// Digit strings longer than [`PZN_WIDTH`] are kept as-is; nothing is ever
/// truncated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Pzn(String);

impl Pzn {
    /// Normalizes a single raw token into a `Pzn`.
    ///
    /// Returns `None` when the token contains no digits at all.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        let digits: String = token.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return None;
        }
        Some(Self(format!("{digits:0>width$}", width = PZN_WIDTH)))
    }

    /// Parses an already-canonical product number.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPzn`] if `s` contains anything other than
    /// ASCII digits or is shorter than [`PZN_WIDTH`].
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if s.len() < PZN_WIDTH || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::InvalidPzn(s.to_owned()));
        }
        Ok(Self(s.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitutes every [`PZN_PLACEHOLDER`] in `template`.
    #[must_use]
    pub fn fill_template(&self, template: &str) -> String {
        template.replace(PZN_PLACEHOLDER, &self.0)
    }
}

impl fmt::Display for Pzn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Pzn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Turns freeform user input into an ordered, duplicate-free list of PZNs.
///
/// Tokens are separated by commas and/or newlines. Each non-empty token is
/// stripped to its digits and zero-padded; tokens without digits are dropped.
/// The first occurrence of each PZN wins, so output order follows input order.
///
/// An empty result means there is nothing to fetch; it is not an error.
#[must_use]
pub fn normalize_pzns(raw: &str) -> Vec<Pzn> {
    let mut seen = HashSet::new();
    raw.replace(',', "\n")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(Pzn::from_token)
        .filter(|pzn| seen.insert(pzn.clone()))
        .collect()
}

#[cfg(test)]
#[path = "pzn_test.rs"]
mod tests;
