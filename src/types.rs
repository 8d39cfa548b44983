//! Value types shared by the field parsers.
//!
//! Dates and amounts are kept exactly as they appear in the message
//! (`YYMMDD`, comma decimal separator). Interpreting them is the job of
//! the [`canonical`](crate::canonical) module.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A `YYMMDD` date as written in the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwiftDate(String);

impl SwiftDate {
    /// Accept exactly six ASCII digits. Calendar validity is checked later.
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() == 6 && s.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(s.to_string()))
        } else {
            None
        }
    }

    /// The original six digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SwiftDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An amount in SWIFT notation, e.g. `1234,56`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Amount(String);

impl Amount {
    /// Accept digits with at most one comma, and at least one digit before it.
    pub fn parse(s: &str) -> Option<Self> {
        let (int_part, frac_part) = match s.split_once(',') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };
        let digits_only = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
        if int_part.is_empty() || !digits_only(int_part) || !digits_only(frac_part) {
            return None;
        }
        Some(Self(s.to_string()))
    }

    /// The amount exactly as written.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Three-letter ISO 4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Currency(String);

impl Currency {
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() == 3 && s.bytes().all(|b| b.is_ascii_uppercase()) {
            Some(Self(s.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// UTC offset sign in a time indication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sign {
    Plus,
    Minus,
}

impl FromStr for Sign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Sign::Plus),
            "-" => Ok(Sign::Minus),
            _ => Err(format!("Invalid offset sign: {}", s)),
        }
    }
}

impl Sign {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sign::Plus => "+",
            Sign::Minus => "-",
        }
    }
}

/// One `n/details` line of a structured party field (50F, 59F).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberedLine {
    #[serde(rename = "Line")]
    pub number: u8,
    #[serde(rename = "Details")]
    pub details: String,
}

/// Check the shape of a BIC: 8 or 11 alphanumerics, the first six letters.
pub fn is_bic(s: &str) -> bool {
    (s.len() == 8 || s.len() == 11)
        && s.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        && s.bytes().take(6).all(|b| b.is_ascii_uppercase())
}
