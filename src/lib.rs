//! MT103 System Library
//!
//! A library for parsing SWIFT MT103 single customer credit transfers and
//! converting them into a canonical JSON structure.
//!
//! # Pipeline
//!
//! - [`blocks`]: split the raw text into blocks 1 to 5
//! - [`header`]: fixed-width basic/application headers, user header and trailer
//! - [`tokenizer`]: block 4 into ordered `(tag, value)` pairs
//! - [`fields`]: per-tag parsers selected from a static dispatch table
//! - [`canonical`]: ISO dates, dot-decimal amounts, `HH:MM:SS` times
//! - [`emitter`]: the `{"MT103": {...}}` JSON projection
//!
//! # Examples
//!
//! ## Converting a message to JSON
//!
//! ```
//! use mt103_system::{mt103_to_json, CanonicalConfig};
//!
//! let raw = "{1:F01TESTBANK0XXX0001000001}{2:I103TESTBANK1XXXN}{4:
//! :20:TEST-001
//! :32A:240101USD10000,00
//! :71F:EUR10,00
//! -}";
//! let json = mt103_to_json(raw, &CanonicalConfig::default())?;
//! assert_eq!(json["MT103"]["A"]["F20"]["F20_TRN"], "TEST-001");
//! assert_eq!(json["MT103"]["A"]["F71F"][0]["F71F_Amount"], "10.00");
//! # Ok::<(), mt103_system::Error>(())
//! ```
//!
//! ## Reading SWIFT values directly
//!
//! ```no_run
//! use std::fs::File;
//! use mt103_system::Message;
//!
//! let mut file = File::open("mt103.txt")?;
//! let message = Message::from_read(&mut file)?;
//! for time in message.text().time_indications() {
//!     println!("{} at {}", time.code, time.time);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod config;
pub mod types;
pub mod blocks;
pub mod header;
pub mod tokenizer;
pub mod fields;
pub mod message;
pub mod canonical;
pub mod emitter;
pub mod conversion;

use std::str::FromStr;

// Re-export commonly used types
pub use config::{CanonicalConfig, ConvertOptions};
pub use conversion::mt103_to_json;
pub use error::{Error, Result};
pub use fields::{Field, FieldValue};
pub use message::{Message, TextBlock};

/// Output formats of the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Canonical JSON document
    Json,
    /// SWIFT text rebuilt from the parsed blocks
    Swift,
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "swift" | "fin" | "mt103" | "mt" => Ok(Format::Swift),
            _ => Err(Error::InvalidFormat(s.to_string())),
        }
    }
}

impl Format {
    /// Get file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Swift => "fin",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("JSON".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("swift".parse::<Format>().unwrap(), Format::Swift);
        assert_eq!("mt103".parse::<Format>().unwrap(), Format::Swift);
        assert!("xml".parse::<Format>().is_err());
    }

    #[test]
    fn test_format_extension() {
        assert_eq!(Format::Json.extension(), "json");
        assert_eq!(Format::Swift.extension(), "fin");
    }
}
