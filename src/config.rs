//! Conversion settings.

use crate::Format;

/// Century added to two-digit SWIFT years. Dates before 2000 are not representable.
pub const DEFAULT_CENTURY_BASE: i32 = 2000;

/// Settings for the canonicalization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalConfig {
    /// Base year added to the `YY` part of a `YYMMDD` date.
    pub century_base: i32,
}

impl Default for CanonicalConfig {
    fn default() -> Self {
        Self {
            century_base: DEFAULT_CENTURY_BASE,
        }
    }
}

/// Settings for file and batch conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Canonicalization settings.
    pub canonical: CanonicalConfig,
    /// Output format.
    pub format: Format,
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            canonical: CanonicalConfig::default(),
            format: Format::Json,
            pretty: true,
        }
    }
}
