//! Codec configuration
//!
//! This module provides the options that shape how values are rendered as text and how deep
//! the recursive decoders are allowed to go.

/// How a 64-bit integer is rendered when it is the whole text of an editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegerFormat {
    /// `0x` followed by lowercase hexadecimal digits
    Hex,
    /// Plain decimal digits
    Decimal,
}

/// Configuration for the text and binary codecs
///
/// Parsing accepts decimal and hexadecimal integers regardless of the configured output
/// format, so switching formats never makes previously rendered text invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Maximum nesting depth of types and values (default: 64)
    pub max_depth: usize,

    /// Rendering of `long` values
    pub long_format: IntegerFormat,

    /// Rendering of `pointer` values
    pub pointer_format: IntegerFormat,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_depth: 64,
            long_format: IntegerFormat::Hex,
            pointer_format: IntegerFormat::Hex,
        }
    }
}

impl CodecConfig {
    /// Creates a configuration that renders every integer in decimal
    #[must_use]
    pub fn decimal() -> Self {
        Self {
            long_format: IntegerFormat::Decimal,
            pointer_format: IntegerFormat::Decimal,
            ..Self::default()
        }
    }

    /// Sets the maximum nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
