//! Limits applied when reading codebooks from untrusted sources.
//!
//! The wire format carries no magic number or checksum, so a corrupt or
//! hostile buffer can claim any symbol count and any code length. Decoding
//! goes through a [`CodecConfig`] that bounds both before anything is
//! allocated.

use crate::error::{Error, Result};
use crate::huffman::MAX_CODE_LENGTH;

/// Default bound on the number of codebook entries (a 16-bit alphabet + EOF).
pub const DEFAULT_MAX_SYMBOLS: usize = (1 << 16) + 1;

/// Bounds for codebook deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CodecConfig {
    /// Maximum number of entries, EOF included
    pub max_symbols: usize,

    /// Maximum accepted code length in bits (1-64)
    pub max_code_length: u8,
}

impl CodecConfig {
    /// Limits for a byte alphabet: 256 data symbols plus EOF.
    pub fn byte_alphabet() -> Self {
        Self {
            max_symbols: 257,
            max_code_length: MAX_CODE_LENGTH,
        }
    }

    /// Set the maximum number of codebook entries.
    pub fn with_max_symbols(mut self, max_symbols: usize) -> Self {
        self.max_symbols = max_symbols;
        self
    }

    /// Set the maximum accepted code length.
    pub fn with_max_code_length(mut self, max_code_length: u8) -> Self {
        self.max_code_length = max_code_length;
        self
    }

    /// Check that the limits can describe at least one codebook.
    pub fn validate(&self) -> Result<()> {
        if self.max_symbols == 0 {
            return Err(Error::Config("max_symbols must be at least 1".to_string()));
        }
        if self.max_code_length == 0 || self.max_code_length > MAX_CODE_LENGTH {
            return Err(Error::Config(format!(
                "max_code_length must be in 1..={}, got {}",
                MAX_CODE_LENGTH, self.max_code_length
            )));
        }
        Ok(())
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_symbols: DEFAULT_MAX_SYMBOLS,
            max_code_length: MAX_CODE_LENGTH,
        }
    }
}
