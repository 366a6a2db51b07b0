//! Error types for the canonical Huffman engine.
//!
//! All operations return structured errors rather than panicking, including
//! when fed corrupt codebooks or misaligned bit streams.

use thiserror::Error;

/// Top-level error type for all operations in the crate.
///
/// Each variant corresponds to a specific failure domain:
/// - Bit I/O: the underlying bit stream ran dry or was misused
/// - Codebook: a codebook is malformed (the "invalid codebook" kind)
/// - Codec: a symbol could not be written or read (the "unknown symbol" kind)
/// - Config: a limit in [`CodecConfig`](crate::config::CodecConfig) is unusable
#[derive(Debug, Error)]
pub enum Error {
    /// Bit I/O operation failed (e.g., reading past end of buffer)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Codebook construction or deserialization failed
    #[error("invalid codebook: {0}")]
    Codebook(#[from] CodebookError),

    /// Symbol encode/decode failure
    #[error("huffman codec error: {0}")]
    Codec(#[from] CodecError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True when the bit source ran out of input.
    ///
    /// At a codeword boundary this may be a legitimate end of stream; in the
    /// middle of a codeword it means the stream was cut short.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Error::BitIo(BitIoError::UnexpectedEof))
    }

    /// True for every [`CodebookError`].
    ///
    /// This covers codebooks rejected while parsing or validating a length
    /// table, and also the construction failures of
    /// [`Codebook::from_weights`](crate::huffman::Codebook::from_weights)
    /// (`CodeLengthTooLong`, `InvalidSymbolCount`), since both mean no usable
    /// codebook exists. Match on [`Error::Codebook`] to tell them apart.
    pub fn is_invalid_codebook(&self) -> bool {
        matches!(self, Error::Codebook(_))
    }

    /// True when a symbol was outside the code on either side of the wire.
    pub fn is_unknown_symbol(&self) -> bool {
        matches!(
            self,
            Error::Codec(CodecError::UnknownSymbol { .. } | CodecError::UnknownCode { .. })
        )
    }
}

/// Bit-level I/O errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BitIoError {
    /// Attempted to read past the end of the buffer
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// Invalid bit count (more than 64 bits in one call)
    #[error("invalid bit count: {0}")]
    InvalidBitCount(usize),
}

/// Codebook errors.
///
/// Raised when a codebook cannot be parsed from its wire form or when a set
/// of code lengths cannot describe a prefix code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodebookError {
    /// Buffer ended in the middle of a varint
    #[error("truncated varint at byte {offset}")]
    Truncated { offset: usize },

    /// Varint runs past 10 bytes or overflows 64 bits
    #[error("malformed varint at byte {offset}")]
    Malformed { offset: usize },

    /// Declared symbol count is unusable
    #[error("invalid symbol count {count} (limit {limit})")]
    InvalidSymbolCount { count: i64, limit: usize },

    /// A code length is negative or longer than allowed
    #[error("symbol {symbol} has invalid code length {length} (max {max})")]
    InvalidLength { symbol: usize, length: i64, max: u8 },

    /// The trailing EOF entry has no code
    #[error("EOF symbol {symbol} has no code")]
    EofNotCoded { symbol: usize },

    /// Bytes left over after the last code length
    #[error("{remaining} trailing bytes after codebook")]
    TrailingBytes { remaining: usize },

    /// Code lengths violate the Kraft inequality
    #[error("code lengths over-subscribe the code space")]
    Oversubscribed,

    /// No symbol has a non-zero code length
    #[error("no coded symbols")]
    NoCodedSymbols,

    /// Huffman tree is deeper than a codeword can hold
    #[error("code length {length} exceeds maximum {max}")]
    CodeLengthTooLong { length: u32, max: u8 },
}

/// Symbol encode/decode errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Symbol id outside the alphabet, or a symbol with no codeword
    #[error("unknown symbol {symbol:#x}")]
    UnknownSymbol { symbol: u32 },

    /// Accumulated bits matched no codeword up to the longest length
    #[error("no codeword matches {bits} bits read (code {code:#x})")]
    UnknownCode { code: u64, bits: u32 },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_predicates() {
        let eof: Error = BitIoError::UnexpectedEof.into();
        assert!(eof.is_end_of_stream());
        assert!(!eof.is_unknown_symbol());

        let bad: Error = CodebookError::Truncated { offset: 3 }.into();
        assert!(bad.is_invalid_codebook());
        assert!(!bad.is_end_of_stream());

        let unknown: Error = CodecError::UnknownSymbol { symbol: 9 }.into();
        assert!(unknown.is_unknown_symbol());
        assert!(!unknown.is_invalid_codebook());

        let stray: Error = CodecError::UnknownCode {
            code: 0b11,
            bits: 2,
        }
        .into();
        assert!(stray.is_unknown_symbol());

        // construction failures share the codebook kind
        let deep: Error = CodebookError::CodeLengthTooLong {
            length: 65,
            max: 64,
        }
        .into();
        assert!(deep.is_invalid_codebook());
        let empty: Error = CodebookError::NoCodedSymbols.into();
        assert!(empty.is_invalid_codebook());
    }

    #[test]
    fn test_display() {
        let err: Error = CodebookError::InvalidLength {
            symbol: 4,
            length: -1,
            max: 64,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "invalid codebook: symbol 4 has invalid code length -1 (max 64)"
        );
    }
}
