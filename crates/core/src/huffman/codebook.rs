//! Codebook: per-symbol code lengths and their wire format.
//!
//! # Wire Format
//!
//! ```text
//! varint  symbol_count
//! varint  length[0]                 // 0 = symbol unused
//! varint  length[1]
//! ...
//! varint  length[symbol_count - 1]  // EOF symbol, always >= 1
//! ```
//!
//! Every varint is a signed zig-zag LEB128 integer: `n` is stored as
//! `(n << 1) ^ (n >> 63)`, seven bits per byte, low group first, high bit
//! set on every byte but the last. There is no magic number, version or
//! checksum.
//!
//! # Validation
//!
//! A `Codebook` value always satisfies:
//! - at least one entry, the last one being the EOF symbol with length >= 1
//! - every length is at most [`MAX_CODE_LENGTH`]
//! - the lengths satisfy the Kraft inequality (they describe a prefix code)

use super::canonical::check_kraft;
use super::{tree, Symbol, EOF, MAX_CODE_LENGTH};
use crate::config::CodecConfig;
use crate::error::{CodebookError, Error, Result};
use tracing::{debug, warn};

/// Longest encoding of a 64-bit varint.
const MAX_VARINT_LEN: usize = 10;

/// Code lengths indexed by symbol id, EOF last.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<u8>", into = "Vec<u8>")
)]
pub struct Codebook {
    lengths: Vec<u8>,
}

impl Codebook {
    /// Build the optimal codebook for `weights`.
    ///
    /// Symbol `weights.len()` becomes the EOF symbol. Symbols with weight 0
    /// get length 0.
    ///
    /// # Errors
    /// - `CodebookError::InvalidSymbolCount` if the alphabet collides with
    ///   the [`EOF`] sentinel
    /// - `CodebookError::CodeLengthTooLong` if the tree is deeper than
    ///   [`MAX_CODE_LENGTH`]
    pub fn from_weights(weights: &[u64]) -> Result<Self> {
        if weights.len() >= EOF as usize {
            return Err(CodebookError::InvalidSymbolCount {
                count: weights.len() as i64 + 1,
                limit: EOF as usize,
            }
            .into());
        }

        let lengths = tree::code_lengths(weights)
            .into_iter()
            .map(|depth| {
                u8::try_from(depth)
                    .ok()
                    .filter(|&len| len <= MAX_CODE_LENGTH)
                    .ok_or(CodebookError::CodeLengthTooLong {
                        length: depth,
                        max: MAX_CODE_LENGTH,
                    })
            })
            .collect::<std::result::Result<Vec<u8>, _>>()?;

        let codebook = Self { lengths };
        debug!(
            alphabet_size = codebook.alphabet_size(),
            coded = codebook.coded().count(),
            max_length = codebook.max_length(),
            "built codebook from weights"
        );
        Ok(codebook)
    }

    /// Wrap an explicit length table (EOF last), validating it.
    pub fn from_lengths(lengths: Vec<u8>) -> Result<Self> {
        validate(&lengths, MAX_CODE_LENGTH)?;
        Ok(Self { lengths })
    }

    /// Serialize to the wire format.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.lengths.len() + MAX_VARINT_LEN);
        put_varint(&mut buf, self.lengths.len() as i64);
        for &len in &self.lengths {
            put_varint(&mut buf, i64::from(len));
        }
        buf
    }

    /// Parse a complete codebook using the default [`CodecConfig`] limits.
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        Self::deserialize_with(bytes, &CodecConfig::default())
    }

    /// Parse a complete codebook; `bytes` must hold nothing else.
    pub fn deserialize_with(bytes: &[u8], config: &CodecConfig) -> Result<Self> {
        let (codebook, used) = Self::read_prefix(bytes, config)?;
        if used != bytes.len() {
            let err = CodebookError::TrailingBytes {
                remaining: bytes.len() - used,
            };
            warn!(error = %err, "rejected codebook");
            return Err(err.into());
        }
        Ok(codebook)
    }

    /// Parse a codebook from the front of `bytes`.
    ///
    /// Returns the codebook and the number of bytes it occupied, so a
    /// codebook can be followed by payload in the same buffer.
    pub fn read_prefix(bytes: &[u8], config: &CodecConfig) -> Result<(Self, usize)> {
        config.validate()?;
        parse(bytes, config).map_err(|err| {
            warn!(error = %err, len = bytes.len(), "rejected codebook");
            err.into()
        })
    }

    /// Number of data symbols, EOF excluded.
    pub fn alphabet_size(&self) -> usize {
        self.lengths.len() - 1
    }

    /// Number of entries, EOF included.
    pub fn symbol_count(&self) -> usize {
        self.lengths.len()
    }

    /// Internal id of the EOF symbol.
    pub fn eof_symbol(&self) -> Symbol {
        self.alphabet_size() as Symbol
    }

    /// Code length of `symbol` (the [`EOF`] sentinel is accepted), 0 when
    /// the symbol is unused or outside the alphabet.
    pub fn length(&self, symbol: Symbol) -> u8 {
        let symbol = if symbol == EOF {
            self.eof_symbol()
        } else {
            symbol
        };
        self.lengths.get(symbol as usize).copied().unwrap_or(0)
    }

    /// All lengths indexed by symbol id.
    pub fn lengths(&self) -> &[u8] {
        &self.lengths
    }

    /// `(symbol, length)` for every coded symbol, in id order.
    pub fn coded(&self) -> impl Iterator<Item = (Symbol, u8)> + '_ {
        self.lengths
            .iter()
            .enumerate()
            .filter(|(_, &len)| len > 0)
            .map(|(symbol, &len)| (symbol as Symbol, len))
    }

    /// Longest code length in use.
    pub fn max_length(&self) -> u8 {
        self.lengths.iter().copied().max().unwrap_or(0)
    }

    /// True when the lengths exactly fill the code space.
    ///
    /// Every codebook built from weights is complete except the degenerate
    /// one where EOF is the only coded symbol.
    pub fn is_complete(&self) -> bool {
        check_kraft(&self.lengths).unwrap_or(false)
    }
}

impl TryFrom<Vec<u8>> for Codebook {
    type Error = Error;

    fn try_from(lengths: Vec<u8>) -> Result<Self> {
        Self::from_lengths(lengths)
    }
}

impl From<Codebook> for Vec<u8> {
    fn from(codebook: Codebook) -> Self {
        codebook.lengths
    }
}

fn parse(
    bytes: &[u8],
    config: &CodecConfig,
) -> std::result::Result<(Codebook, usize), CodebookError> {
    let mut pos = 0;
    let count = read_varint(bytes, &mut pos)?;

    let limit = config.max_symbols.min(EOF as usize);
    if count <= 0 || count as u64 > limit as u64 {
        return Err(CodebookError::InvalidSymbolCount { count, limit });
    }

    // Every length takes at least one byte
    let count = count as usize;
    if count > bytes.len() - pos {
        return Err(CodebookError::Truncated { offset: bytes.len() });
    }

    let mut lengths = Vec::with_capacity(count);
    for symbol in 0..count {
        let length = read_varint(bytes, &mut pos)?;
        match u8::try_from(length) {
            Ok(len) if len <= config.max_code_length => lengths.push(len),
            _ => {
                return Err(CodebookError::InvalidLength {
                    symbol,
                    length,
                    max: config.max_code_length,
                })
            }
        }
    }

    validate(&lengths, config.max_code_length)?;
    Ok((Codebook { lengths }, pos))
}

fn validate(lengths: &[u8], max_code_length: u8) -> std::result::Result<(), CodebookError> {
    let Some(&eof_len) = lengths.last() else {
        return Err(CodebookError::InvalidSymbolCount {
            count: 0,
            limit: EOF as usize,
        });
    };
    if lengths.len() > EOF as usize {
        return Err(CodebookError::InvalidSymbolCount {
            count: lengths.len() as i64,
            limit: EOF as usize,
        });
    }
    if let Some((symbol, &len)) = lengths
        .iter()
        .enumerate()
        .find(|(_, &len)| len > max_code_length)
    {
        return Err(CodebookError::InvalidLength {
            symbol,
            length: i64::from(len),
            max: max_code_length,
        });
    }
    if eof_len == 0 {
        return Err(CodebookError::EofNotCoded {
            symbol: lengths.len() - 1,
        });
    }
    check_kraft(lengths)?;
    Ok(())
}

fn put_varint(buf: &mut Vec<u8>, value: i64) {
    let mut ux = ((value << 1) ^ (value >> 63)) as u64;
    while ux >= 0x80 {
        buf.push(ux as u8 | 0x80);
        ux >>= 7;
    }
    buf.push(ux as u8);
}

fn read_varint(bytes: &[u8], pos: &mut usize) -> std::result::Result<i64, CodebookError> {
    let start = *pos;
    let mut ux: u64 = 0;

    for i in 0..MAX_VARINT_LEN {
        let Some(&byte) = bytes.get(*pos) else {
            return Err(CodebookError::Truncated { offset: start });
        };
        *pos += 1;

        // The tenth byte may only carry the 64th bit
        if i == MAX_VARINT_LEN - 1 && byte > 1 {
            return Err(CodebookError::Malformed { offset: start });
        }

        ux |= u64::from(byte & 0x7F) << (7 * i);
        if byte & 0x80 == 0 {
            let value = (ux >> 1) as i64;
            return Ok(if ux & 1 != 0 { !value } else { value });
        }
    }

    Err(CodebookError::Malformed { offset: start })
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn test_serde_round_trip() {
        let codebook = Codebook::from_weights(&[3, 1, 4, 1, 5, 9]).unwrap();
        let json = serde_json::to_string(&codebook).unwrap();
        assert_eq!(json, "[3,5,2,4,2,2,5]");

        let back: Codebook = serde_json::from_str(&json).unwrap();
        assert_eq!(back, codebook);
    }

    #[test]
    fn test_serde_rejects_invalid_lengths() {
        // oversubscribed
        assert!(serde_json::from_str::<Codebook>("[1,1,1]").is_err());
        // EOF uncoded
        assert!(serde_json::from_str::<Codebook>("[1,0]").is_err());
        assert!(serde_json::from_str::<Codebook>("[]").is_err());
        // past the longest representable code
        assert!(serde_json::from_str::<Codebook>("[1,65]").is_err());
    }
}
