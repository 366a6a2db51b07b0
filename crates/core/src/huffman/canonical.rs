//! Canonical code assignment.
//!
//! Coded symbols are ordered by `(length, symbol id)` and given consecutive
//! codes, shifting left whenever the length grows. The result depends only
//! on the lengths, which is why a codebook never needs to carry codes.

use super::{Symbol, MAX_CODE_LENGTH};
use crate::error::CodebookError;
use std::fmt;

/// A codeword: `len` bits of `code`, most significant bit first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Codeword {
    pub code: u64,
    pub len: u8,
}

impl Codeword {
    /// True when `self` is a (non-strict) prefix of `other`.
    pub fn is_prefix_of(&self, other: &Codeword) -> bool {
        if self.len == 0 || self.len > other.len {
            return false;
        }
        let shift = u32::from(other.len - self.len);
        other.code.checked_shr(shift).unwrap_or(0) == self.code
    }
}

impl fmt::Display for Codeword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.len == 0 {
            return f.write_str("-");
        }
        write!(f, "{:0width$b}", self.code, width = self.len as usize)
    }
}

/// Canonical codes derived from a length table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCode {
    /// Codeword per symbol id, `len == 0` for uncoded symbols
    codewords: Vec<Codeword>,
    /// Number of symbols per code length, `numl[0] == 0`
    numl: Vec<u32>,
    /// Coded symbols in canonical order
    sorted: Vec<Symbol>,
    /// Lengths exactly fill the code space
    complete: bool,
}

impl CanonicalCode {
    /// Codeword for `symbol`, if it has one.
    pub fn codeword(&self, symbol: Symbol) -> Option<Codeword> {
        self.codewords
            .get(symbol as usize)
            .copied()
            .filter(|cw| cw.len > 0)
    }

    /// All codewords indexed by symbol id.
    pub fn codewords(&self) -> &[Codeword] {
        &self.codewords
    }

    /// Symbol count per code length, indexed by length.
    pub fn length_counts(&self) -> &[u32] {
        &self.numl
    }

    /// Coded symbols sorted by `(length, id)`.
    pub fn sorted_symbols(&self) -> &[Symbol] {
        &self.sorted
    }

    /// Longest code length in use.
    pub fn max_length(&self) -> u8 {
        (self.numl.len() - 1) as u8
    }

    /// True when the Kraft sum is exactly 1.
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

/// Assign canonical codes to `lengths` (indexed by symbol id, 0 = uncoded).
pub(crate) fn assign(lengths: &[u8]) -> Result<CanonicalCode, CodebookError> {
    if let Some(&length) = lengths.iter().find(|&&len| len > MAX_CODE_LENGTH) {
        return Err(CodebookError::CodeLengthTooLong {
            length: length.into(),
            max: MAX_CODE_LENGTH,
        });
    }

    let mut sorted: Vec<Symbol> = lengths
        .iter()
        .enumerate()
        .filter(|(_, &len)| len > 0)
        .map(|(symbol, _)| symbol as Symbol)
        .collect();
    sorted.sort_by_key(|&symbol| (lengths[symbol as usize], symbol));

    let max_len = match sorted.last() {
        Some(&symbol) => lengths[symbol as usize],
        None => return Err(CodebookError::NoCodedSymbols),
    };

    let mut codewords = vec![Codeword::default(); lengths.len()];
    let mut numl = vec![0u32; max_len as usize + 1];

    // u128 so that a full 64-bit level can be closed without overflow
    let mut code: u128 = 0;
    let mut prev_len = 0u8;

    for &symbol in &sorted {
        let len = lengths[symbol as usize];
        code <<= len - prev_len;
        prev_len = len;

        if code >> len != 0 {
            return Err(CodebookError::Oversubscribed);
        }

        codewords[symbol as usize] = Codeword {
            code: code as u64,
            len,
        };
        numl[len as usize] += 1;
        code += 1;
    }

    Ok(CanonicalCode {
        codewords,
        numl,
        sorted,
        complete: code == 1u128 << max_len,
    })
}

/// Check the Kraft inequality without assigning codes.
///
/// Each length `l` contributes `2^(64 - l)` against a budget of `2^64`.
pub(crate) fn check_kraft(lengths: &[u8]) -> Result<bool, CodebookError> {
    let budget = 1u128 << MAX_CODE_LENGTH;
    let mut used: u128 = 0;

    for &len in lengths.iter().filter(|&&len| len > 0) {
        if len > MAX_CODE_LENGTH {
            return Err(CodebookError::CodeLengthTooLong {
                length: len.into(),
                max: MAX_CODE_LENGTH,
            });
        }
        used += 1u128 << (MAX_CODE_LENGTH - len);
        if used > budget {
            return Err(CodebookError::Oversubscribed);
        }
    }

    Ok(used == budget)
}
