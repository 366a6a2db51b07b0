//! Symbol decoder.
//!
//! Decoding walks the code lengths one bit at a time using only the count of
//! codes at each length. For canonical codes the codes of one length form a
//! contiguous range that starts where the previous length's range ended
//! (shifted left by one), so
//!
//! ```text
//! first[1]   = 0
//! first[l+1] = (first[l] + numl[l]) << 1
//! ```
//!
//! and the accumulated bits `code` name a symbol of length `l` exactly when
//! `code - first[l] < numl[l]`. The symbol is then found in the canonically
//! sorted symbol list at `offset + (code - first[l])`, where `offset` counts
//! the symbols of every shorter length. No code-to-symbol table is built.

use super::canonical::{self, CanonicalCode};
use super::{Codebook, Symbol, EOF};
use crate::bitio::BitSource;
use crate::config::CodecConfig;
use crate::error::{CodecError, Result};
use std::iter::FusedIterator;
use tracing::debug;

/// Reads symbols back from a bit stream produced by an [`Encoder`](super::Encoder).
#[derive(Debug, Clone)]
pub struct Decoder {
    codebook: Codebook,
    code: CanonicalCode,
    eof: Symbol,
}

impl Decoder {
    /// Build a decoder from a codebook.
    pub fn new(codebook: Codebook) -> Result<Self> {
        let code = canonical::assign(codebook.lengths())?;
        debug!(
            alphabet_size = codebook.alphabet_size(),
            coded = code.sorted_symbols().len(),
            max_length = code.max_length(),
            complete = code.is_complete(),
            "decoder ready"
        );
        Ok(Self::from_parts(codebook, code))
    }

    /// Build a decoder from a serialized codebook with default limits.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::new(Codebook::deserialize(bytes)?)
    }

    /// Build a decoder from a serialized codebook with explicit limits.
    pub fn from_bytes_with(bytes: &[u8], config: &CodecConfig) -> Result<Self> {
        Self::new(Codebook::deserialize_with(bytes, config)?)
    }

    pub(crate) fn from_parts(codebook: Codebook, code: CanonicalCode) -> Self {
        let eof = codebook.eof_symbol();
        Self {
            codebook,
            code,
            eof,
        }
    }

    /// Decode exactly one symbol, returning [`EOF`] for the end marker.
    ///
    /// # Errors
    /// - the source's own error (normally `BitIoError::UnexpectedEof`) if it
    ///   runs dry before a codeword is complete
    /// - `CodecError::UnknownCode` if the bits match no codeword up to the
    ///   longest code length, which only happens with incomplete codes or a
    ///   desynchronized stream
    pub fn read_symbol<R: BitSource + ?Sized>(&self, source: &mut R) -> Result<Symbol> {
        let numl = self.code.length_counts();
        let sorted = self.code.sorted_symbols();

        let mut code: u128 = 0;
        let mut first: u128 = 0;
        let mut offset: usize = 0;

        for &count in &numl[1..] {
            code = (code << 1) | u128::from(source.read_bit()?);
            first <<= 1;

            let count = u128::from(count);
            if code >= first && code - first < count {
                let index = offset + (code - first) as usize;
                if let Some(&symbol) = sorted.get(index) {
                    return Ok(if symbol == self.eof { EOF } else { symbol });
                }
                break;
            }

            first += count;
            offset += count as usize;
        }

        Err(CodecError::UnknownCode {
            code: code as u64,
            bits: u32::from(self.code.max_length()),
        }
        .into())
    }

    /// Iterate over decoded symbols until EOF (not yielded) or an error.
    pub fn symbols<R: BitSource>(&self, source: R) -> Symbols<'_, R> {
        Symbols {
            decoder: self,
            source,
            done: false,
        }
    }

    /// The codebook this decoder was built from.
    pub fn codebook(&self) -> &Codebook {
        &self.codebook
    }

    /// Canonical code assignment.
    pub fn canonical(&self) -> &CanonicalCode {
        &self.code
    }

    /// Longest codeword, i.e. the most bits one `read_symbol` can consume.
    pub fn max_length(&self) -> u8 {
        self.code.max_length()
    }
}

/// Iterator returned by [`Decoder::symbols`].
///
/// Yields `Ok(symbol)` for data symbols and stops after EOF. An error is
/// yielded once, after which the iterator is finished.
#[derive(Debug)]
pub struct Symbols<'a, R> {
    decoder: &'a Decoder,
    source: R,
    done: bool,
}

impl<R> Symbols<'_, R> {
    /// Release the bit source, positioned after the last codeword read.
    pub fn into_inner(self) -> R {
        self.source
    }
}

impl<R: BitSource> Iterator for Symbols<'_, R> {
    type Item = Result<Symbol>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.decoder.read_symbol(&mut self.source) {
            Ok(EOF) => {
                self.done = true;
                None
            }
            Ok(symbol) => Some(Ok(symbol)),
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<R: BitSource> FusedIterator for Symbols<'_, R> {}
