//! Symbol encoder.

use super::canonical::{self, CanonicalCode, Codeword};
use super::{Codebook, Decoder, Symbol, EOF};
use crate::bitio::BitSink;
use crate::error::{CodecError, Result};
use tracing::{debug, trace};

/// Maps symbols to canonical codewords and writes them to a [`BitSink`].
///
/// Immutable once built; one encoder can serve any number of streams.
#[derive(Debug, Clone)]
pub struct Encoder {
    codebook: Codebook,
    code: CanonicalCode,
}

impl Encoder {
    /// Build the optimal code for `weights` (EOF is appended automatically).
    pub fn from_weights(weights: &[u64]) -> Result<Self> {
        Self::from_codebook(Codebook::from_weights(weights)?)
    }

    /// Rebuild the canonical code from a codebook's lengths.
    pub fn from_codebook(codebook: Codebook) -> Result<Self> {
        let code = canonical::assign(codebook.lengths())?;
        debug!(
            alphabet_size = codebook.alphabet_size(),
            coded = code.sorted_symbols().len(),
            max_length = code.max_length(),
            "encoder ready"
        );
        Ok(Self { codebook, code })
    }

    /// Rebuild from a serialized codebook.
    pub fn from_codebook_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_codebook(Codebook::deserialize(bytes)?)
    }

    /// Codeword length for `symbol`; [`EOF`] is accepted.
    ///
    /// Returns 0 for symbols outside the alphabet or without a code, so it
    /// can be used for cost estimation without error handling.
    pub fn symbol_len(&self, symbol: Symbol) -> u32 {
        u32::from(self.codebook.length(symbol))
    }

    /// Codeword for `symbol`; [`EOF`] is accepted.
    pub fn codeword(&self, symbol: Symbol) -> Option<Codeword> {
        self.code.codeword(self.resolve(symbol))
    }

    /// Append the codeword for `symbol` to `sink` and return its length.
    ///
    /// # Errors
    /// - `CodecError::UnknownSymbol` if the id lies past the EOF id or the
    ///   symbol was never coded (weight 0)
    /// - whatever the sink reports
    pub fn write_symbol<W: BitSink + ?Sized>(&self, sink: &mut W, symbol: Symbol) -> Result<u32> {
        let Some(codeword) = self.codeword(symbol) else {
            trace!(symbol, "refusing to write uncoded symbol");
            return Err(CodecError::UnknownSymbol { symbol }.into());
        };
        sink.write_bits(codeword.code, codeword.len as usize)?;
        Ok(u32::from(codeword.len))
    }

    /// Wrap `sink` so symbols can be written without passing it each time.
    pub fn writer<W: BitSink>(&self, sink: W) -> SymbolWriter<'_, W> {
        SymbolWriter {
            encoder: self,
            sink,
            bits_written: 0,
        }
    }

    /// The codebook this encoder was built from.
    pub fn codebook(&self) -> &Codebook {
        &self.codebook
    }

    /// Serialized codebook, ready to send to a decoder.
    pub fn codebook_bytes(&self) -> Vec<u8> {
        self.codebook.serialize()
    }

    /// Canonical code assignment.
    pub fn canonical(&self) -> &CanonicalCode {
        &self.code
    }

    /// A decoder for this code, without a serialization round trip.
    pub fn decoder(&self) -> Decoder {
        Decoder::from_parts(self.codebook.clone(), self.code.clone())
    }

    fn resolve(&self, symbol: Symbol) -> Symbol {
        if symbol == EOF {
            self.codebook.eof_symbol()
        } else {
            symbol
        }
    }
}

/// An [`Encoder`] bound to one bit sink.
#[derive(Debug)]
pub struct SymbolWriter<'a, W> {
    encoder: &'a Encoder,
    sink: W,
    bits_written: u64,
}

impl<W: BitSink> SymbolWriter<'_, W> {
    /// Write one symbol; see [`Encoder::write_symbol`].
    pub fn write_symbol(&mut self, symbol: Symbol) -> Result<u32> {
        let len = self.encoder.write_symbol(&mut self.sink, symbol)?;
        self.bits_written += u64::from(len);
        Ok(len)
    }

    /// Write every symbol in order, stopping at the first error.
    pub fn write_all<I>(&mut self, symbols: I) -> Result<u64>
    where
        I: IntoIterator<Item = Symbol>,
    {
        let before = self.bits_written;
        for symbol in symbols {
            self.write_symbol(symbol)?;
        }
        Ok(self.bits_written - before)
    }

    /// Write the end-of-stream codeword.
    pub fn write_eof(&mut self) -> Result<u32> {
        self.write_symbol(EOF)
    }

    /// Codeword bits written through this writer.
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    /// Release the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}
