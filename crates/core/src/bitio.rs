//! Bit-level I/O used as the collaborator of the Huffman encoder and decoder.
//!
//! The codec itself only needs two capabilities, expressed as traits:
//! - [`BitSink`]: append `count` bits of a value, most significant bit first
//! - [`BitSource`]: pull the next bit, or fail at end of stream
//!
//! [`BitWriter`] and [`BitReader`] are the in-memory implementations shipped
//! with the crate. Both operate in MSB-first order.
//!
//! # Padding Rules
//! - `BitWriter::flush` pads the final partial byte with ones or zeros
//! - `BitReader` cannot tell padding from data; a terminating EOF codeword
//!   is what lets the decoder stop before the padding
//!
//! # Example
//! ```
//! use canon_huff_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3).unwrap();
//! writer.flush(true); // 101 + 11111
//!
//! let bytes = writer.finish();
//! assert_eq!(bytes, vec![0b1011_1111]);
//!
//! let mut reader = BitReader::new(&bytes);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! ```

use crate::error::{BitIoError, Result};

/// Destination for MSB-first bits.
pub trait BitSink {
    /// Append the lowest `count` bits of `value`, most significant first.
    fn write_bits(&mut self, value: u64, count: usize) -> Result<()>;
}

/// Source of MSB-first bits.
pub trait BitSource {
    /// Next bit, or `BitIoError::UnexpectedEof` when the input is exhausted.
    fn read_bit(&mut self) -> Result<bool>;
}

impl<T: BitSink + ?Sized> BitSink for &mut T {
    fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        (**self).write_bits(value, count)
    }
}

impl<T: BitSource + ?Sized> BitSource for &mut T {
    fn read_bit(&mut self) -> Result<bool> {
        (**self).read_bit()
    }
}

/// In-memory [`BitSink`] collecting MSB-first bits into bytes.
///
/// # Invariants
/// - `bit_count` is always < 8; a full accumulator is pushed immediately
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    /// Full bytes emitted so far
    bytes: Vec<u8>,
    /// Pending bits, aligned to the top of the byte
    bit_buffer: u8,
    /// How many pending bits are valid
    bit_count: u8,
}

impl BitWriter {
    /// Empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the lowest `count` bits of `value` (at most 64).
    ///
    /// Fails with `BitIoError::InvalidBitCount` above 64 bits.
    pub fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        let mut remaining = count;
        while remaining > 0 {
            let free = 8 - self.bit_count as usize;
            let take = remaining.min(free);
            let shift = remaining - take;

            // `take` is at most 8, so the mask never overflows
            let chunk = ((value >> shift) & ((1u64 << take) - 1)) as u8;
            self.bit_buffer |= chunk << (free - take);
            self.bit_count += take as u8;
            remaining = shift;

            if self.bit_count == 8 {
                self.bytes.push(self.bit_buffer);
                self.bit_buffer = 0;
                self.bit_count = 0;
            }
        }

        Ok(())
    }

    /// Complete the current partial byte, if any.
    ///
    /// Unused low bits are set to 1 when `pad_with_ones` is true, otherwise
    /// left as 0. Writing may continue afterwards on a byte boundary.
    pub fn flush(&mut self, pad_with_ones: bool) {
        if self.bit_count == 0 {
            return;
        }
        if pad_with_ones {
            self.bit_buffer |= 0xFF >> self.bit_count;
        }
        self.bytes.push(self.bit_buffer);
        self.bit_buffer = 0;
        self.bit_count = 0;
    }

    /// Finish writing and return the output bytes, zero-padding the last one.
    pub fn finish(mut self) -> Vec<u8> {
        self.flush(false);
        self.bytes
    }

    /// Bytes completed so far; a partial byte is not counted.
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Bits written, partial byte included.
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.bit_count as usize
    }
}

impl BitSink for BitWriter {
    fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        BitWriter::write_bits(self, value, count)
    }
}

/// [`BitSource`] over a borrowed byte slice, MSB-first.
///
/// # Invariants
/// - `pos` stays within `0..=data.len() * 8`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    /// Bytes being read
    data: &'a [u8],
    /// Bits consumed, counted from the top bit of the first byte
    pos: usize,
}

impl<'a> BitReader<'a> {
    /// Start reading at the first bit of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
        }
    }

    /// Read `count` bits (at most 64) as an unsigned integer.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` above 64 bits
    /// - `BitIoError::UnexpectedEof` if not enough bits remain; nothing is
    ///   consumed in that case
    pub fn read_bits(&mut self, count: usize) -> Result<u64> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }
        if count > self.bits_remaining() {
            return Err(BitIoError::UnexpectedEof.into());
        }

        let mut value = 0u64;
        for _ in 0..count {
            value = (value << 1) | u64::from(self.read_bit()?);
        }
        Ok(value)
    }

    /// Read a single bit.
    pub fn read_bit(&mut self) -> Result<bool> {
        let byte = self
            .data
            .get(self.pos / 8)
            .ok_or(BitIoError::UnexpectedEof)?;
        let bit = (byte >> (7 - self.pos % 8)) & 1;
        self.pos += 1;
        Ok(bit == 1)
    }

    /// Bits not yet consumed.
    pub fn bits_remaining(&self) -> usize {
        self.data.len() * 8 - self.pos
    }

    /// Bits consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// True once every bit has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len() * 8
    }
}

impl BitSource for BitReader<'_> {
    fn read_bit(&mut self) -> Result<bool> {
        BitReader::read_bit(self)
    }
}
