//! Canonical Huffman codec.
//!
//! # Pipeline
//!
//! ```text
//! weights ──▶ tree ──▶ code lengths ──▶ canonical codes ──▶ Encoder
//!                            │
//!                            └──▶ serialized codebook ──▶ Decoder
//! ```
//!
//! Only code lengths ever cross a serialization boundary. Canonical codes
//! are rebuilt from lengths on both sides, so an [`Encoder`] and a
//! [`Decoder`] built independently from the same [`Codebook`] agree on every
//! codeword.
//!
//! # End of stream
//!
//! Every code carries one extra symbol, placed one past the last weight,
//! that marks the end of an encoded sequence. Callers refer to it through
//! the [`EOF`] sentinel and never need to know the alphabet size.

mod canonical;
mod codebook;
mod decoder;
mod encoder;
mod tree;

pub use canonical::{CanonicalCode, Codeword};
pub use codebook::Codebook;
pub use decoder::{Decoder, Symbols};
pub use encoder::{Encoder, SymbolWriter};

/// Symbol identifier. Data symbols are `0..alphabet_size`.
pub type Symbol = u32;

/// Sentinel standing for the end-of-stream symbol in the public API.
pub const EOF: Symbol = u32::MAX;

/// Longest codeword the engine can represent.
pub const MAX_CODE_LENGTH: u8 = 64;
