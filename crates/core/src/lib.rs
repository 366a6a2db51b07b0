//! canon-huff-core: canonical Huffman prefix codes with length-only codebooks
//!
//! This library builds an optimal prefix code from per-symbol weights,
//! assigns it in canonical form, ships the codebook as code lengths only,
//! and encodes/decodes one symbol at a time against an MSB-first bit stream.
//!
//! # Architecture
//!
//! - `huffman`: tree construction, canonical assignment, codebook, encoder, decoder
//! - `bitio`: bit sink/source traits and in-memory bit writer/reader
//! - `config`: limits applied to untrusted codebooks
//! - `stats`: codebook shape and cost estimation
//! - `error`: structured errors for every failure
//!
//! # Example
//!
//! ```
//! use canon_huff_core::bitio::{BitReader, BitWriter};
//! use canon_huff_core::huffman::{Decoder, Encoder, EOF};
//!
//! let encoder = Encoder::from_weights(&[3, 1, 4, 1, 5, 9]).unwrap();
//!
//! let mut writer = BitWriter::new();
//! for symbol in [5, 3, 1, 1, 3, EOF] {
//!     encoder.write_symbol(&mut writer, symbol).unwrap();
//! }
//! writer.flush(true);
//! let payload = writer.finish();
//!
//! // Only the codebook bytes need to travel with the payload
//! let decoder = Decoder::from_bytes(&encoder.codebook_bytes()).unwrap();
//! let decoded: Vec<u32> = decoder
//!     .symbols(BitReader::new(&payload))
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(decoded, vec![5, 3, 1, 1, 3]);
//! ```
//!
//! # Design Principles
//!
//! - **No panics**: corrupt codebooks and streams produce errors
//! - **Deterministic**: codes depend only on code lengths
//! - **Immutable codecs**: encoders and decoders can be shared across threads

pub mod bitio;
pub mod config;
pub mod error;
pub mod huffman;
pub mod stats;

// Re-export commonly used types
pub use config::CodecConfig;
pub use error::{Error, Result};
pub use huffman::{Codebook, Decoder, Encoder, Symbol, EOF};
