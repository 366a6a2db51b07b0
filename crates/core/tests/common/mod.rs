//! Shared input generation for integration tests.
//!
//! Generated data mixes runs, text-like bytes, repeating patterns and random
//! bytes so that codes of very different shapes get exercised. Everything is
//! driven by a seeded ChaCha8 RNG and is reproducible.
#![allow(dead_code)]

use canon_huff_core::bitio::{BitReader, BitWriter};
use canon_huff_core::{Decoder, Encoder, Symbol, EOF};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Generate `size_bytes` of mixed-compressibility data.
pub fn generate_sample_data(seed: u64, size_bytes: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size_bytes);

    while data.len() < size_bytes {
        let chunk_size = (size_bytes - data.len()).min(4096);

        match rng.gen_range(0..10u8) {
            // runs of one byte
            0..=2 => {
                let byte: u8 = rng.gen();
                data.extend(std::iter::repeat(byte).take(chunk_size));
            }
            // limited alphabet
            3..=5 => {
                let alphabet = b"abcdefghijklmnopqrstuvwxyz .!,\n";
                data.extend(
                    (0..chunk_size).map(|_| alphabet[rng.gen_range(0..alphabet.len())]),
                );
            }
            // repeating pattern
            6..=7 => {
                let pattern: Vec<u8> = (0..rng.gen_range(4..=32)).map(|_| rng.gen()).collect();
                data.extend(pattern.iter().cycle().take(chunk_size));
            }
            // random bytes
            _ => data.extend((0..chunk_size).map(|_| rng.gen::<u8>())),
        }
    }

    data
}

/// Occurrence count of every byte value.
pub fn byte_weights(data: &[u8]) -> Vec<u64> {
    let mut weights = vec![0u64; 256];
    for &byte in data {
        weights[byte as usize] += 1;
    }
    weights
}

/// Random weight table where roughly a quarter of the symbols are unused.
pub fn random_weights(seed: u64, alphabet_size: usize, max_weight: u64) -> Vec<u64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..alphabet_size)
        .map(|_| {
            if rng.gen_bool(0.25) {
                0
            } else {
                rng.gen_range(1..=max_weight)
            }
        })
        .collect()
}

/// Random sequence drawn from the symbols with non-zero weight.
pub fn random_symbols(seed: u64, weights: &[u64], len: usize) -> Vec<Symbol> {
    let used: Vec<Symbol> = weights
        .iter()
        .enumerate()
        .filter(|(_, &w)| w > 0)
        .map(|(s, _)| s as Symbol)
        .collect();
    if used.is_empty() {
        return Vec::new();
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len).map(|_| used[rng.gen_range(0..used.len())]).collect()
}

/// Encode `symbols` followed by EOF and pad with ones.
pub fn encode_stream(encoder: &Encoder, symbols: &[Symbol]) -> Vec<u8> {
    let mut writer = encoder.writer(BitWriter::new());
    writer.write_all(symbols.iter().copied()).expect("encode failed");
    writer.write_eof().expect("EOF write failed");

    let mut sink = writer.into_inner();
    sink.flush(true);
    sink.finish()
}

/// Decode until EOF.
pub fn decode_stream(decoder: &Decoder, payload: &[u8]) -> Vec<Symbol> {
    decoder
        .symbols(BitReader::new(payload))
        .collect::<Result<Vec<_>, _>>()
        .expect("decode failed")
}

/// Decode one symbol at a time, checking the stream ends with EOF.
pub fn decode_exact(decoder: &Decoder, payload: &[u8], expected_len: usize) -> Vec<Symbol> {
    let mut reader = BitReader::new(payload);
    let mut out = Vec::with_capacity(expected_len);
    loop {
        let symbol = decoder.read_symbol(&mut reader).expect("decode failed");
        if symbol == EOF {
            break;
        }
        out.push(symbol);
    }
    // nothing but padding may follow
    assert!(reader.bits_remaining() < 8);
    out
}
