//! Codebook statistics and cost estimation.
//!
//! Lets callers judge a code before committing to it: how many bits a
//! weight table will cost, how close the code is to the entropy bound, and
//! how much the codebook itself takes on the wire.

use crate::huffman::{Codebook, Symbol};
use std::fmt;

/// Shape of a codebook.
#[derive(Debug, Clone, PartialEq)]
pub struct CodebookStats {
    /// Data symbols, EOF excluded
    pub alphabet_size: usize,

    /// Symbols with a codeword, EOF included
    pub coded_symbols: usize,

    /// Shortest codeword length
    pub min_length: u8,

    /// Longest codeword length
    pub max_length: u8,

    /// Sum of 2^-length over coded symbols, rounded to `f64`
    pub kraft_sum: f64,

    /// Lengths exactly fill the code space (exact, not derived from `kraft_sum`)
    pub complete: bool,

    /// Serialized codebook size in bytes
    pub serialized_bytes: usize,
}

impl CodebookStats {
    /// Collect statistics for `codebook`.
    pub fn from_codebook(codebook: &Codebook) -> Self {
        let mut coded_symbols = 0;
        let mut min_length = u8::MAX;
        let mut kraft_sum = 0.0;

        for (_, len) in codebook.coded() {
            coded_symbols += 1;
            min_length = min_length.min(len);
            kraft_sum += 0.5f64.powi(i32::from(len));
        }

        Self {
            alphabet_size: codebook.alphabet_size(),
            coded_symbols,
            min_length,
            max_length: codebook.max_length(),
            kraft_sum,
            complete: codebook.is_complete(),
            serialized_bytes: codebook.serialize().len(),
        }
    }

    /// True when the code leaves no bit pattern unassigned.
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

impl fmt::Display for CodebookStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Codebook ===")?;
        writeln!(f, "Alphabet: {} symbols + EOF", self.alphabet_size)?;
        writeln!(f, "Coded: {}", self.coded_symbols)?;
        writeln!(f, "Lengths: {}..={} bits", self.min_length, self.max_length)?;
        writeln!(
            f,
            "Kraft sum: {:.6}{}",
            self.kraft_sum,
            if self.is_complete() { "" } else { " (incomplete)" }
        )?;
        write!(f, "Serialized: {} bytes", self.serialized_bytes)
    }
}

/// Total bits needed to encode `weights[s]` occurrences of every symbol `s`.
///
/// Symbols without a codeword contribute nothing. Saturates at `u64::MAX`.
pub fn encoded_bits(codebook: &Codebook, weights: &[u64]) -> u64 {
    weights
        .iter()
        .enumerate()
        .map(|(symbol, &weight)| {
            weight.saturating_mul(u64::from(codebook.length(symbol as Symbol)))
        })
        .fold(0u64, u64::saturating_add)
}

/// Average codeword length in bits, weighted by `weights`.
///
/// Returns 0.0 if all weights are zero.
pub fn mean_code_length(codebook: &Codebook, weights: &[u64]) -> f64 {
    let total: u128 = weights.iter().map(|&w| u128::from(w)).sum();
    if total == 0 {
        0.0
    } else {
        encoded_bits(codebook, weights) as f64 / total as f64
    }
}

/// Shannon entropy of `weights` in bits per symbol, the lower bound for
/// [`mean_code_length`].
pub fn entropy(weights: &[u64]) -> f64 {
    let total: f64 = weights.iter().map(|&w| w as f64).sum();
    if total == 0.0 {
        return 0.0;
    }
    weights
        .iter()
        .filter(|&&w| w > 0)
        .map(|&w| {
            let p = w as f64 / total;
            -p * p.log2()
        })
        .sum()
}

/// Ratio of coded size to fixed-width size (`symbol_bits` per occurrence).
///
/// Returns 0.0 if there is nothing to encode.
pub fn compression_ratio(codebook: &Codebook, weights: &[u64], symbol_bits: u32) -> f64 {
    let raw: f64 = weights.iter().map(|&w| w as f64).sum::<f64>() * f64::from(symbol_bits);
    if raw == 0.0 {
        0.0
    } else {
        encoded_bits(codebook, weights) as f64 / raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: [u64; 6] = [3, 1, 4, 1, 5, 9];

    #[test]
    fn test_stats() {
        let codebook = Codebook::from_weights(&REFERENCE).unwrap();
        let stats = CodebookStats::from_codebook(&codebook);

        assert_eq!(stats.alphabet_size, 6);
        assert_eq!(stats.coded_symbols, 7);
        assert_eq!(stats.min_length, 2);
        assert_eq!(stats.max_length, 5);
        assert_eq!(stats.kraft_sum, 1.0);
        assert!(stats.is_complete());
        assert_eq!(stats.serialized_bytes, 8);
    }

    #[test]
    fn test_encoded_bits() {
        let codebook = Codebook::from_weights(&REFERENCE).unwrap();
        // 3*3 + 1*5 + 4*2 + 1*4 + 5*2 + 9*2
        assert_eq!(encoded_bits(&codebook, &REFERENCE), 54);
        assert_eq!(encoded_bits(&codebook, &[0; 6]), 0);
        // weights past the alphabet cost nothing
        assert_eq!(encoded_bits(&codebook, &[0, 0, 0, 0, 0, 0, 0, 100]), 0);
    }

    #[test]
    fn test_mean_length_bounded_by_entropy() {
        let codebook = Codebook::from_weights(&REFERENCE).unwrap();
        let mean = mean_code_length(&codebook, &REFERENCE);
        let h = entropy(&REFERENCE);

        assert!((mean - 54.0 / 23.0).abs() < 1e-12);
        assert!(h <= mean);
        assert!(mean < h + 1.0);
        assert_eq!(mean_code_length(&codebook, &[]), 0.0);
    }

    #[test]
    fn test_compression_ratio() {
        let codebook = Codebook::from_weights(&REFERENCE).unwrap();
        let ratio = compression_ratio(&codebook, &REFERENCE, 8);
        assert!((ratio - 54.0 / 184.0).abs() < 1e-12);
        assert_eq!(compression_ratio(&codebook, &[], 8), 0.0);
    }

    #[test]
    fn test_completeness_is_exact() {
        // sum of 2^-1..=2^-64 rounds to 1.0 but leaves one 64-bit pattern free
        let codebook = Codebook::from_lengths((1..=64).collect()).unwrap();
        let stats = CodebookStats::from_codebook(&codebook);

        assert_eq!(stats.kraft_sum, 1.0);
        assert!(!codebook.is_complete());
        assert!(!stats.is_complete());
        assert!(stats.to_string().contains("(incomplete)"));
    }

    #[test]
    fn test_incomplete_display() {
        let codebook = Codebook::from_weights(&[]).unwrap();
        let stats = CodebookStats::from_codebook(&codebook);
        assert_eq!(stats.kraft_sum, 0.5);

        let text = stats.to_string();
        assert!(text.contains("Coded: 1"));
        assert!(text.contains("(incomplete)"));
    }
}
