//! Pluggable string-similarity algorithms.
//!
//! A [`Similarity`] implementation is a pure function over two strings
//! producing a normalized distance: 0.0 means identical, larger means more
//! different. No graph is read or mutated. The variant is selected once at
//! configuration time by name; there is no runtime dispatch beyond the
//! trait object.

pub mod soundex;

pub use soundex::NormalizedSoundexDifference;

use crate::error::{AlgorithmError, ConfigError};

/// A pure, symmetric string-distance computation.
pub trait Similarity {
    /// Normalized non-negative distance between two strings; 0.0 = identical.
    ///
    /// Symmetric: `calculate(a, b) == calculate(b, a)`. Fails with
    /// [`AlgorithmError::Unencodable`] when an input cannot be compared;
    /// callers treat that as "no comparison possible" and skip the pair.
    fn calculate(&self, a: &str, b: &str) -> Result<f32, AlgorithmError>;

    /// Short configuration name of this algorithm.
    fn name(&self) -> &'static str;
}

/// Plain edit-distance variant, normalized to [0, 1].
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedLevenshtein;

impl Similarity for NormalizedLevenshtein {
    fn calculate(&self, a: &str, b: &str) -> Result<f32, AlgorithmError> {
        Ok(1.0 - strsim::normalized_levenshtein(a, b) as f32)
    }

    fn name(&self) -> &'static str {
        "levenshtein"
    }
}

/// Resolve an algorithm by its configuration name.
pub fn algorithm_by_name(name: &str) -> Result<Box<dyn Similarity>, ConfigError> {
    match name {
        "soundex" => Ok(Box::new(NormalizedSoundexDifference)),
        "levenshtein" => Ok(Box::new(NormalizedLevenshtein)),
        other => Err(ConfigError::UnknownAlgorithm { name: other.into() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levenshtein_identity_and_symmetry() {
        let alg = NormalizedLevenshtein;
        assert_eq!(alg.calculate("smith", "smith").unwrap(), 0.0);
        assert_eq!(
            alg.calculate("smith", "smyth").unwrap(),
            alg.calculate("smyth", "smith").unwrap()
        );
    }

    #[test]
    fn levenshtein_distance_grows_with_difference() {
        let alg = NormalizedLevenshtein;
        let near = alg.calculate("smith", "smyth").unwrap();
        let far = alg.calculate("smith", "jones").unwrap();
        assert!(near < far);
    }

    #[test]
    fn selection_by_name() {
        assert_eq!(algorithm_by_name("soundex").unwrap().name(), "soundex");
        assert_eq!(
            algorithm_by_name("levenshtein").unwrap().name(),
            "levenshtein"
        );
        assert!(matches!(
            algorithm_by_name("metaphone"),
            Err(ConfigError::UnknownAlgorithm { .. })
        ));
    }
}
