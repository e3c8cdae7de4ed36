//! Cosine similarity with per-scan memoization.
//!
//! Scores are keyed by the ordered `(query, candidate)` pair. Two queries that
//! probe the same candidate never share an entry.

use std::collections::HashMap;

use crate::error::{Result, VectorStoreError};
use crate::types::Embedding;

/// Dot product and squared norm over one component type.
///
/// Each representation accumulates in its own domain and only converts to
/// `f64` for the final division.
pub(crate) trait DotProduct {
    type Acc: Copy;

    fn dot(&self, other: &Self) -> Self::Acc;
    fn norm_squared(&self) -> Self::Acc;
    fn widen(acc: Self::Acc) -> f64;
}

impl DotProduct for [f32] {
    type Acc = f64;

    fn dot(&self, other: &Self) -> f64 {
        self.iter()
            .zip(other.iter())
            .map(|(a, b)| f64::from(*a) * f64::from(*b))
            .sum()
    }

    fn norm_squared(&self) -> f64 {
        self.iter().map(|x| f64::from(*x) * f64::from(*x)).sum()
    }

    fn widen(acc: f64) -> f64 {
        acc
    }
}

impl DotProduct for [i8] {
    type Acc = i64;

    fn dot(&self, other: &Self) -> i64 {
        self.iter()
            .zip(other.iter())
            .map(|(a, b)| i64::from(*a) * i64::from(*b))
            .sum()
    }

    fn norm_squared(&self) -> i64 {
        self.iter().map(|x| i64::from(*x) * i64::from(*x)).sum()
    }

    #[allow(clippy::cast_precision_loss)]
    fn widen(acc: i64) -> f64 {
        acc as f64
    }
}

/// `dot(a, b) / (|a| * |b|)`.
///
/// A zero-norm operand is not special-cased: the IEEE division yields NaN
/// (or an infinity) and callers comparing with `>` treat that as no match.
pub(crate) fn cosine<T: DotProduct + ?Sized>(a: &T, b: &T) -> f64 {
    let dot = T::widen(a.dot(b));
    let norm_a = T::widen(a.norm_squared()).sqrt();
    let norm_b = T::widen(b.norm_squared()).sqrt();
    dot / (norm_a * norm_b)
}

/// Cosine similarity between two embeddings of the same representation and
/// dimensionality.
pub fn cosine_similarity(a: &Embedding, b: &Embedding) -> Result<f64> {
    if a.dim() != b.dim() {
        return Err(VectorStoreError::InvalidDimension {
            expected: a.dim(),
            actual: b.dim(),
        });
    }
    match (a, b) {
        (Embedding::Real(a), Embedding::Real(b)) => Ok(cosine(a.as_slice(), b.as_slice())),
        (Embedding::Quantized(a), Embedding::Quantized(b)) => {
            Ok(cosine(a.as_slice(), b.as_slice()))
        }
        _ => Err(VectorStoreError::IncompatibleVectorTypes {
            left: a.representation(),
            right: b.representation(),
        }),
    }
}

/// Scores memoized for the life of one scan. Never evicted.
///
/// Stored as query -> candidate -> score so lookups borrow both tokens.
#[derive(Debug, Default)]
pub struct SimilarityCache {
    scores: HashMap<String, HashMap<String, f64>>,
    len: usize,
}

impl SimilarityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, query: &str, candidate: &str) -> Option<f64> {
        self.scores.get(query)?.get(candidate).copied()
    }

    pub fn insert(&mut self, query: &str, candidate: &str, score: f64) {
        let per_query = self.scores.entry(query.to_owned()).or_default();
        if per_query.insert(candidate.to_owned(), score).is_none() {
            self.len += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Memoizing scorer. Create one per scan and hand it to the matcher by
/// mutable reference.
#[derive(Debug, Default)]
pub struct SimilarityEngine {
    cache: SimilarityCache,
    computations: u64,
}

impl SimilarityEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score `candidate` against `query`.
    ///
    /// Tokens equal after lowercasing score `1.0` without touching the
    /// vectors. Otherwise the cosine is computed at most once per ordered
    /// pair and served from the cache afterwards.
    pub fn score(
        &mut self,
        query_token: &str,
        candidate_token: &str,
        query_vec: &Embedding,
        candidate_vec: &Embedding,
    ) -> Result<f64> {
        if same_text(query_token, candidate_token) {
            return Ok(1.0);
        }
        if let Some(score) = self.cache.get(query_token, candidate_token) {
            return Ok(score);
        }

        let score = cosine_similarity(query_vec, candidate_vec)?;
        self.computations += 1;
        self.cache.insert(query_token, candidate_token, score);
        Ok(score)
    }

    /// Previously computed score for the pair, if any. Lets callers skip the
    /// candidate lookup entirely on a hit.
    pub fn cached(&self, query_token: &str, candidate_token: &str) -> Option<f64> {
        self.cache.get(query_token, candidate_token)
    }

    /// Number of cosine computations performed so far.
    pub fn computations(&self) -> u64 {
        self.computations
    }

    pub fn cache(&self) -> &SimilarityCache {
        &self.cache
    }
}

fn same_text(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn real(values: &[f32]) -> Embedding {
        Embedding::Real(values.to_vec())
    }

    #[test]
    fn test_cosine_similarity() {
        let a = real(&[1.0, 0.0, 0.0]);
        let b = real(&[1.0, 0.0, 0.0]);
        let sim = cosine_similarity(&a, &b).unwrap();
        assert!((sim - 1.0).abs() < 1e-9);

        let c = real(&[1.0, 0.0]);
        let d = real(&[0.0, 1.0]);
        let sim2 = cosine_similarity(&c, &d).unwrap();
        assert!(sim2.abs() < 1e-9);
    }

    #[test]
    fn quantized_cosine_uses_raw_components() {
        let a = Embedding::Quantized(vec![3, 4]);
        let b = Embedding::Quantized(vec![4, 3]);
        let sim = cosine_similarity(&a, &b).unwrap();
        assert!((sim - 24.0 / 25.0).abs() < 1e-9);
    }

    #[test]
    fn zero_norm_yields_nan() {
        let zero = real(&[0.0, 0.0]);
        let other = real(&[1.0, 0.0]);
        assert!(cosine_similarity(&zero, &other).unwrap().is_nan());
    }

    #[test]
    fn mixed_representations_are_rejected() {
        let a = real(&[1.0, 0.0]);
        let b = Embedding::Quantized(vec![1, 0]);
        let err = cosine_similarity(&a, &b).unwrap_err();
        assert!(matches!(
            err,
            VectorStoreError::IncompatibleVectorTypes { .. }
        ));
        assert!(err.is_recoverable());
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let a = real(&[1.0, 0.0]);
        let b = real(&[1.0, 0.0, 0.0]);
        assert!(matches!(
            cosine_similarity(&a, &b),
            Err(VectorStoreError::InvalidDimension {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn exact_text_skips_vectors() {
        let mut engine = SimilarityEngine::new();
        // Mixed types would error if the vectors were consulted.
        let score = engine
            .score(
                "King",
                "king",
                &real(&[1.0]),
                &Embedding::Quantized(vec![1]),
            )
            .unwrap();
        assert_eq!(score, 1.0);
        assert_eq!(engine.computations(), 0);
        assert!(engine.cache().is_empty());
    }

    #[test]
    fn pair_is_computed_once() {
        let mut engine = SimilarityEngine::new();
        let king = real(&[1.0, 0.0]);
        let queen = real(&[0.9, 0.436]);

        let first = engine.score("king", "queen", &king, &queen).unwrap();
        let second = engine.score("king", "queen", &king, &queen).unwrap();

        assert_eq!(first, second);
        assert_eq!(engine.computations(), 1);
        assert_eq!(engine.cached("king", "queen"), Some(first));
        assert!((first - 0.9).abs() < 1e-3);
    }

    #[test]
    fn cache_key_distinguishes_queries() {
        let mut engine = SimilarityEngine::new();
        let king = real(&[1.0, 0.0]);
        let apple = real(&[0.0, 1.0]);
        let queen = real(&[0.9, 0.436]);

        let for_king = engine.score("king", "queen", &king, &queen).unwrap();
        let for_apple = engine.score("apple", "queen", &apple, &queen).unwrap();

        assert!(for_king > 0.8);
        assert!(for_apple < 0.5);
        assert_eq!(engine.computations(), 2);
        assert_eq!(engine.cache().len(), 2);
    }

    fn real_vec() -> impl Strategy<Value = Vec<f32>> {
        prop::collection::vec(-10.0f32..10.0, 8)
    }

    fn quantized_vec() -> impl Strategy<Value = Vec<i8>> {
        prop::collection::vec(any::<i8>(), 8)
    }

    proptest! {
        #[test]
        fn real_self_similarity_is_one(values in real_vec()) {
            prop_assume!(values.iter().any(|v| v.abs() > 1e-3));
            let a = Embedding::Real(values);
            let sim = cosine_similarity(&a, &a).unwrap();
            prop_assert!((sim - 1.0).abs() < 1e-9);
        }

        #[test]
        fn quantized_self_similarity_is_one(values in quantized_vec()) {
            prop_assume!(values.iter().any(|v| *v != 0));
            let a = Embedding::Quantized(values);
            let sim = cosine_similarity(&a, &a).unwrap();
            prop_assert!((sim - 1.0).abs() < 1e-9);
        }

        #[test]
        fn real_similarity_is_symmetric(a in real_vec(), b in real_vec()) {
            let a = Embedding::Real(a);
            let b = Embedding::Real(b);
            let ab = cosine_similarity(&a, &b).unwrap();
            let ba = cosine_similarity(&b, &a).unwrap();
            prop_assert!(ab == ba || (ab.is_nan() && ba.is_nan()));
        }

        #[test]
        fn quantized_similarity_is_symmetric(a in quantized_vec(), b in quantized_vec()) {
            let a = Embedding::Quantized(a);
            let b = Embedding::Quantized(b);
            let ab = cosine_similarity(&a, &b).unwrap();
            let ba = cosine_similarity(&b, &a).unwrap();
            prop_assert!(ab == ba || (ab.is_nan() && ba.is_nan()));
        }
    }
}
