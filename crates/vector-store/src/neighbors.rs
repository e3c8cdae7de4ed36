//! Exhaustive similar-word listing over a store's vocabulary.

use std::cmp::Ordering;

use crate::error::Result;
use crate::similarity::cosine_similarity;
use crate::store::VectorStore;
use crate::types::Neighbor;

/// Words scoring `threshold <= score < 1.0` against `query`, best first.
///
/// Exact duplicates of the query vector (score 1.0) are left out along with
/// the query itself. Ties are ordered by word so the listing is stable.
pub fn similar_words(store: &VectorStore, query: &str, threshold: f64) -> Result<Vec<Neighbor>> {
    let query_vec = store.get_embedding(query)?;

    let mut neighbors: Vec<Neighbor> = store
        .iter()
        .filter(|(word, _)| *word != query)
        .filter_map(|(word, embedding)| {
            let score = cosine_similarity(query_vec, embedding).ok()?;
            (score >= threshold && score < 1.0).then(|| Neighbor {
                word: word.to_string(),
                score,
            })
        })
        .collect();

    neighbors.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.word.cmp(&b.word))
    });
    log::debug!(
        "{} of {} words within {threshold} of '{query}'",
        neighbors.len(),
        store.len()
    );
    Ok(neighbors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VectorStoreError;
    use crate::types::Embedding;
    use pretty_assertions::assert_eq;

    fn store() -> VectorStore {
        VectorStore::from_embeddings(
            [
                ("king", Embedding::Real(vec![1.0, 0.0])),
                ("queen", Embedding::Real(vec![0.9, 0.436])),
                ("monarch", Embedding::Real(vec![0.95, 0.312])),
                ("kingdom", Embedding::Real(vec![2.0, 0.0])),
                ("apple", Embedding::Real(vec![0.0, 1.0])),
            ],
            None,
        )
        .unwrap()
    }

    #[test]
    fn lists_neighbors_best_first() {
        let words: Vec<String> = similar_words(&store(), "king", 0.8)
            .unwrap()
            .into_iter()
            .map(|n| n.word)
            .collect();
        // "kingdom" points the same way and scores exactly 1.0.
        assert_eq!(words, vec!["monarch".to_string(), "queen".to_string()]);
    }

    #[test]
    fn oov_query_is_not_found() {
        assert!(matches!(
            similar_words(&store(), "emperor", 0.5),
            Err(VectorStoreError::NotFound(_))
        ));
    }
}
