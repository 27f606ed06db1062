//! Content-based filtering
//!
//! Ranks unread articles by embedding similarity to the articles a user has
//! already clicked.

use crate::cold_start::PopularityFallback;
use crate::embeddings::EmbeddingStore;
use crate::interactions::InteractionStore;
use crate::similarity::{argmax_cell, cosine_similarity_matrix};
use crate::types::{ItemId, UserId};
use article_reco_core::{RecoError, Result};
use ndarray::Array2;
use std::collections::HashSet;
use tracing::{debug, info};

/// Content-similarity recommender
///
/// Steps:
/// 1. Collect the user's clicks (one similarity row per click)
/// 2. Users with no clicks get the global popularity ranking
/// 3. Score every unread article against every clicked one
/// 4. Greedily pull the best cell `n` times, clearing only that cell
pub struct ContentBasedRecommender;

impl ContentBasedRecommender {
    pub fn recommend(
        embeddings: &EmbeddingStore,
        interactions: &InteractionStore,
        user_id: UserId,
        n: usize,
    ) -> Result<Vec<ItemId>> {
        let read = interactions.items_read_by(user_id);

        if read.is_empty() {
            let popular = PopularityFallback::top_n(interactions, n);
            info!(
                user_id,
                recommendations = ?popular,
                "User has no clicks, serving most popular articles"
            );
            return Ok(popular);
        }

        debug!(user_id, read = read.len(), "Articles read by user");

        let read_vectors = embeddings.rows_for(&read)?;
        let read_set: HashSet<ItemId> = read.iter().copied().collect();
        let (candidates, candidate_vectors) = embeddings.candidates_excluding(&read_set);

        if candidates.is_empty() {
            return Err(RecoError::EmptyCandidates { user_id });
        }

        debug!(
            user_id,
            candidates = candidates.len(),
            "Candidate articles after removing read ones"
        );

        let mut similarities = cosine_similarity_matrix(&read_vectors, &candidate_vectors);
        Ok(Self::extract_greedy(&mut similarities, &candidates, n))
    }

    /// Take the global best cell `n` times, zeroing only that cell
    ///
    /// A candidate with strong scores against several read articles can be
    /// returned more than once.
    fn extract_greedy(
        similarities: &mut Array2<f32>,
        candidates: &[ItemId],
        n: usize,
    ) -> Vec<ItemId> {
        let mut recommendations = Vec::with_capacity(n);

        for _ in 0..n {
            let Some((row, col)) = argmax_cell(similarities) else {
                break;
            };
            recommendations.push(candidates[col]);
            similarities[[row, col]] = 0.0;
        }

        recommendations
    }
}
