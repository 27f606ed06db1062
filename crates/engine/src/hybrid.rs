//! Hybrid recommender
//!
//! Concatenates a per-click content pass with a co-reader pass and tops the
//! list up from global popularity.

use crate::cold_start::PopularityFallback;
use crate::embeddings::EmbeddingStore;
use crate::interactions::InteractionStore;
use crate::similarity::{argmax, cosine_similarity_matrix};
use crate::types::{ItemId, UserId};
use article_reco_core::{RecoError, Result};
use std::collections::HashSet;
use tracing::debug;

pub struct HybridRecommender;

impl HybridRecommender {
    pub fn recommend(
        embeddings: &EmbeddingStore,
        interactions: &InteractionStore,
        user_id: UserId,
        n: usize,
    ) -> Result<Vec<ItemId>> {
        let read = interactions.items_read_by(user_id);
        let read_set: HashSet<ItemId> = read.iter().copied().collect();

        let content = Self::content_pass(embeddings, user_id, &read, &read_set)?;
        let collaborative = interactions.co_reader_items(user_id);

        debug!(
            user_id,
            content = content.len(),
            collaborative = collaborative.len(),
            "Hybrid candidate passes"
        );

        let mut recommendations = content;
        recommendations.extend(collaborative);
        PopularityFallback::backfill(&mut recommendations, &read_set, interactions, n);
        recommendations.truncate(n);

        Ok(recommendations)
    }

    /// Best unread candidate for each read row, duplicates kept
    ///
    /// A user who has read the whole catalogue leaves nothing to score and
    /// fails with `EmptyCandidates`, same as the content-based path.
    fn content_pass(
        embeddings: &EmbeddingStore,
        user_id: UserId,
        read: &[ItemId],
        read_set: &HashSet<ItemId>,
    ) -> Result<Vec<ItemId>> {
        if read.is_empty() {
            return Ok(Vec::new());
        }

        let read_vectors = embeddings.rows_for(read)?;
        let (candidates, candidate_vectors) = embeddings.candidates_excluding(read_set);
        if candidates.is_empty() {
            return Err(RecoError::EmptyCandidates { user_id });
        }

        let similarities = cosine_similarity_matrix(&read_vectors, &candidate_vectors);
        Ok(similarities
            .rows()
            .into_iter()
            .filter_map(argmax)
            .map(|col| candidates[col])
            .collect())
    }
}
