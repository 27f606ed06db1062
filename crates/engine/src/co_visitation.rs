//! Co-visitation recommender
//!
//! Training-free neighbourhood filtering: suggest what people who read the
//! same articles also read, then fill up with popular items.

use crate::cold_start::PopularityFallback;
use crate::interactions::InteractionStore;
use crate::types::{ItemId, UserId};
use tracing::debug;

pub struct CoVisitationRecommender;

impl CoVisitationRecommender {
    pub fn recommend(interactions: &InteractionStore, user_id: UserId, n: usize) -> Vec<ItemId> {
        let read = interactions.read_set(user_id);
        let mut recommendations = interactions.co_reader_items(user_id);

        debug!(
            user_id,
            similar_users = interactions.similar_users(user_id).len(),
            co_read = recommendations.len(),
            "Co-visitation candidates"
        );

        PopularityFallback::backfill(&mut recommendations, &read, interactions, n);
        recommendations.truncate(n);
        recommendations
    }
}
