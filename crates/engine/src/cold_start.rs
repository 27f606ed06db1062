//! Popularity fallback
//!
//! Serves users with no click history and tops up short candidate lists with
//! the globally most clicked items.

use crate::interactions::InteractionStore;
use crate::types::ItemId;
use std::collections::HashSet;

pub struct PopularityFallback;

impl PopularityFallback {
    /// Top `n` items by click count across all users
    pub fn top_n(interactions: &InteractionStore, n: usize) -> Vec<ItemId> {
        interactions.most_popular(n)
    }

    /// Append popular items until `recommendations` holds `n` entries
    ///
    /// Skips items already present or already read. Existing entries are left
    /// untouched, so a list that is already long enough is not modified.
    pub fn backfill(
        recommendations: &mut Vec<ItemId>,
        read: &HashSet<ItemId>,
        interactions: &InteractionStore,
        n: usize,
    ) {
        if recommendations.len() >= n {
            return;
        }

        let mut present: HashSet<ItemId> = recommendations.iter().copied().collect();
        for (item, _) in interactions.popularity() {
            if recommendations.len() >= n {
                break;
            }
            if !read.contains(&item) && present.insert(item) {
                recommendations.push(item);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactions::Interaction;

    fn store() -> InteractionStore {
        [(1, 5), (2, 5), (3, 5), (2, 6), (3, 6), (4, 7), (1, 8)]
            .into_iter()
            .map(|(u, i)| Interaction::new(u, i))
            .collect()
    }

    #[test]
    fn test_top_n() {
        assert_eq!(PopularityFallback::top_n(&store(), 2), vec![5, 6]);
        assert!(PopularityFallback::top_n(&InteractionStore::default(), 3).is_empty());
    }

    #[test]
    fn test_backfill_skips_read_and_present() {
        let read: HashSet<ItemId> = [5].into_iter().collect();
        let mut recs = vec![7];
        PopularityFallback::backfill(&mut recs, &read, &store(), 3);
        assert_eq!(recs, vec![7, 6, 8]);
    }

    #[test]
    fn test_backfill_stops_when_pool_exhausted() {
        let read: HashSet<ItemId> = [5, 6].into_iter().collect();
        let mut recs = Vec::new();
        PopularityFallback::backfill(&mut recs, &read, &store(), 10);
        assert_eq!(recs, vec![7, 8]);
    }

    #[test]
    fn test_backfill_leaves_long_lists_alone() {
        let mut recs = vec![1, 1, 2];
        PopularityFallback::backfill(&mut recs, &HashSet::new(), &store(), 2);
        assert_eq!(recs, vec![1, 1, 2]);
    }
}
