//! Offline evaluation: precision@k and recall@k
//!
//! Relevance is exact equality between the true and the estimated rating.
//! Users whose denominators are zero score 1.0 (vacuous truth).

use crate::types::{ItemId, UserId};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::info;

/// Extra information attached to a held-out prediction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PredictionDetails {
    /// The model had no factors for the user or the item
    pub was_impossible: bool,
}

/// Model estimate for one held-out rating
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub true_rating: f32,
    pub estimated_rating: f32,
    pub details: PredictionDetails,
}

/// Per-k, per-user precision and recall
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrecisionRecall {
    pub precisions: BTreeMap<usize, BTreeMap<UserId, f64>>,
    pub recalls: BTreeMap<usize, BTreeMap<UserId, f64>>,
}

impl PrecisionRecall {
    /// Mean precision@k over users; `None` when no user was evaluated
    pub fn mean_precision(&self, k: usize) -> Option<f64> {
        self.precisions.get(&k).and_then(mean)
    }

    /// Mean recall@k over users; `None` when no user was evaluated
    pub fn mean_recall(&self, k: usize) -> Option<f64> {
        self.recalls.get(&k).and_then(mean)
    }

    pub fn precision(&self, k: usize, user_id: UserId) -> Option<f64> {
        self.precisions.get(&k)?.get(&user_id).copied()
    }

    pub fn recall(&self, k: usize, user_id: UserId) -> Option<f64> {
        self.recalls.get(&k)?.get(&user_id).copied()
    }
}

fn mean(values: &BTreeMap<UserId, f64>) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.values().sum::<f64>() / values.len() as f64)
    }
}

/// Precision and recall at every k in `k_list`
///
/// Predictions are grouped per user and sorted by estimate, highest first;
/// the sort is stable so equal estimates keep their input order.
pub fn precision_recall_at_k(predictions: &[Prediction], k_list: &[usize]) -> PrecisionRecall {
    let mut per_user: BTreeMap<UserId, Vec<(f32, f32)>> = BTreeMap::new();
    for p in predictions {
        per_user
            .entry(p.user_id)
            .or_default()
            .push((p.estimated_rating, p.true_rating));
    }

    let mut result = PrecisionRecall {
        precisions: k_list.iter().map(|&k| (k, BTreeMap::new())).collect(),
        recalls: k_list.iter().map(|&k| (k, BTreeMap::new())).collect(),
    };

    for (user_id, mut ratings) in per_user {
        ratings.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

        let is_relevant = |&(est, true_r): &(f32, f32)| true_r == est;
        let n_rel = ratings.iter().filter(|r| is_relevant(*r)).count();

        for &k in k_list {
            let top_k = &ratings[..k.min(ratings.len())];
            let n_rec_k = top_k.len();
            let n_rel_and_rec_k = top_k.iter().filter(|r| is_relevant(*r)).count();

            let precision = if n_rec_k != 0 {
                n_rel_and_rec_k as f64 / n_rec_k as f64
            } else {
                1.0
            };
            let recall = if n_rel != 0 {
                n_rel_and_rec_k as f64 / n_rel as f64
            } else {
                1.0
            };

            if let Some(map) = result.precisions.get_mut(&k) {
                map.insert(user_id, precision);
            }
            if let Some(map) = result.recalls.get_mut(&k) {
                map.insert(user_id, recall);
            }
        }
    }

    result
}

/// Outcome of the held-out evaluation run during collaborative training
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    pub train_ratings: usize,
    pub test_ratings: usize,
    pub k_list: Vec<usize>,
    pub metrics: PrecisionRecall,
}

impl EvaluationReport {
    /// Emit the per-k averages as log records
    pub fn log(&self) {
        for &k in &self.k_list {
            match (self.metrics.mean_precision(k), self.metrics.mean_recall(k)) {
                (Some(precision), Some(recall)) => info!(
                    k,
                    avg_precision = precision,
                    avg_recall = recall,
                    train_ratings = self.train_ratings,
                    test_ratings = self.test_ratings,
                    "Held-out evaluation"
                ),
                _ => info!(
                    k,
                    test_ratings = self.test_ratings,
                    "Held-out evaluation skipped: no test users"
                ),
            }
        }
    }
}
