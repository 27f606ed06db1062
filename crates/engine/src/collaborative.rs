//! Collaborative Filtering Pipeline
//!
//! Trains a biased latent-factor model on implicit click counts, reports
//! held-out precision/recall, then ranks the user's unread items by predicted
//! affinity.

use crate::evaluation::{precision_recall_at_k, EvaluationReport};
use crate::interactions::InteractionStore;
use crate::matrix_factorization::{MatrixFactorization, RatingMatrix, SvdConfig, TrainedModel};
use crate::types::{ItemId, RecommendOutcome, UserId};
use article_reco_core::{RecoError, Result};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Held-out evaluation settings
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationConfig {
    /// Fraction of ratings held out, rounded up
    pub test_size: f64,
    /// Cutoffs for precision@k / recall@k
    pub k_list: Vec<usize>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            k_list: vec![5, 10],
        }
    }
}

/// Collaborative Filtering Engine
pub struct CollaborativeRecommender {
    svd: SvdConfig,
    evaluation: EvaluationConfig,
}

impl CollaborativeRecommender {
    pub fn new(svd: SvdConfig, evaluation: EvaluationConfig) -> Self {
        Self { svd, evaluation }
    }

    pub fn with_default_config() -> Self {
        Self::new(SvdConfig::default(), EvaluationConfig::default())
    }

    /// Split, fit on the training partition and evaluate on the rest
    pub fn train(&self, interactions: &InteractionStore) -> Result<(TrainedModel, EvaluationReport)> {
        let mut rng = self.svd.rng();
        let matrix = RatingMatrix::from_interactions(interactions);
        let (train, test) = matrix.train_test_split(self.evaluation.test_size, &mut rng);

        if train.is_empty() {
            return Err(RecoError::EmptyTrainingSet);
        }

        debug!(
            train_ratings = train.len(),
            test_ratings = test.len(),
            max_rating = matrix.scale.max,
            "Rating matrix split"
        );

        let model = MatrixFactorization::new(self.svd.clone()).fit(&train, &mut rng)?;
        let predictions = model.test(&test);

        let report = EvaluationReport {
            train_ratings: train.len(),
            test_ratings: test.len(),
            k_list: self.evaluation.k_list.clone(),
            metrics: precision_recall_at_k(&predictions, &self.evaluation.k_list),
        };
        report.log();

        Ok((model, report))
    }

    /// Rank `candidates` the user has not clicked by predicted affinity
    ///
    /// The sort is stable, so equal scores keep candidate order.
    pub fn score(
        model: &TrainedModel,
        interactions: &InteractionStore,
        candidates: &[ItemId],
        user_id: UserId,
        n: usize,
    ) -> RecommendOutcome {
        if !interactions.contains_user(user_id) {
            return RecommendOutcome::UserNotFound(user_id);
        }

        let read = interactions.read_set(user_id);
        let mut scored: Vec<(ItemId, f32)> = candidates
            .iter()
            .copied()
            .filter(|item| !read.contains(item))
            .map(|item| (item, model.predict(user_id, item)))
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        RecommendOutcome::Items(scored.into_iter().take(n).map(|(item, _)| item).collect())
    }

    /// Train then score over the items seen in the click log
    pub fn recommend(
        &self,
        interactions: &InteractionStore,
        user_id: UserId,
        n: usize,
    ) -> Result<RecommendOutcome> {
        let candidates = interactions.distinct_items();
        self.recommend_from(interactions, &candidates, user_id, n)
    }

    /// Train then score over an explicit candidate catalogue
    pub fn recommend_from(
        &self,
        interactions: &InteractionStore,
        candidates: &[ItemId],
        user_id: UserId,
        n: usize,
    ) -> Result<RecommendOutcome> {
        if !interactions.contains_user(user_id) {
            warn!(user_id, "User not found in clicks data");
            return Ok(RecommendOutcome::UserNotFound(user_id));
        }

        let (model, _report) = self.train(interactions)?;
        Ok(Self::score(&model, interactions, candidates, user_id, n))
    }
}
