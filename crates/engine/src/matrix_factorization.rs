//! Matrix Factorization trained by Stochastic Gradient Descent
//!
//! Biased latent-factor model for implicit click-count ratings:
//! `r_hat(u, i) = mu + b_u + b_i + p_u . q_i`. Training and scoring are split:
//! [`MatrixFactorization::fit`] produces an immutable [`TrainedModel`].

use crate::evaluation::{Prediction, PredictionDetails};
use crate::interactions::InteractionStore;
use crate::types::{ItemId, UserId};
use article_reco_core::{RecoError, Result};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// SGD configuration parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SvdConfig {
    /// Number of latent factors
    pub latent_factors: usize,
    /// Passes over the training ratings
    pub epochs: usize,
    /// SGD step size shared by biases and factors
    pub learning_rate: f32,
    /// L2 penalty shared by biases and factors
    pub regularization: f32,
    /// Factors start uniform in `[-init_std, init_std]`
    pub init_std: f32,
    /// Seed for the train/test split and factor initialization
    pub seed: Option<u64>,
}

impl Default for SvdConfig {
    fn default() -> Self {
        Self {
            latent_factors: 30,
            epochs: 10,
            learning_rate: 0.003,
            regularization: 0.01,
            init_std: 0.1,
            seed: None,
        }
    }
}

impl SvdConfig {
    /// RNG for one training run; seeded runs are reproducible
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Closed interval ratings are clipped to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingScale {
    pub min: f32,
    pub max: f32,
}

impl RatingScale {
    pub fn clip(&self, value: f32) -> f32 {
        value.max(self.min).min(self.max)
    }
}

/// One observed (user, item, rating) triple
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rating {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub value: f32,
}

/// Sparse user-item rating matrix in coordinate form
#[derive(Debug, Clone, PartialEq)]
pub struct RatingMatrix {
    pub ratings: Vec<Rating>,
    pub scale: RatingScale,
}

impl RatingMatrix {
    /// Click counts per (user, item) on the scale `[1, max count]`
    pub fn from_interactions(interactions: &InteractionStore) -> Self {
        let ratings: Vec<Rating> = interactions
            .click_counts()
            .into_iter()
            .map(|(user_id, item_id, count)| Rating {
                user_id,
                item_id,
                value: count as f32,
            })
            .collect();

        let max = ratings.iter().map(|r| r.value).fold(1.0f32, f32::max);

        Self {
            ratings,
            scale: RatingScale { min: 1.0, max },
        }
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// Shuffle and hold out `ceil(test_size * len)` ratings
    ///
    /// Returns the training matrix (same scale) and the held-out ratings.
    pub fn train_test_split(&self, test_size: f64, rng: &mut StdRng) -> (RatingMatrix, Vec<Rating>) {
        let mut shuffled = self.ratings.clone();
        shuffled.shuffle(rng);

        let n_test = ((test_size * shuffled.len() as f64).ceil() as usize).min(shuffled.len());
        let train = shuffled.split_off(n_test);

        (
            RatingMatrix {
                ratings: train,
                scale: self.scale,
            },
            shuffled,
        )
    }
}

/// SGD-based matrix factorization trainer
pub struct MatrixFactorization {
    config: SvdConfig,
}

impl MatrixFactorization {
    pub fn new(config: SvdConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SvdConfig {
        &self.config
    }

    /// Train on every rating of `matrix`
    pub fn fit(&self, matrix: &RatingMatrix, rng: &mut StdRng) -> Result<TrainedModel> {
        if matrix.is_empty() {
            return Err(RecoError::EmptyTrainingSet);
        }

        let k = self.config.latent_factors;
        let lr = self.config.learning_rate;
        let reg = self.config.regularization;

        // Map raw ids to dense indices in first-seen order
        let mut user_id_map: HashMap<UserId, usize> = HashMap::new();
        let mut item_id_map: HashMap<ItemId, usize> = HashMap::new();
        let mut samples: Vec<(usize, usize, f32)> = Vec::with_capacity(matrix.len());

        for rating in &matrix.ratings {
            let next_user = user_id_map.len();
            let user_idx = *user_id_map.entry(rating.user_id).or_insert(next_user);
            let next_item = item_id_map.len();
            let item_idx = *item_id_map.entry(rating.item_id).or_insert(next_item);
            samples.push((user_idx, item_idx, rating.value));
        }

        let global_mean =
            samples.iter().map(|&(_, _, r)| r as f64).sum::<f64>() as f32 / samples.len() as f32;

        let mut user_bias = Array1::<f32>::zeros(user_id_map.len());
        let mut item_bias = Array1::<f32>::zeros(item_id_map.len());
        let mut user_factors = Array2::<f32>::zeros((user_id_map.len(), k));
        let mut item_factors = Array2::<f32>::zeros((item_id_map.len(), k));

        let init = self.config.init_std;
        if init > 0.0 {
            user_factors.mapv_inplace(|_| rng.gen_range(-init..init));
            item_factors.mapv_inplace(|_| rng.gen_range(-init..init));
        }

        for epoch in 0..self.config.epochs {
            for &(u, i, rating) in &samples {
                let dot = user_factors.row(u).dot(&item_factors.row(i));
                let err = rating - (global_mean + user_bias[u] + item_bias[i] + dot);

                user_bias[u] += lr * (err - reg * user_bias[u]);
                item_bias[i] += lr * (err - reg * item_bias[i]);

                for f in 0..k {
                    let puf = user_factors[[u, f]];
                    let qif = item_factors[[i, f]];
                    user_factors[[u, f]] += lr * (err * qif - reg * puf);
                    item_factors[[i, f]] += lr * (err * puf - reg * qif);
                }
            }

            tracing::debug!(
                epoch,
                loss = compute_loss(
                    &samples,
                    global_mean,
                    &user_bias,
                    &item_bias,
                    &user_factors,
                    &item_factors
                ),
                "SGD epoch finished"
            );
        }

        Ok(TrainedModel {
            global_mean,
            user_bias,
            item_bias,
            user_factors,
            item_factors,
            user_id_map,
            item_id_map,
            scale: matrix.scale,
        })
    }
}

/// Mean squared reconstruction error over the training samples
fn compute_loss(
    samples: &[(usize, usize, f32)],
    global_mean: f32,
    user_bias: &Array1<f32>,
    item_bias: &Array1<f32>,
    user_factors: &Array2<f32>,
    item_factors: &Array2<f32>,
) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let loss: f32 = samples
        .iter()
        .map(|&(u, i, rating)| {
            let prediction = global_mean
                + user_bias[u]
                + item_bias[i]
                + user_factors.row(u).dot(&item_factors.row(i));
            (rating - prediction).powi(2)
        })
        .sum();

    loss / samples.len() as f32
}

/// Immutable output of a training run
#[derive(Debug, Clone)]
pub struct TrainedModel {
    global_mean: f32,
    user_bias: Array1<f32>,
    item_bias: Array1<f32>,
    /// User latent factors: [num_users x latent_factors]
    user_factors: Array2<f32>,
    /// Item latent factors: [num_items x latent_factors]
    item_factors: Array2<f32>,
    user_id_map: HashMap<UserId, usize>,
    item_id_map: HashMap<ItemId, usize>,
    scale: RatingScale,
}

impl TrainedModel {
    /// Predicted affinity clipped to the rating scale
    ///
    /// Terms for an unseen user or item are dropped, so a pair with neither
    /// known falls back to the global mean.
    pub fn predict(&self, user_id: UserId, item_id: ItemId) -> f32 {
        let user_idx = self.user_id_map.get(&user_id).copied();
        let item_idx = self.item_id_map.get(&item_id).copied();

        let mut estimate = self.global_mean;
        if let Some(u) = user_idx {
            estimate += self.user_bias[u];
        }
        if let Some(i) = item_idx {
            estimate += self.item_bias[i];
        }
        if let (Some(u), Some(i)) = (user_idx, item_idx) {
            estimate += self.user_factors.row(u).dot(&self.item_factors.row(i));
        }

        self.scale.clip(estimate)
    }

    /// Predict every held-out rating
    pub fn test(&self, ratings: &[Rating]) -> Vec<Prediction> {
        ratings
            .iter()
            .map(|r| Prediction {
                user_id: r.user_id,
                item_id: r.item_id,
                true_rating: r.value,
                estimated_rating: self.predict(r.user_id, r.item_id),
                details: PredictionDetails {
                    was_impossible: !(self.knows_user(r.user_id) && self.knows_item(r.item_id)),
                },
            })
            .collect()
    }

    pub fn knows_user(&self, user_id: UserId) -> bool {
        self.user_id_map.contains_key(&user_id)
    }

    pub fn knows_item(&self, item_id: ItemId) -> bool {
        self.item_id_map.contains_key(&item_id)
    }

    pub fn global_mean(&self) -> f32 {
        self.global_mean
    }

    pub fn latent_factors(&self) -> usize {
        self.user_factors.ncols()
    }

    pub fn scale(&self) -> RatingScale {
        self.scale
    }

    /// Get user embedding
    pub fn user_embedding(&self, user_id: UserId) -> Option<Vec<f32>> {
        let idx = self.user_id_map.get(&user_id)?;
        Some(self.user_factors.row(*idx).to_vec())
    }

    /// Get item embedding
    pub fn item_embedding(&self, item_id: ItemId) -> Option<Vec<f32>> {
        let idx = self.item_id_map.get(&item_id)?;
        Some(self.item_factors.row(*idx).to_vec())
    }
}
