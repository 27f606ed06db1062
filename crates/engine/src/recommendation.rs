//! Strategy dispatch
//!
//! Maps a strategy tag onto one of the recommenders and runs it against a
//! pair of in-memory stores.

use crate::co_visitation::CoVisitationRecommender;
use crate::collaborative::CollaborativeRecommender;
use crate::content_based::ContentBasedRecommender;
use crate::embeddings::EmbeddingStore;
use crate::hybrid::HybridRecommender;
use crate::interactions::InteractionStore;
use crate::types::{RecommendOutcome, UserId};
use crate::EngineConfig;
use article_reco_core::{RecoError, Result};
use std::fmt;
use std::str::FromStr;
use tracing::{info, instrument};

/// Recommendation strategy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Greedy embedding similarity (`ra`, `cb`)
    ContentBased,
    /// Latent-factor model trained per call (`cf`)
    Collaborative,
    /// Content pass + co-readers + popularity (`hy`)
    Hybrid,
    /// Co-readers + popularity, no training (`cv`)
    CoVisitation,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::ContentBased => "ra",
            Strategy::Collaborative => "cf",
            Strategy::Hybrid => "hy",
            Strategy::CoVisitation => "cv",
        }
    }
}

impl FromStr for Strategy {
    type Err = RecoError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ra" | "cb" => Ok(Strategy::ContentBased),
            "cf" => Ok(Strategy::Collaborative),
            "hy" => Ok(Strategy::Hybrid),
            "cv" => Ok(Strategy::CoVisitation),
            other => Err(RecoError::UnknownStrategy {
                tag: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry point that owns the engine configuration
pub struct RecommendationEngine {
    config: EngineConfig,
}

impl RecommendationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn with_default_config() -> Self {
        Self::new(EngineConfig::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run `strategy` for `user_id`
    ///
    /// The collaborative strategy scores the whole embedding catalogue, so
    /// articles nobody has clicked yet can still be suggested.
    #[instrument(skip(self, embeddings, interactions, strategy), fields(strategy = %strategy))]
    pub fn recommend(
        &self,
        embeddings: &EmbeddingStore,
        interactions: &InteractionStore,
        user_id: UserId,
        strategy: Strategy,
        n: usize,
    ) -> Result<RecommendOutcome> {
        let outcome: RecommendOutcome = match strategy {
            Strategy::ContentBased => {
                ContentBasedRecommender::recommend(embeddings, interactions, user_id, n)?.into()
            }
            Strategy::Collaborative => CollaborativeRecommender::new(
                self.config.svd.clone(),
                self.config.evaluation.clone(),
            )
            .recommend_from(interactions, embeddings.item_ids(), user_id, n)?,
            Strategy::Hybrid => {
                HybridRecommender::recommend(embeddings, interactions, user_id, n)?.into()
            }
            Strategy::CoVisitation => {
                CoVisitationRecommender::recommend(interactions, user_id, n).into()
            }
        };

        info!(user_id, result = %outcome, "Recommendations generated");
        Ok(outcome)
    }

    /// Same as [`recommend`](Self::recommend) with the configured default `n`
    pub fn recommend_default(
        &self,
        embeddings: &EmbeddingStore,
        interactions: &InteractionStore,
        user_id: UserId,
        strategy: Strategy,
    ) -> Result<RecommendOutcome> {
        self.recommend(
            embeddings,
            interactions,
            user_id,
            strategy,
            self.config.default_n,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactions::Interaction;

    #[test]
    fn test_strategy_tags() {
        assert_eq!("ra".parse::<Strategy>().unwrap(), Strategy::ContentBased);
        assert_eq!("cb".parse::<Strategy>().unwrap(), Strategy::ContentBased);
        assert_eq!("cf".parse::<Strategy>().unwrap(), Strategy::Collaborative);
        assert_eq!("hy".parse::<Strategy>().unwrap(), Strategy::Hybrid);
        assert_eq!("cv".parse::<Strategy>().unwrap(), Strategy::CoVisitation);
        assert_eq!(Strategy::Hybrid.to_string(), "hy");
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let err = "HY".parse::<Strategy>().unwrap_err();
        assert!(matches!(err, RecoError::UnknownStrategy { ref tag } if tag == "HY"));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_dispatch_uses_default_n() {
        let embeddings = EmbeddingStore::new(
            (0..8).map(|i| (i, vec![i as f32, 1.0])).collect(),
        )
        .unwrap();
        let interactions: InteractionStore = [(1, 0), (2, 0), (2, 1), (3, 2)]
            .into_iter()
            .map(|(u, i)| Interaction::new(u, i))
            .collect();

        let mut config = EngineConfig::default();
        config.default_n = 2;
        let engine = RecommendationEngine::new(config);

        let outcome = engine
            .recommend_default(&embeddings, &interactions, 1, Strategy::ContentBased)
            .unwrap();
        assert_eq!(outcome.items().map(<[i64]>::len), Some(2));
    }

    #[test]
    fn test_collaborative_unknown_user_through_dispatcher() {
        let embeddings = EmbeddingStore::new(vec![(0, vec![1.0]), (1, vec![2.0])]).unwrap();
        let interactions: InteractionStore =
            [Interaction::new(1, 0), Interaction::new(2, 1)].into_iter().collect();

        let outcome = RecommendationEngine::with_default_config()
            .recommend(&embeddings, &interactions, 3, Strategy::Collaborative, 5)
            .unwrap();
        assert!(outcome.is_user_not_found());
    }
}
