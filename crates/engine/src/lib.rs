//! Article Recommendation Engine
//!
//! Content-similarity, latent-factor collaborative, hybrid and co-visitation
//! recommenders over an in-memory click log and article embedding table, plus
//! the held-out precision/recall harness used to report model quality.

pub mod cold_start;
pub mod co_visitation;
pub mod collaborative;
pub mod config;
pub mod content_based;
pub mod embeddings;
pub mod evaluation;
pub mod hybrid;
pub mod interactions;
pub mod matrix_factorization;
pub mod recommendation;
pub mod server;
pub mod similarity;
pub mod storage;
pub mod types;

// Re-export key types
pub use cold_start::PopularityFallback;
pub use co_visitation::CoVisitationRecommender;
pub use collaborative::{CollaborativeRecommender, EvaluationConfig};
pub use config::DataConfig;
pub use content_based::ContentBasedRecommender;
pub use embeddings::{EmbeddingRecord, EmbeddingStore};
pub use evaluation::{
    precision_recall_at_k, EvaluationReport, PrecisionRecall, Prediction, PredictionDetails,
};
pub use hybrid::HybridRecommender;
pub use interactions::{ClickRecord, Interaction, InteractionStore};
pub use matrix_factorization::{
    MatrixFactorization, Rating, RatingMatrix, RatingScale, SvdConfig, TrainedModel,
};
pub use recommendation::{RecommendationEngine, Strategy};
pub use storage::TableSource;
pub use types::*;

/// Engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Latent-factor model hyperparameters
    pub svd: SvdConfig,
    /// Held-out split and cutoffs for precision/recall
    pub evaluation: EvaluationConfig,
    /// Recommendations returned when a caller gives no count (default: 5)
    pub default_n: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            svd: SvdConfig::default(),
            evaluation: EvaluationConfig::default(),
            default_n: 5,
        }
    }
}
