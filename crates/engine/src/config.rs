//! Environment-backed configuration for the engine and its data sources

use crate::collaborative::EvaluationConfig;
use crate::matrix_factorization::SvdConfig;
use crate::EngineConfig;
use article_reco_core::{
    parse_env_list, parse_env_var, parse_optional_env_var, ConfigLoader, RecoError,
};
use std::path::PathBuf;

/// # Environment Variables
///
/// - `ARTICLE_RECO_SVD_FACTORS` (default: 30)
/// - `ARTICLE_RECO_SVD_EPOCHS` (default: 10)
/// - `ARTICLE_RECO_SVD_LEARNING_RATE` (default: 0.003)
/// - `ARTICLE_RECO_SVD_REGULARIZATION` (default: 0.01)
/// - `ARTICLE_RECO_SVD_SEED` (optional): fixed seed for reproducible runs
impl ConfigLoader for SvdConfig {
    fn from_env() -> Result<Self, RecoError> {
        let defaults = SvdConfig::default();

        Ok(Self {
            latent_factors: parse_env_var("ARTICLE_RECO_SVD_FACTORS", defaults.latent_factors)?,
            epochs: parse_env_var("ARTICLE_RECO_SVD_EPOCHS", defaults.epochs)?,
            learning_rate: parse_env_var("ARTICLE_RECO_SVD_LEARNING_RATE", defaults.learning_rate)?,
            regularization: parse_env_var(
                "ARTICLE_RECO_SVD_REGULARIZATION",
                defaults.regularization,
            )?,
            init_std: defaults.init_std,
            seed: parse_optional_env_var("ARTICLE_RECO_SVD_SEED")?,
        })
    }

    fn validate(&self) -> Result<(), RecoError> {
        if self.latent_factors == 0 {
            return Err(RecoError::config(
                "latent_factors must be greater than 0",
                "ARTICLE_RECO_SVD_FACTORS",
            ));
        }

        if self.epochs == 0 {
            return Err(RecoError::config(
                "epochs must be greater than 0",
                "ARTICLE_RECO_SVD_EPOCHS",
            ));
        }

        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(RecoError::config(
                format!("learning_rate must be positive, got {}", self.learning_rate),
                "ARTICLE_RECO_SVD_LEARNING_RATE",
            ));
        }

        if !(self.regularization.is_finite() && self.regularization >= 0.0) {
            return Err(RecoError::config(
                format!(
                    "regularization must be non-negative, got {}",
                    self.regularization
                ),
                "ARTICLE_RECO_SVD_REGULARIZATION",
            ));
        }

        if !(self.init_std.is_finite() && self.init_std >= 0.0) {
            return Err(RecoError::ConfigurationError {
                message: format!("init_std must be non-negative, got {}", self.init_std),
                key: None,
            });
        }

        Ok(())
    }
}

/// # Environment Variables
///
/// - `ARTICLE_RECO_EVAL_TEST_SIZE` (default: 0.2)
/// - `ARTICLE_RECO_EVAL_K_LIST` (default: "5,10")
impl ConfigLoader for EvaluationConfig {
    fn from_env() -> Result<Self, RecoError> {
        let defaults = EvaluationConfig::default();

        Ok(Self {
            test_size: parse_env_var("ARTICLE_RECO_EVAL_TEST_SIZE", defaults.test_size)?,
            k_list: parse_env_list("ARTICLE_RECO_EVAL_K_LIST", defaults.k_list)?,
        })
    }

    fn validate(&self) -> Result<(), RecoError> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(RecoError::config(
                format!("test_size must be in (0, 1), got {}", self.test_size),
                "ARTICLE_RECO_EVAL_TEST_SIZE",
            ));
        }

        if self.k_list.is_empty() {
            return Err(RecoError::config(
                "k_list must contain at least one cutoff",
                "ARTICLE_RECO_EVAL_K_LIST",
            ));
        }

        Ok(())
    }
}

/// # Environment Variables
///
/// All `SvdConfig` and `EvaluationConfig` variables, plus
/// `ARTICLE_RECO_DEFAULT_N` (default: 5).
impl ConfigLoader for EngineConfig {
    fn from_env() -> Result<Self, RecoError> {
        Ok(Self {
            svd: SvdConfig::from_env()?,
            evaluation: EvaluationConfig::from_env()?,
            default_n: parse_env_var("ARTICLE_RECO_DEFAULT_N", EngineConfig::default().default_n)?,
        })
    }

    fn validate(&self) -> Result<(), RecoError> {
        self.svd.validate()?;
        self.evaluation.validate()?;

        if self.default_n == 0 {
            return Err(RecoError::config(
                "default_n must be greater than 0",
                "ARTICLE_RECO_DEFAULT_N",
            ));
        }

        Ok(())
    }
}

/// Locations of the two input tables
///
/// # Environment Variables
///
/// - `ARTICLE_RECO_EMBEDDINGS_PATH` (required): JSON array of article embeddings
/// - `ARTICLE_RECO_CLICKS_PATH` (required): JSON array of click events
#[derive(Debug, Clone, PartialEq)]
pub struct DataConfig {
    pub embeddings_path: PathBuf,
    pub clicks_path: PathBuf,
}

impl ConfigLoader for DataConfig {
    fn from_env() -> Result<Self, RecoError> {
        let embeddings_path = std::env::var("ARTICLE_RECO_EMBEDDINGS_PATH").map_err(|_| {
            RecoError::config(
                "ARTICLE_RECO_EMBEDDINGS_PATH environment variable is required",
                "ARTICLE_RECO_EMBEDDINGS_PATH",
            )
        })?;

        let clicks_path = std::env::var("ARTICLE_RECO_CLICKS_PATH").map_err(|_| {
            RecoError::config(
                "ARTICLE_RECO_CLICKS_PATH environment variable is required",
                "ARTICLE_RECO_CLICKS_PATH",
            )
        })?;

        Ok(Self {
            embeddings_path: PathBuf::from(embeddings_path),
            clicks_path: PathBuf::from(clicks_path),
        })
    }

    fn validate(&self) -> Result<(), RecoError> {
        if self.embeddings_path.as_os_str().is_empty() {
            return Err(RecoError::config(
                "embeddings path cannot be empty",
                "ARTICLE_RECO_EMBEDDINGS_PATH",
            ));
        }

        if self.clicks_path.as_os_str().is_empty() {
            return Err(RecoError::config(
                "clicks path cannot be empty",
                "ARTICLE_RECO_CLICKS_PATH",
            ));
        }

        Ok(())
    }
}
