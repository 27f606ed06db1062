//! # Article Reco Core
//!
//! Shared building blocks for the article recommendation workspace.
//!
//! ## Modules
//!
//! - `error`: Error types and handling
//! - `config`: Configuration loading and validation
//! - `observability`: Structured logging initialization
//! - `math`: Vector operations

pub mod config;
pub mod error;
pub mod math;
pub mod observability;

// Re-export commonly used types
pub use config::{
    load_dotenv, parse_env_list, parse_env_var, parse_optional_env_var, ConfigLoader,
    ServiceConfig,
};
pub use error::RecoError;
pub use math::{dot_product, l2_norm};
pub use observability::{init_logging, LogConfig, LogFormat, ObservabilityError};

/// Result type alias for recommendation operations
pub type Result<T> = std::result::Result<T, RecoError>;
