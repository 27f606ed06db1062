//! Error types shared across the recommendation workspace
//!
//! Every fallible core operation returns [`RecoError`]. The one recoverable
//! "user not found" case of collaborative filtering is modelled as data by the
//! engine, not as a variant here.

use thiserror::Error;

/// Errors raised by the recommendation core and its service wrapper
#[derive(Debug, Error)]
pub enum RecoError {
    /// A raw user or item identifier could not be coerced to an integer
    #[error("Invalid identifier: {value}")]
    InvalidIdentifier { value: String },

    /// The embedding table holds the same item twice
    #[error("Duplicate embedding for item {item_id}")]
    DuplicateItem { item_id: i64 },

    /// An embedding vector does not match the table's dimensionality
    #[error("Embedding for item {item_id} has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        item_id: i64,
        expected: usize,
        actual: usize,
    },

    /// An item referenced by the click log has no embedding
    #[error("No embedding for item {item_id}")]
    MissingEmbedding { item_id: i64 },

    /// Every catalogue item was already read, so there is nothing to score
    #[error("No unread candidate items for user {user_id}")]
    EmptyCandidates { user_id: i64 },

    /// The training partition of the rating matrix has no ratings
    #[error("Training set is empty")]
    EmptyTrainingSet,

    /// Unrecognised strategy selector
    #[error("Unknown recommendation strategy: {tag}")]
    UnknownStrategy { tag: String },

    /// Configuration could not be parsed or failed validation
    #[error("Configuration error: {message}")]
    ConfigurationError {
        message: String,
        key: Option<String>,
    },

    /// Input tables could not be loaded
    #[error("Data load error: {0}")]
    DataLoad(String),
}

impl RecoError {
    /// Build a configuration error bound to an environment key
    pub fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Whether the error stems from caller input rather than an internal fault
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidIdentifier { .. } | Self::UnknownStrategy { .. }
        )
    }
}
