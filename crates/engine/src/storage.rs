//! JSON table loading
//!
//! Reads the embedding and click tables from disk and builds the in-memory
//! stores. Any I/O, parse or coercion failure surfaces as
//! [`RecoError::DataLoad`].

use crate::config::DataConfig;
use crate::embeddings::{EmbeddingRecord, EmbeddingStore};
use crate::interactions::{ClickRecord, InteractionStore};
use article_reco_core::{RecoError, Result};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// On-disk source for both input tables
#[derive(Debug, Clone)]
pub struct TableSource {
    embeddings_path: PathBuf,
    clicks_path: PathBuf,
}

impl TableSource {
    pub fn new(embeddings_path: impl Into<PathBuf>, clicks_path: impl Into<PathBuf>) -> Self {
        Self {
            embeddings_path: embeddings_path.into(),
            clicks_path: clicks_path.into(),
        }
    }

    pub fn from_config(config: &DataConfig) -> Self {
        Self::new(config.embeddings_path.clone(), config.clicks_path.clone())
    }

    pub fn load_embeddings(&self) -> Result<EmbeddingStore> {
        let records: Vec<EmbeddingRecord> = read_json(&self.embeddings_path)?;
        let store = EmbeddingStore::from_records(&records).map_err(into_load_error)?;
        debug!(
            path = %self.embeddings_path.display(),
            items = store.len(),
            dimension = store.dimension(),
            "Embeddings loaded"
        );
        Ok(store)
    }

    pub fn load_interactions(&self) -> Result<InteractionStore> {
        let records: Vec<ClickRecord> = read_json(&self.clicks_path)?;
        let store = InteractionStore::from_records(&records).map_err(into_load_error)?;
        debug!(
            path = %self.clicks_path.display(),
            clicks = store.len(),
            users = store.user_count(),
            "Clicks loaded"
        );
        Ok(store)
    }

    /// Load both tables
    pub fn load(&self) -> Result<(EmbeddingStore, InteractionStore)> {
        Ok((self.load_embeddings()?, self.load_interactions()?))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)
        .map_err(|e| RecoError::DataLoad(format!("Failed to open {}: {}", path.display(), e)))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| RecoError::DataLoad(format!("Failed to parse {}: {}", path.display(), e)))
}

fn into_load_error(err: RecoError) -> RecoError {
    match err {
        RecoError::DataLoad(_) => err,
        other => RecoError::DataLoad(other.to_string()),
    }
}
