//! Article embedding store
//!
//! Dense `[num_items x dim]` matrix with an id -> row index. Catalogue order is
//! the order rows were supplied in.

use crate::types::{ItemId, RawId};
use article_reco_core::{RecoError, Result};
use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Embedding row as exported upstream, before identifier coercion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    #[serde(alias = "item_id")]
    pub article_id: RawId,
    pub embedding: Vec<f32>,
}

/// Immutable item embedding table
#[derive(Debug, Clone)]
pub struct EmbeddingStore {
    item_ids: Vec<ItemId>,
    index: HashMap<ItemId, usize>,
    vectors: Array2<f32>,
}

impl EmbeddingStore {
    /// Build from `(item, vector)` pairs
    ///
    /// Fails on a duplicate item or a vector whose length differs from the
    /// first one.
    pub fn new(entries: Vec<(ItemId, Vec<f32>)>) -> Result<Self> {
        let dim = entries.first().map(|(_, v)| v.len()).unwrap_or(0);
        let mut item_ids = Vec::with_capacity(entries.len());
        let mut index = HashMap::with_capacity(entries.len());
        let mut flat = Vec::with_capacity(entries.len() * dim);

        for (item_id, vector) in entries {
            if vector.len() != dim {
                return Err(RecoError::DimensionMismatch {
                    item_id,
                    expected: dim,
                    actual: vector.len(),
                });
            }
            if index.insert(item_id, item_ids.len()).is_some() {
                return Err(RecoError::DuplicateItem { item_id });
            }
            item_ids.push(item_id);
            flat.extend(vector);
        }

        let vectors = Array2::from_shape_vec((item_ids.len(), dim), flat)
            .map_err(|e| RecoError::DataLoad(format!("Invalid embedding shape: {}", e)))?;

        Ok(Self {
            item_ids,
            index,
            vectors,
        })
    }

    /// Build from raw rows, coercing every identifier once
    pub fn from_records(records: &[EmbeddingRecord]) -> Result<Self> {
        let entries = records
            .iter()
            .map(|r| -> Result<(ItemId, Vec<f32>)> { Ok((r.article_id.to_id()?, r.embedding.clone())) })
            .collect::<Result<Vec<_>>>()?;
        Self::new(entries)
    }

    pub fn len(&self) -> usize {
        self.item_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.item_ids.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.vectors.ncols()
    }

    /// Item ids in catalogue order
    pub fn item_ids(&self) -> &[ItemId] {
        &self.item_ids
    }

    pub fn contains(&self, item_id: ItemId) -> bool {
        self.index.contains_key(&item_id)
    }

    pub fn get(&self, item_id: ItemId) -> Result<ArrayView1<'_, f32>> {
        self.index
            .get(&item_id)
            .map(|&row| self.vectors.row(row))
            .ok_or(RecoError::MissingEmbedding { item_id })
    }

    /// Stack the vectors of `items`, one row per entry (repeats allowed)
    pub fn rows_for(&self, items: &[ItemId]) -> Result<Array2<f32>> {
        let rows = items
            .iter()
            .map(|&item_id| {
                self.index
                    .get(&item_id)
                    .copied()
                    .ok_or(RecoError::MissingEmbedding { item_id })
            })
            .collect::<Result<Vec<usize>>>()?;
        Ok(self.vectors.select(Axis(0), &rows))
    }

    /// Catalogue minus `excluded`, as ids plus their stacked vectors
    pub fn candidates_excluding(&self, excluded: &HashSet<ItemId>) -> (Vec<ItemId>, Array2<f32>) {
        let (ids, rows): (Vec<ItemId>, Vec<usize>) = self
            .item_ids
            .iter()
            .enumerate()
            .filter(|(_, item)| !excluded.contains(item))
            .map(|(row, &item)| (item, row))
            .unzip();
        (ids, self.vectors.select(Axis(0), &rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EmbeddingStore {
        EmbeddingStore::new(vec![
            (10, vec![1.0, 0.0]),
            (11, vec![0.0, 1.0]),
            (12, vec![1.0, 1.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_store_shape_and_lookup() {
        let store = sample();
        assert_eq!(store.len(), 3);
        assert_eq!(store.dimension(), 2);
        assert_eq!(store.item_ids(), &[10, 11, 12]);
        assert_eq!(store.get(11).unwrap().to_vec(), vec![0.0, 1.0]);
        assert!(matches!(
            store.get(99),
            Err(RecoError::MissingEmbedding { item_id: 99 })
        ));
    }

    #[test]
    fn test_duplicate_item_rejected() {
        let result = EmbeddingStore::new(vec![(1, vec![1.0]), (1, vec![2.0])]);
        assert!(matches!(result, Err(RecoError::DuplicateItem { item_id: 1 })));
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let result = EmbeddingStore::new(vec![(1, vec![1.0, 2.0]), (2, vec![1.0])]);
        assert!(matches!(
            result,
            Err(RecoError::DimensionMismatch {
                item_id: 2,
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_rows_for_repeats_and_missing() {
        let store = sample();
        let rows = store.rows_for(&[12, 10, 12]).unwrap();
        assert_eq!(rows.nrows(), 3);
        assert_eq!(rows.row(2).to_vec(), vec![1.0, 1.0]);
        assert!(store.rows_for(&[10, 77]).is_err());
    }

    #[test]
    fn test_candidates_excluding_keeps_catalogue_order() {
        let store = sample();
        let excluded: HashSet<ItemId> = [11].into_iter().collect();
        let (ids, vectors) = store.candidates_excluding(&excluded);
        assert_eq!(ids, vec![10, 12]);
        assert_eq!(vectors.nrows(), 2);
        assert_eq!(vectors.row(1).to_vec(), vec![1.0, 1.0]);
    }

    #[test]
    fn test_empty_store() {
        let store = EmbeddingStore::new(Vec::new()).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.dimension(), 0);
    }

    #[test]
    fn test_from_records() {
        let records: Vec<EmbeddingRecord> = serde_json::from_str(
            r#"[{"article_id": "3", "embedding": [0.5, 0.5]}, {"item_id": 4.0, "embedding": [1.0, 0.0]}]"#,
        )
        .unwrap();
        let store = EmbeddingStore::from_records(&records).unwrap();
        assert_eq!(store.item_ids(), &[3, 4]);
    }
}
