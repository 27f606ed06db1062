//! Pairwise cosine similarity over dense row matrices

use article_reco_core::l2_norm;
use ndarray::{Array2, ArrayView1};

/// Cosine similarity between every row of `a` and every row of `b`
///
/// Result shape is `(a.nrows(), b.nrows())`. Zero-norm rows score 0 against
/// everything.
pub fn cosine_similarity_matrix(a: &Array2<f32>, b: &Array2<f32>) -> Array2<f32> {
    let a = normalize_rows(a);
    let b = normalize_rows(b);
    let mut sims = a.dot(&b.t());
    sims.mapv_inplace(|v| v.clamp(-1.0, 1.0));
    sims
}

fn normalize_rows(m: &Array2<f32>) -> Array2<f32> {
    let mut out = m.to_owned();
    for mut row in out.rows_mut() {
        // rows of a column-major input are strided
        let norm = row.as_slice().map_or_else(|| row.dot(&row).sqrt(), l2_norm);
        if norm > 0.0 {
            row.mapv_inplace(|v| v / norm);
        }
    }
    out
}

/// Row-major position of the largest cell; the first one wins on ties
pub fn argmax_cell(m: &Array2<f32>) -> Option<(usize, usize)> {
    let mut best: Option<((usize, usize), f32)> = None;
    for ((row, col), &value) in m.indexed_iter() {
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some(((row, col), value)),
        }
    }
    best.map(|(pos, _)| pos)
}

/// Position of the largest entry; the first one wins on ties
pub fn argmax(v: ArrayView1<'_, f32>) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &value) in v.iter().enumerate() {
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}
