//! Vector similarity and top-k ranking.

use crate::store::IndexedChunk;

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 = identical, 0 = orthogonal, -1 = opposite.
/// Returns 0.0 if either vector is zero-length or empty.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < 1e-10 {
        return 0.0;
    }

    (dot / denom) as f32
}

/// The `k` chunks closest to `query`, best first.
///
/// Ties keep index order, so results are deterministic.
pub fn top_k<'a>(chunks: &'a [IndexedChunk], query: &[f32], k: usize) -> Vec<(f32, &'a IndexedChunk)> {
    let mut scored: Vec<(f32, &IndexedChunk)> = chunks
        .iter()
        .map(|chunk| (cosine_similarity(&chunk.embedding, query), chunk))
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(k);
    scored
}
