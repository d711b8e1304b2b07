//! Cosine similarity between embeddings

/// Cosine similarity of two equal-length vectors.
///
/// Returns `None` when either vector has zero norm or the result is not
/// finite; such a pair has no defined similarity and never passes a
/// threshold. Callers check lengths beforehand.
///
/// Sums run in `f64`: the square of any finite `f32` is representable
/// there, so large or tiny components neither overflow nor vanish.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    debug_assert_eq!(a.len(), b.len());

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        return None;
    }

    let similarity = dot / denom;
    similarity
        .is_finite()
        .then(|| similarity.clamp(-1.0, 1.0) as f32)
}
