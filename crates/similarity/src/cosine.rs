/// Compute cosine similarity between two vectors.
///
/// Single accumulation pass over the dot product and both squared norms.
/// A zero-magnitude vector has no direction, so either norm being exactly
/// zero yields `0.0` rather than a division by zero. Callers filter
/// mismatched lengths before scoring; if they don't, the mismatch is treated
/// as no signal and also yields `0.0`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}
