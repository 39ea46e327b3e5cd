use crate::cosine::cosine_similarity;
use crate::types::SimilarCluster;
use crate::vector::decode_embedding;
use std::cmp::Ordering;
use store::GrantCluster;

/// Rank candidates against a reference vector.
///
/// Candidates that lack an embedding, fail to decode, or whose decoded length
/// differs from the reference are silently excluded; partial data is an
/// expected steady state of the ingestion pipeline, not a fault. Survivors
/// are scored, filtered to `score >= threshold`, sorted descending, and
/// truncated to `limit`.
///
/// Pure with respect to its inputs; no I/O.
pub fn rank(
    reference: &[f32],
    candidates: Vec<GrantCluster>,
    threshold: f32,
    limit: usize,
) -> Vec<SimilarCluster> {
    let mut ranked: Vec<SimilarCluster> = Vec::new();

    for candidate in candidates {
        let vector = match candidate.embedding.as_ref() {
            Some(raw) => match decode_embedding(raw) {
                Ok(vector) => vector,
                Err(_) => continue,
            },
            None => continue,
        };
        if vector.len() != reference.len() {
            continue;
        }

        let score = cosine_similarity(reference, &vector);
        if score < threshold {
            continue;
        }
        ranked.push(SimilarCluster::from_cluster(candidate, score));
    }

    ranked.sort_by(|a, b| {
        b.similarity_score
            .partial_cmp(&a.similarity_score)
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(limit);
    ranked
}
