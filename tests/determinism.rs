use grantsim::{
    cosine_similarity, find_similar_clusters, rank, ClusterStore, GrantCluster, InMemoryStore,
};
use std::sync::Arc;

fn candidate(id: &str, vector: Vec<f32>) -> GrantCluster {
    GrantCluster::new(id, format!("Grant {id}")).with_embedding(vector)
}

#[test]
fn cosine_similarity_is_stable_across_calls() {
    let a = vec![0.12, -3.4, 5.6, 0.007, 2.2];
    let b = vec![1.9, 0.4, -0.6, 3.3, -1.1];

    let first = cosine_similarity(&a, &b);
    for _ in 0..100 {
        assert_eq!(cosine_similarity(&a, &b), first);
    }
}

#[test]
fn ranking_is_deterministic_for_identical_input() {
    let reference = vec![0.6, 0.8, 0.0];
    let candidates = vec![
        candidate("a", vec![0.6, 0.8, 0.0]),
        candidate("b", vec![0.0, 1.0, 0.0]),
        candidate("c", vec![0.8, 0.6, 0.0]),
        candidate("d", vec![0.0, 0.0, 1.0]),
    ];

    let first = rank(&reference, candidates.clone(), 0.2, 10);
    for _ in 0..10 {
        assert_eq!(rank(&reference, candidates.clone(), 0.2, 10), first);
    }
}

#[tokio::test]
async fn repeated_resolution_over_an_unchanged_store_is_identical() {
    let store = Arc::new(InMemoryStore::new());
    store
        .upsert(candidate("ref", vec![1.0, 0.0, 0.0]))
        .await
        .unwrap();
    for i in 0..20 {
        let angle = i as f32 * 0.15;
        store
            .upsert(candidate(
                &format!("c{i}"),
                vec![angle.cos(), angle.sin(), 0.0],
            ))
            .await
            .unwrap();
    }

    let first = find_similar_clusters(store.clone(), "ref", 0.3, 10)
        .await
        .unwrap();
    for _ in 0..5 {
        let again = find_similar_clusters(store.clone(), "ref", 0.3, 10)
            .await
            .unwrap();
        assert_eq!(again, first);
    }
}
