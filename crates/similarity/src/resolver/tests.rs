use super::*;
use crate::remote::RemoteRankerError;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use store::{EmbeddingRow, GrantCluster, InMemoryStore};

async fn seeded_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    let clusters = vec![
        GrantCluster::new("ref", "Reference Grant").with_embedding(vec![1.0, 0.0, 0.0]),
        GrantCluster::new("a", "Grant A").with_embedding(vec![1.0, 0.0, 0.0]),
        GrantCluster::new("b", "Grant B").with_embedding(vec![0.0, 1.0, 0.0]),
        GrantCluster::new("c", "Grant C").with_embedding(vec![0.9, 0.1, 0.0]),
    ];
    for cluster in clusters {
        store.upsert(cluster).await.expect("in-memory upsert");
    }
    store
}

/// Remote double with scripted behavior and an invocation counter.
struct ScriptedRemote {
    name: String,
    behavior: Behavior,
    calls: AtomicUsize,
}

enum Behavior {
    Rows(Vec<Value>),
    CapabilityMissing,
    Fail(String),
}

impl ScriptedRemote {
    fn new(name: &str, behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            behavior,
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteRanker for ScriptedRemote {
    fn name(&self) -> &str {
        &self.name
    }

    async fn rank(
        &self,
        _vector: &[f32],
        _threshold: f32,
        _limit: usize,
    ) -> Result<Vec<Value>, RemoteRankerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Rows(rows) => Ok(rows.clone()),
            Behavior::CapabilityMissing => Err(RemoteRankerError::new(
                "Could not find the function public.find_similar_grant_clusters",
            )),
            Behavior::Fail(message) => Err(RemoteRankerError::new(message.clone())),
        }
    }
}

/// Store double that fails every read with a backend error.
struct BrokenStore;

#[async_trait]
impl ClusterStore for BrokenStore {
    async fn embedding(&self, _id: &str) -> Result<Option<EmbeddingRow>, StoreError> {
        Err(StoreError::backend("connection refused"))
    }

    async fn list_candidates(
        &self,
        _exclude_id: &str,
        _max: usize,
    ) -> Result<Vec<GrantCluster>, StoreError> {
        Err(StoreError::backend("connection refused"))
    }

    async fn upsert(&self, _cluster: GrantCluster) -> Result<(), StoreError> {
        Err(StoreError::backend("connection refused"))
    }

    async fn get(&self, _id: &str) -> Result<Option<GrantCluster>, StoreError> {
        Err(StoreError::backend("connection refused"))
    }

    async fn delete(&self, _id: &str) -> Result<bool, StoreError> {
        Err(StoreError::backend("connection refused"))
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Err(StoreError::backend("connection refused"))
    }
}

/// Store wrapper recording the candidate budget the resolver asks for.
struct RecordingStore {
    inner: Arc<InMemoryStore>,
    requested_max: Mutex<Option<usize>>,
}

#[async_trait]
impl ClusterStore for RecordingStore {
    async fn embedding(&self, id: &str) -> Result<Option<EmbeddingRow>, StoreError> {
        self.inner.embedding(id).await
    }

    async fn list_candidates(
        &self,
        exclude_id: &str,
        max: usize,
    ) -> Result<Vec<GrantCluster>, StoreError> {
        *self.requested_max.lock().unwrap() = Some(max);
        self.inner.list_candidates(exclude_id, max).await
    }

    async fn upsert(&self, cluster: GrantCluster) -> Result<(), StoreError> {
        self.inner.upsert(cluster).await
    }

    async fn get(&self, id: &str) -> Result<Option<GrantCluster>, StoreError> {
        self.inner.get(id).await
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.inner.delete(id).await
    }

    async fn count(&self) -> Result<usize, StoreError> {
        self.inner.count().await
    }
}

#[tokio::test]
async fn unknown_reference_id_is_not_found() {
    let resolver = SimilarityResolver::new(seeded_store().await, ResolverConfig::default());
    let err = resolver.resolve("missing", 0.3, 20).await.unwrap_err();
    assert!(matches!(err, ResolveError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn reference_without_embedding_is_rejected() {
    let store = seeded_store().await;
    store
        .upsert(GrantCluster::new("bare", "No Vector"))
        .await
        .unwrap();

    let resolver = SimilarityResolver::new(store, ResolverConfig::default());
    let err = resolver.resolve("bare", 0.3, 20).await.unwrap_err();
    assert!(matches!(err, ResolveError::NoEmbedding(_)), "got {err:?}");
}

#[tokio::test]
async fn undecodable_reference_embedding_is_a_decode_error() {
    let store = seeded_store().await;
    store
        .upsert(GrantCluster::new("garbled", "Garbled").with_embedding_text("not a vector"))
        .await
        .unwrap();

    let resolver = SimilarityResolver::new(store, ResolverConfig::default());
    let err = resolver.resolve("garbled", 0.3, 20).await.unwrap_err();
    assert!(matches!(err, ResolveError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn empty_reference_id_and_zero_limit_are_invalid_requests() {
    let resolver = SimilarityResolver::new(seeded_store().await, ResolverConfig::default());

    let err = resolver.resolve("  ", 0.3, 20).await.unwrap_err();
    assert!(matches!(err, ResolveError::InvalidRequest(_)));

    let err = resolver.resolve("ref", 0.3, 0).await.unwrap_err();
    assert!(matches!(err, ResolveError::InvalidRequest(_)));
}

#[tokio::test]
async fn reference_load_failure_surfaces_as_reference_error() {
    let resolver = SimilarityResolver::new(Arc::new(BrokenStore), ResolverConfig::default());
    let err = resolver.resolve("ref", 0.3, 20).await.unwrap_err();
    assert!(matches!(err, ResolveError::Reference(_)), "got {err:?}");
}

#[tokio::test]
async fn first_remote_success_short_circuits_everything_else() {
    let first = ScriptedRemote::new(
        "find_similar_grant_clusters_with_scores",
        Behavior::Rows(vec![json!({
            "id": "remote-1",
            "grant_name": "Remote Hit",
            "similarity_score": 0.88,
        })]),
    );
    let second = ScriptedRemote::new("find_similar_grant_clusters", Behavior::CapabilityMissing);

    let resolver = SimilarityResolver::new(seeded_store().await, ResolverConfig::default())
        .with_remote(first.clone())
        .with_remote(second.clone());

    let results = resolver.resolve("ref", 0.3, 20).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "remote-1");
    assert!((results[0].similarity_score - 0.88).abs() < 1e-6);
    assert_eq!(first.call_count(), 1);
    assert_eq!(second.call_count(), 0);
}

#[tokio::test]
async fn legacy_remote_rows_normalize_through_the_alias_list() {
    let legacy = ScriptedRemote::new(
        "find_similar_grant_clusters",
        Behavior::Rows(vec![
            json!({ "id": "x", "grant_name": "X", "similarity": 0.7 }),
            json!({ "id": "y", "grant_name": "Y", "similarity_score": 0.9 }),
        ]),
    );

    let resolver =
        SimilarityResolver::new(seeded_store().await, ResolverConfig::default()).with_remote(legacy);

    let results = resolver.resolve("ref", 0.3, 20).await.unwrap();
    let scores: Vec<f32> = results.iter().map(|r| r.similarity_score).collect();
    assert!((scores[0] - 0.7).abs() < 1e-6);
    assert!((scores[1] - 0.9).abs() < 1e-6);
}

#[tokio::test]
async fn capability_missing_chain_falls_back_to_local_ranking() {
    let first = ScriptedRemote::new(
        "find_similar_grant_clusters_with_scores",
        Behavior::CapabilityMissing,
    );
    let second = ScriptedRemote::new("find_similar_grant_clusters", Behavior::CapabilityMissing);

    let store = seeded_store().await;
    let resolver = SimilarityResolver::new(store.clone(), ResolverConfig::default())
        .with_remote(first.clone())
        .with_remote(second.clone());

    let results = resolver.resolve("ref", 0.5, 10).await.unwrap();

    assert_eq!(first.call_count(), 1);
    assert_eq!(second.call_count(), 1);

    // Deterministic parity with the pure ranking pipeline over the same slice.
    let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
    assert!((results[0].similarity_score - 1.0).abs() < 1e-6);
    assert!((results[1].similarity_score - 0.993_883_7).abs() < 1e-4);
}

#[tokio::test]
async fn genuine_remote_failure_halts_without_fallback() {
    let first = ScriptedRemote::new(
        "find_similar_grant_clusters_with_scores",
        Behavior::Fail("timeout acquiring connection from pool".into()),
    );
    let second = ScriptedRemote::new("find_similar_grant_clusters", Behavior::CapabilityMissing);

    let resolver = SimilarityResolver::new(seeded_store().await, ResolverConfig::default())
        .with_remote(first)
        .with_remote(second.clone());

    let err = resolver.resolve("ref", 0.3, 20).await.unwrap_err();
    match err {
        ResolveError::Remote { strategy, message } => {
            assert_eq!(strategy, "find_similar_grant_clusters_with_scores");
            assert!(message.contains("timeout"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(second.call_count(), 0);
}

#[tokio::test]
async fn no_remotes_configured_means_local_resolution() {
    let resolver = SimilarityResolver::new(seeded_store().await, ResolverConfig::default());

    let results = resolver.resolve("ref", 0.5, 10).await.unwrap();
    let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
}

#[tokio::test]
async fn fallback_respects_the_configured_candidate_budget() {
    let store = Arc::new(RecordingStore {
        inner: seeded_store().await,
        requested_max: Mutex::new(None),
    });
    let cfg = ResolverConfig {
        candidate_cap: 50,
        oversample_factor: 3,
    };

    let resolver = SimilarityResolver::new(store.clone(), cfg);
    resolver.resolve("ref", 0.0, 10).await.unwrap();
    assert_eq!(*store.requested_max.lock().unwrap(), Some(30));

    resolver.resolve("ref", 0.0, 40).await.unwrap();
    assert_eq!(*store.requested_max.lock().unwrap(), Some(50));
}

#[tokio::test]
async fn candidate_listing_failure_surfaces_as_candidates_error() {
    // Reference loads fine from the seeded store, candidates break.
    struct SplitStore {
        reads: Arc<InMemoryStore>,
    }

    #[async_trait]
    impl ClusterStore for SplitStore {
        async fn embedding(&self, id: &str) -> Result<Option<EmbeddingRow>, StoreError> {
            self.reads.embedding(id).await
        }

        async fn list_candidates(
            &self,
            _exclude_id: &str,
            _max: usize,
        ) -> Result<Vec<GrantCluster>, StoreError> {
            Err(StoreError::backend("relation scan aborted"))
        }

        async fn upsert(&self, cluster: GrantCluster) -> Result<(), StoreError> {
            self.reads.upsert(cluster).await
        }

        async fn get(&self, id: &str) -> Result<Option<GrantCluster>, StoreError> {
            self.reads.get(id).await
        }

        async fn delete(&self, id: &str) -> Result<bool, StoreError> {
            self.reads.delete(id).await
        }

        async fn count(&self) -> Result<usize, StoreError> {
            self.reads.count().await
        }
    }

    let resolver = SimilarityResolver::new(
        Arc::new(SplitStore {
            reads: seeded_store().await,
        }),
        ResolverConfig::default(),
    );

    let err = resolver.resolve("ref", 0.3, 20).await.unwrap_err();
    assert!(matches!(err, ResolveError::Candidates(_)), "got {err:?}");
}
