use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted embedding representation.
///
/// The ingestion pipeline has written embeddings in two shapes over time: a
/// native numeric sequence, and a serialized JSON array (the textual form a
/// vector column renders to). Both are carried as-is; normalization into a
/// usable `Vec<f32>` happens in one place, the similarity crate's codec,
/// rather than through ad hoc type inspection at call sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawEmbedding {
    /// Native numeric sequence.
    Numeric(Vec<f32>),
    /// Serialized JSON array of numbers, e.g. `"[0.1, 0.2]"`.
    Text(String),
}

/// A clustered grant record.
///
/// Descriptive fields mirror the upstream extraction schema; all of them are
/// irrelevant to similarity scoring and are carried through to results
/// untouched. The `embedding` payload may be absent; partial data is an
/// expected steady state, not a fault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrantCluster {
    /// Unique cluster identifier.
    pub id: String,
    /// Grant display name.
    pub grant_name: String,
    #[serde(default)]
    pub grant_amount: Option<String>,
    #[serde(default)]
    pub grant_date: Option<String>,
    #[serde(default)]
    pub grant_url: Option<String>,
    #[serde(default)]
    pub grant_description: Option<String>,
    #[serde(default)]
    pub grant_organisation: Option<String>,
    #[serde(default)]
    pub grant_eligibility: Option<String>,
    /// When the cluster row was created upstream.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Number of raw scraped grants merged into this cluster.
    #[serde(default)]
    pub raw_grant_count: u32,
    /// Raw embedding payload, if the ingestion pipeline has produced one.
    #[serde(default)]
    pub embedding: Option<RawEmbedding>,
}

impl GrantCluster {
    /// Minimal record with only the required fields set.
    pub fn new<I: Into<String>, N: Into<String>>(id: I, grant_name: N) -> Self {
        Self {
            id: id.into(),
            grant_name: grant_name.into(),
            grant_amount: None,
            grant_date: None,
            grant_url: None,
            grant_description: None,
            grant_organisation: None,
            grant_eligibility: None,
            created_at: None,
            raw_grant_count: 0,
            embedding: None,
        }
    }

    /// Attach a native numeric embedding.
    pub fn with_embedding(mut self, vector: Vec<f32>) -> Self {
        self.embedding = Some(RawEmbedding::Numeric(vector));
        self
    }

    /// Attach a serialized embedding payload.
    pub fn with_embedding_text<S: Into<String>>(mut self, payload: S) -> Self {
        self.embedding = Some(RawEmbedding::Text(payload.into()));
        self
    }
}

/// Result of looking up a cluster's embedding by id.
///
/// A `None` row means the id is unknown; a row whose `embedding` is `None`
/// means the cluster exists but the pipeline has not vectorized it yet. The
/// two conditions are distinct failure modes for callers.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingRow {
    pub embedding: Option<RawEmbedding>,
}
