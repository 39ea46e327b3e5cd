use crate::types::SimilarCluster;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Accepted names for the score field in remote ranking rows, in priority
/// order. The backing store's ranking functions have labelled the score
/// inconsistently across versions; the first non-null value under any of
/// these keys wins.
pub const SCORE_FIELD_ALIASES: [&str; 2] = ["similarity_score", "similarity"];

/// Error returned by a remote ranking strategy.
///
/// Carries the backing store's message verbatim so the capability-missing
/// signature stays recognizable.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct RemoteRankerError {
    pub message: String,
}

impl RemoteRankerError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Whether this error means the ranking capability does not exist on the
    /// backing store, as opposed to an existing capability failing.
    ///
    /// The backing store reports a missing function with a message naming the
    /// unknown function; this is the one classification the resolver advances
    /// past. Anything else is a genuine failure.
    pub fn is_capability_missing(&self) -> bool {
        self.message.contains("function") || self.message.contains("Function")
    }
}

/// A named remote ranking capability of the backing store.
///
/// Implementations wrap one server-side similarity function (e.g. a pgvector
/// search RPC). The resolver holds an ordered list of these and advances on
/// the capability-missing signal only.
#[async_trait]
pub trait RemoteRanker: Send + Sync {
    /// Capability name, for logs and error context.
    fn name(&self) -> &str;

    /// Rank clusters similar to `vector` server-side.
    ///
    /// Rows come back in whatever shape the capability version produces;
    /// [`normalize_rows`] reconciles them.
    async fn rank(
        &self,
        vector: &[f32],
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<Value>, RemoteRankerError>;
}

/// Normalize heterogeneous remote ranking rows into [`SimilarCluster`]s.
///
/// The score is taken from the first non-null field in
/// [`SCORE_FIELD_ALIASES`], defaulting to 0 when absent. Rows without a
/// usable id, or whose remaining fields don't deserialize, are dropped:
/// the same partial-data tolerance the local ranker applies.
pub fn normalize_rows(rows: Vec<Value>) -> Vec<SimilarCluster> {
    rows.into_iter().filter_map(normalize_row).collect()
}

fn normalize_row(row: Value) -> Option<SimilarCluster> {
    row.get("id")?.as_str()?;
    let score = score_from_row(&row);
    let mut cluster: SimilarCluster = serde_json::from_value(strip_score_fields(row)).ok()?;
    cluster.similarity_score = score;
    Some(cluster)
}

fn score_from_row(row: &Value) -> f32 {
    SCORE_FIELD_ALIASES
        .iter()
        .find_map(|key| row.get(key).and_then(Value::as_f64))
        .unwrap_or(0.0) as f32
}

/// Remove the alias fields so deserialization sees only the cluster shape;
/// the score is re-attached from the alias lookup.
fn strip_score_fields(mut row: Value) -> Value {
    if let Some(map) = row.as_object_mut() {
        for key in SCORE_FIELD_ALIASES {
            map.remove(key);
        }
        map.insert("similarity_score".to_string(), Value::from(0.0));
    }
    row
}
