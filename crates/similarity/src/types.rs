use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use store::GrantCluster;

/// A similar cluster paired with its similarity score.
///
/// Ephemeral: constructed per resolution call, never persisted. The
/// descriptive fields are carried through from the matched cluster untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarCluster {
    pub id: String,
    #[serde(default)]
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
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub raw_grant_count: u32,
    /// Cosine similarity to the reference cluster, in [-1, 1]; exactly 0 when
    /// either vector had zero magnitude.
    pub similarity_score: f32,
}

impl SimilarCluster {
    /// Pair a matched cluster's descriptive fields with its score.
    pub fn from_cluster(cluster: GrantCluster, similarity_score: f32) -> Self {
        Self {
            id: cluster.id,
            grant_name: cluster.grant_name,
            grant_amount: cluster.grant_amount,
            grant_date: cluster.grant_date,
            grant_url: cluster.grant_url,
            grant_description: cluster.grant_description,
            grant_organisation: cluster.grant_organisation,
            grant_eligibility: cluster.grant_eligibility,
            created_at: cluster.created_at,
            raw_grant_count: cluster.raw_grant_count,
            similarity_score,
        }
    }
}

/// Tuning knobs for the resolver's local fallback path.
///
/// The fallback scores a bounded candidate slice rather than the full corpus:
/// `min(candidate_cap, limit * oversample_factor)` rows are fetched. The
/// defaults trade recall for latency in the degraded path; both knobs are
/// configuration, not correctness requirements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Hard ceiling on the candidate slice size.
    #[serde(default = "ResolverConfig::default_candidate_cap")]
    pub candidate_cap: usize,
    /// Candidates fetched per requested result, before the cap applies.
    #[serde(default = "ResolverConfig::default_oversample_factor")]
    pub oversample_factor: usize,
}

impl ResolverConfig {
    pub(crate) fn default_candidate_cap() -> usize {
        50
    }

    pub(crate) fn default_oversample_factor() -> usize {
        3
    }

    /// Candidate slice size for a given result limit.
    pub fn candidate_budget(&self, limit: usize) -> usize {
        limit
            .saturating_mul(self.oversample_factor)
            .min(self.candidate_cap)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            candidate_cap: Self::default_candidate_cap(),
            oversample_factor: Self::default_oversample_factor(),
        }
    }
}
