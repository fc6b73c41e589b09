use crate::features::FeatureValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Entity key string → ordered feature values.
pub type EntityFeatures = BTreeMap<String, Vec<FeatureValue>>;

/// File path → its entities. Shape of `api-calls.json`, `methods.json` and
/// `data-models.json`.
pub type FeaturesByFile = BTreeMap<String, EntityFeatures>;

/// Normalized route → entity keys of the calls registering it. Shape of
/// `routes.json`.
pub type RouteIndex = BTreeMap<String, Vec<String>>;

/// Features of one extracted entity, before aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub path: String,
    pub key: String,
    pub features: Vec<FeatureValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryStats {
    pub scanned: usize,
    pub parsed: usize,
    pub skipped: usize,
    pub errors: usize,
    pub api_calls: usize,
    pub methods: usize,
    #[serde(default)]
    pub data_models: usize,
    #[serde(default)]
    pub graphql_declarations: usize,
    pub routes: usize,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub name: String,
    pub path: String,
    pub stats: RepositoryStats,
    /// Paths of the written artifacts, relative to the output directory.
    pub artifacts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

/// Content of `summary.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub correlation_id: String,
    pub dir: String,
    pub compressed: bool,
    pub repositories: Vec<RepositorySummary>,
    pub duration_ms: u64,
}

impl RunSummary {
    pub fn failed_repositories(&self) -> usize {
        self.repositories
            .iter()
            .filter(|repo| repo.error.is_some())
            .count()
    }
}
