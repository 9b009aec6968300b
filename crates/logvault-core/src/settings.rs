//! The captured settings document.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Index settings captured at backup time.
///
/// Combines the operator-supplied shard/replica counts with the field
/// mapping read from the source engine. The document is frozen into the
/// restore script, so restore-time behavior never depends on querying the
/// original source again. The mapping is carried opaquely; logvault never
/// interprets individual field types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsDocument {
    pub shard_count: u32,
    pub replica_count: u32,
    pub mapping: Value,
}

impl SettingsDocument {
    pub fn new(shard_count: u32, replica_count: u32, mapping: Value) -> Self {
        Self {
            shard_count,
            replica_count,
            mapping,
        }
    }

    /// Body for the engine's create-index request (`PUT /<index>/`).
    pub fn create_index_body(&self) -> Value {
        json!({
            "settings": {
                "number_of_shards": self.shard_count,
                "number_of_replicas": self.replica_count
            },
            "mappings": self.mapping
        })
    }
}
