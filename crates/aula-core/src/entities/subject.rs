use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A subject offered in the catalog. Owned by exactly one professor.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Subject {
    pub id: String,
    pub name: String,
    /// Always 3 under the canonical rule set.
    pub credits: u32,
    pub professor_id: String,
    pub schedule: String,
    pub capacity: u32,
    /// Number of current enrollment edges (derived).
    pub enrolled: u32,
    pub description: String,
    pub prerequisites: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subject {
    /// Remaining seats. Never underflows even if a stale snapshot reports
    /// `enrolled > capacity`.
    #[must_use]
    pub const fn seats_available(&self) -> u32 {
        self.capacity.saturating_sub(self.enrolled)
    }

    /// Whether the subject can accept one more enrollment.
    #[must_use]
    pub const fn has_capacity(&self) -> bool {
        self.enrolled < self.capacity
    }
}

/// Fields supplied when an administrator creates a subject.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateSubjectRequest {
    pub name: String,
    pub credits: u32,
    pub professor_id: String,
    pub schedule: String,
    pub capacity: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub prerequisites: Vec<String>,
}
