use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One Student→Subject enrollment edge. The single source of truth for all
/// enrollment-derived values: subject `enrolled` counts, student credit totals,
/// and professor rosters are aggregations over these rows.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Enrollment {
    pub id: String,
    pub student_id: String,
    pub subject_id: String,
    pub created_at: DateTime<Utc>,
}
