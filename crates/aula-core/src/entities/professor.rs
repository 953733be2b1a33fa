use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A professor. The `subjects` roster is derived from `Subject::professor_id`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Professor {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Subject ids currently assigned to this professor (derived).
    pub subjects: Vec<String>,
    /// Teaching load cap. Defaults to 2.
    pub max_subjects: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Professor {
    /// Whether one more subject can be assigned to this professor.
    #[must_use]
    pub fn can_take_subject(&self) -> bool {
        (self.subjects.len() as u32) < self.max_subjects
    }
}

/// Fields supplied when an administrator creates a professor.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateProfessorRequest {
    pub name: String,
    pub email: String,
    #[serde(default = "default_max_subjects")]
    pub max_subjects: u32,
}

const fn default_max_subjects() -> u32 {
    2
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn professor(roster: &[&str], max_subjects: u32) -> Professor {
        Professor {
            id: "prf-a3f8b2c1".to_string(),
            name: "Ada".to_string(),
            email: "ada@aula.edu".to_string(),
            subjects: roster.iter().map(ToString::to_string).collect(),
            max_subjects,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn can_take_subject_below_the_cap() {
        assert!(professor(&["sub-1"], 2).can_take_subject());
    }

    #[test]
    fn cannot_take_subject_at_the_cap() {
        assert!(!professor(&["sub-1", "sub-2"], 2).can_take_subject());
        assert!(!professor(&[], 0).can_take_subject());
    }
}
