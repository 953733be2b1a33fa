use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Semester;
use crate::errors::CoreError;

/// A student. The enrollment-derived fields (`subjects`, `professors`,
/// `credits`) are computed from enrollment edges when the record is read.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub semester: Semester,
    pub gpa: f64,
    /// Credit ceiling for one semester. Defaults to 9.
    pub max_credits: u32,
    /// Subject ids the student is currently enrolled in (derived).
    pub subjects: Vec<String>,
    /// Professor ids of the enrolled subjects (derived, deduplicated).
    pub professors: Vec<String>,
    /// Sum of credits of the enrolled subjects (derived).
    pub credits: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied at registration. Everything else starts empty or zero.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateStudentRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub semester: Semester,
}

impl CreateStudentRequest {
    /// Check the registration form before it reaches the gateway.
    ///
    /// The semester range is already enforced by the [`Semester`] type;
    /// this covers the free-text fields.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for a blank name or a malformed email.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation("name must not be empty".into()));
        }
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(CoreError::Validation(format!(
                "'{}' is not a valid email address",
                self.email
            )));
        }
        Ok(())
    }
}
