//! Enrollment limits — the canonical rule constants.
//!
//! The defaults (3 subjects, 9 credits, 3 credits per subject) are the single
//! rule set every screen and repo enforces. A student record may carry its own
//! `max_credits`; build the limits from the student with [`EnrollmentLimits::for_student`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Student;

pub const DEFAULT_MAX_SUBJECTS: u32 = 3;
pub const DEFAULT_MAX_CREDITS: u32 = 9;
pub const CREDITS_PER_SUBJECT: u32 = 3;

/// Per-semester enrollment caps used by the rule evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EnrollmentLimits {
    /// Maximum simultaneous subjects per semester.
    pub max_subjects: u32,
    /// Maximum total credits per semester.
    pub max_credits: u32,
}

impl Default for EnrollmentLimits {
    fn default() -> Self {
        Self {
            max_subjects: DEFAULT_MAX_SUBJECTS,
            max_credits: DEFAULT_MAX_CREDITS,
        }
    }
}

impl EnrollmentLimits {
    /// Limits for a specific student: the subject cap is global, the credit cap
    /// comes from the student record.
    #[must_use]
    pub fn for_student(student: &Student) -> Self {
        Self {
            max_credits: student.max_credits,
            ..Self::default()
        }
    }
}
