//! Enrollment rule configuration.

use aula_core::limits::{DEFAULT_MAX_CREDITS, DEFAULT_MAX_SUBJECTS, EnrollmentLimits};
use serde::{Deserialize, Serialize};

const fn default_max_subjects() -> u32 {
    DEFAULT_MAX_SUBJECTS
}

const fn default_max_credits() -> u32 {
    DEFAULT_MAX_CREDITS
}

/// Overridable enrollment caps, read by the selection controller when it
/// evaluates toggles. Student records carry their own `max_credits`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnrollmentConfig {
    /// Maximum subjects a student may select per semester.
    #[serde(default = "default_max_subjects")]
    pub max_subjects: u32,

    /// Maximum total credits per semester.
    #[serde(default = "default_max_credits")]
    pub max_credits: u32,
}

impl Default for EnrollmentConfig {
    fn default() -> Self {
        Self {
            max_subjects: default_max_subjects(),
            max_credits: default_max_credits(),
        }
    }
}

impl EnrollmentConfig {
    /// Convert to the evaluator's limits struct.
    #[must_use]
    pub const fn limits(&self) -> EnrollmentLimits {
        EnrollmentLimits {
            max_subjects: self.max_subjects,
            max_credits: self.max_credits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_canonical_rule_set() {
        let config = EnrollmentConfig::default();
        assert_eq!(config.max_subjects, 3);
        assert_eq!(config.max_credits, 9);
        assert_eq!(config.limits(), EnrollmentLimits::default());
    }
}
