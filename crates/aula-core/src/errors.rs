//! Cross-cutting error types for Aula.
//!
//! `DatabaseError` and `ConfigError` stay in their own crates; `CoreError`
//! covers the domain-level failures every surface shares. The CLI converts
//! all of them into `anyhow` at the binary boundary.
//!
//! Taxonomy note: the gateway reports a duplicate email as
//! `DatabaseError::Conflict` (it only sees the UNIQUE constraint); the
//! registration flow re-labels that as [`CoreError::Validation`] because to
//! the user it is malformed input, not a storage fault.

use thiserror::Error;

use crate::enums::EntityType;
use crate::rules::Rejection;

/// Domain-level errors shared across Aula crates.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: EntityType, id: String },

    /// An enrollment action was rejected by the rule evaluator. Always
    /// recoverable and user-facing; never reaches the gateway.
    #[error("Enrollment rejected: {0}")]
    Rule(#[from] Rejection),

    /// Data failed validation (format, constraints, duplicate email).
    #[error("Validation error: {0}")]
    Validation(String),
}

impl CoreError {
    /// Shorthand for the not-found case.
    #[must_use]
    pub fn not_found(entity_type: EntityType, id: &str) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn not_found_names_entity_and_id() {
        let err = CoreError::not_found(EntityType::Student, "stu-a3f8b2c1");
        assert_eq!(err.to_string(), "Entity not found: student stu-a3f8b2c1");
    }

    #[test]
    fn rejection_converts_to_rule_variant() {
        let err = CoreError::from(Rejection::SubjectFull);
        assert!(matches!(err, CoreError::Rule(Rejection::SubjectFull)));
        assert_eq!(err.to_string(), "Enrollment rejected: this subject is full");
    }

    #[test]
    fn validation_carries_the_message() {
        let err = CoreError::Validation("email must contain '@'".into());
        assert_eq!(err.to_string(), "Validation error: email must contain '@'");
    }
}
