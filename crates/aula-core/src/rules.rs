//! The Enrollment Rule Evaluator.
//!
//! Pure, side-effect-free decision functions over a snapshot of (limits,
//! candidate subject, current selection, all subjects). No hidden state, no
//! I/O — everything here is unit-testable in isolation.
//!
//! ADD rules fire in a fixed order:
//!
//! ```text
//! already selected  → accept (no-op)
//! max subjects      → reject
//! duplicate prof    → reject
//! credit limit      → reject
//! inactive / full   → reject
//! otherwise         → accept, selection ∪ {candidate}
//! ```
//!
//! REMOVE is always accepted and idempotent.

use std::collections::BTreeSet;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Subject;
use crate::limits::EnrollmentLimits;

/// An order-independent set of selected subject ids.
pub type Selection = BTreeSet<String>;

// ---------------------------------------------------------------------------
// Rejection
// ---------------------------------------------------------------------------

/// Reason an ADD was rejected. Each variant maps to one user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, thiserror::Error)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    /// The selection already holds `max_subjects` subjects.
    #[error("you can only select up to {max_subjects} subjects per semester")]
    MaxSubjectsReached { max_subjects: u32 },

    /// A selected subject is already taught by the candidate's professor.
    #[error("you already have a subject with this professor")]
    DuplicateProfessor { professor_id: String },

    /// Adding the candidate would exceed the student's credit ceiling.
    #[error("selecting this subject would exceed your {max_credits} credit limit")]
    CreditLimitExceeded { max_credits: u32 },

    /// The candidate subject has been retired from the catalog.
    #[error("this subject is not active")]
    SubjectInactive,

    /// The candidate subject has no seats left.
    #[error("this subject is full")]
    SubjectFull,
}

impl Rejection {
    /// Stable reason code for logs and machine-readable output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MaxSubjectsReached { .. } => "max_subjects_reached",
            Self::DuplicateProfessor { .. } => "duplicate_professor",
            Self::CreditLimitExceeded { .. } => "credit_limit_exceeded",
            Self::SubjectInactive => "subject_inactive",
            Self::SubjectFull => "subject_full",
        }
    }
}

// ---------------------------------------------------------------------------
// Add / remove evaluation
// ---------------------------------------------------------------------------

/// Outcome of an accepted ADD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The subject was already selected; the selection is unchanged.
    AlreadySelected,
    /// The subject was added; holds the new selection.
    Added(Selection),
}

impl AddOutcome {
    /// The resulting selection, cloning `current` for the no-op case.
    #[must_use]
    pub fn into_selection(self, current: &Selection) -> Selection {
        match self {
            Self::AlreadySelected => current.clone(),
            Self::Added(next) => next,
        }
    }
}

/// Evaluate adding `candidate` to `selection`.
///
/// `subjects` must contain every subject referenced by `selection` (it is the
/// full catalog snapshot the caller already holds); ids not found there
/// contribute no credits and no professor, matching how the screens treat
/// dangling ids.
///
/// # Errors
///
/// Returns the first [`Rejection`] in rule order.
pub fn evaluate_add(
    limits: EnrollmentLimits,
    candidate: &Subject,
    selection: &Selection,
    subjects: &[Subject],
) -> Result<AddOutcome, Rejection> {
    if selection.contains(&candidate.id) {
        return Ok(AddOutcome::AlreadySelected);
    }

    if selection.len() as u32 >= limits.max_subjects {
        return Err(Rejection::MaxSubjectsReached {
            max_subjects: limits.max_subjects,
        });
    }

    let duplicate = selection.iter().any(|id| {
        subjects
            .iter()
            .find(|s| s.id == *id)
            .is_some_and(|s| s.professor_id == candidate.professor_id)
    });
    if duplicate {
        return Err(Rejection::DuplicateProfessor {
            professor_id: candidate.professor_id.clone(),
        });
    }

    if total_credits(selection, subjects) + candidate.credits > limits.max_credits {
        return Err(Rejection::CreditLimitExceeded {
            max_credits: limits.max_credits,
        });
    }

    if !candidate.is_active {
        return Err(Rejection::SubjectInactive);
    }

    if !candidate.has_capacity() {
        return Err(Rejection::SubjectFull);
    }

    let mut next = selection.clone();
    next.insert(candidate.id.clone());
    Ok(AddOutcome::Added(next))
}

/// Evaluate removing `subject_id` from `selection`. Always accepted; removing
/// an id that is not present is a no-op.
#[must_use]
pub fn evaluate_remove(selection: &Selection, subject_id: &str) -> Selection {
    let mut next = selection.clone();
    next.remove(subject_id);
    next
}

// ---------------------------------------------------------------------------
// Derived values
// ---------------------------------------------------------------------------

/// Sum of credits of the selected subjects.
#[must_use]
pub fn total_credits(selection: &Selection, subjects: &[Subject]) -> u32 {
    selection
        .iter()
        .filter_map(|id| subjects.iter().find(|s| s.id == *id))
        .map(|s| s.credits)
        .sum()
}

/// Credits still available under the limit.
#[must_use]
pub fn remaining_credits(limits: EnrollmentLimits, selection: &Selection, subjects: &[Subject]) -> u32 {
    limits.max_credits.saturating_sub(total_credits(selection, subjects))
}

/// Whether the working selection differs from the persisted one.
/// Order-independent: `["a","b"]` equals `["b","a"]`.
#[must_use]
pub fn has_unsaved_changes(persisted: &[String], selection: &Selection) -> bool {
    let persisted: Selection = persisted.iter().cloned().collect();
    persisted != *selection
}

/// Summary line for the selection screen header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct SelectionSummary {
    pub selected: u32,
    pub max_subjects: u32,
    pub credits: u32,
    pub max_credits: u32,
    pub unsaved_changes: bool,
}

impl SelectionSummary {
    #[must_use]
    pub fn compute(
        limits: EnrollmentLimits,
        persisted: &[String],
        selection: &Selection,
        subjects: &[Subject],
    ) -> Self {
        Self {
            selected: selection.len() as u32,
            max_subjects: limits.max_subjects,
            credits: total_credits(selection, subjects),
            max_credits: limits.max_credits,
            unsaved_changes: has_unsaved_changes(persisted, selection),
        }
    }
}

impl fmt::Display for SelectionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} subjects, {}/{} credits{}",
            self.selected,
            self.max_subjects,
            self.credits,
            self.max_credits,
            if self.unsaved_changes { " (unsaved changes)" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn subject(id: &str, professor_id: &str) -> Subject {
        let now = Utc::now();
        Subject {
            id: id.to_string(),
            name: format!("Subject {id}"),
            credits: 3,
            professor_id: professor_id.to_string(),
            schedule: "Mon 08:00".to_string(),
            capacity: 30,
            enrolled: 0,
            description: String::new(),
            prerequisites: vec![],
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn selection_of(ids: &[&str]) -> Selection {
        ids.iter().map(ToString::to_string).collect()
    }

    fn catalog() -> Vec<Subject> {
        vec![
            subject("sub-a", "prf-1"),
            subject("sub-b", "prf-1"),
            subject("sub-c", "prf-2"),
            subject("sub-d", "prf-3"),
            subject("sub-e", "prf-4"),
        ]
    }

    #[test]
    fn add_to_empty_selection_succeeds() {
        let subjects = catalog();
        let outcome = evaluate_add(
            EnrollmentLimits::default(),
            &subjects[0],
            &Selection::new(),
            &subjects,
        )
        .unwrap();
        assert_eq!(outcome, AddOutcome::Added(selection_of(&["sub-a"])));
    }

    #[test]
    fn add_already_selected_is_noop_accept() {
        let subjects = catalog();
        let current = selection_of(&["sub-a"]);
        let outcome =
            evaluate_add(EnrollmentLimits::default(), &subjects[0], &current, &subjects).unwrap();
        assert_eq!(outcome, AddOutcome::AlreadySelected);
        assert_eq!(outcome.into_selection(&current), current);
    }

    #[test]
    fn duplicate_professor_rejected() {
        // A and B share prf-1: adding B after A must fail.
        let subjects = catalog();
        let current = selection_of(&["sub-a"]);
        let err =
            evaluate_add(EnrollmentLimits::default(), &subjects[1], &current, &subjects).unwrap_err();
        assert_eq!(
            err,
            Rejection::DuplicateProfessor {
                professor_id: "prf-1".to_string()
            }
        );
    }

    #[test]
    fn max_subjects_fires_before_credit_check() {
        // Three subjects of 3 credits each: both caps are saturated, but the
        // subject cap is evaluated first.
        let subjects = catalog();
        let current = selection_of(&["sub-a", "sub-c", "sub-d"]);
        let err =
            evaluate_add(EnrollmentLimits::default(), &subjects[4], &current, &subjects).unwrap_err();
        assert_eq!(err, Rejection::MaxSubjectsReached { max_subjects: 3 });
    }

    #[test]
    fn credit_limit_rejected_when_subject_cap_not_reached() {
        // Cap of 4 subjects but only 9 credits: the fourth 3-credit subject
        // trips the credit rule.
        let subjects = catalog();
        let limits = EnrollmentLimits {
            max_subjects: 4,
            max_credits: 9,
        };
        let current = selection_of(&["sub-a", "sub-c", "sub-d"]);
        let err = evaluate_add(limits, &subjects[4], &current, &subjects).unwrap_err();
        assert_eq!(err, Rejection::CreditLimitExceeded { max_credits: 9 });
    }

    #[test]
    fn inactive_subject_rejected() {
        let mut subjects = catalog();
        subjects[0].is_active = false;
        let err = evaluate_add(
            EnrollmentLimits::default(),
            &subjects[0].clone(),
            &Selection::new(),
            &subjects,
        )
        .unwrap_err();
        assert_eq!(err, Rejection::SubjectInactive);
    }

    #[test]
    fn full_subject_rejected() {
        let mut subjects = catalog();
        subjects[0].enrolled = subjects[0].capacity;
        let err = evaluate_add(
            EnrollmentLimits::default(),
            &subjects[0].clone(),
            &Selection::new(),
            &subjects,
        )
        .unwrap_err();
        assert_eq!(err, Rejection::SubjectFull);
    }

    #[test]
    fn remove_is_idempotent() {
        let current = selection_of(&["sub-a", "sub-c"]);
        let once = evaluate_remove(&current, "sub-a");
        let twice = evaluate_remove(&once, "sub-a");
        assert_eq!(once, selection_of(&["sub-c"]));
        assert_eq!(once, twice);
    }

    #[test]
    fn pairwise_toggle_returns_to_base() {
        let subjects = catalog();
        let base = selection_of(&["sub-c"]);

        // add then remove
        let added = evaluate_add(EnrollmentLimits::default(), &subjects[0], &base, &subjects)
            .unwrap()
            .into_selection(&base);
        assert_eq!(evaluate_remove(&added, "sub-a"), base);

        // remove then add
        let removed = evaluate_remove(&base, "sub-c");
        let restored = evaluate_add(EnrollmentLimits::default(), &subjects[2], &removed, &subjects)
            .unwrap()
            .into_selection(&removed);
        assert_eq!(restored, base);
    }

    #[rstest]
    #[case(&[], 0)]
    #[case(&["sub-a"], 3)]
    #[case(&["sub-a", "sub-c"], 6)]
    #[case(&["sub-a", "sub-c", "sub-d"], 9)]
    fn total_credits_is_three_per_subject(#[case] ids: &[&str], #[case] expected: u32) {
        let subjects = catalog();
        let selection = selection_of(ids);
        assert_eq!(total_credits(&selection, &subjects), expected);
        assert_eq!(
            remaining_credits(EnrollmentLimits::default(), &selection, &subjects),
            9 - expected
        );
    }

    #[test]
    fn unknown_ids_contribute_no_credits() {
        let subjects = catalog();
        let selection = selection_of(&["sub-a", "sub-gone"]);
        assert_eq!(total_credits(&selection, &subjects), 3);
    }

    #[test]
    fn unsaved_changes_is_order_independent() {
        let persisted = vec!["sub-c".to_string(), "sub-a".to_string()];
        assert!(!has_unsaved_changes(&persisted, &selection_of(&["sub-a", "sub-c"])));
        assert!(has_unsaved_changes(&persisted, &selection_of(&["sub-a"])));
        assert!(has_unsaved_changes(&[], &selection_of(&["sub-a"])));
    }

    #[test]
    fn accepted_toggles_never_violate_invariants() {
        // Greedily add the whole catalog; accepted adds must keep every
        // invariant, rejected ones leave the selection untouched.
        let subjects = catalog();
        let limits = EnrollmentLimits::default();
        let mut selection = Selection::new();

        for candidate in &subjects {
            match evaluate_add(limits, candidate, &selection, &subjects) {
                Ok(outcome) => selection = outcome.into_selection(&selection),
                Err(_) => {}
            }

            assert!(selection.len() as u32 <= limits.max_subjects);
            assert!(total_credits(&selection, &subjects) <= limits.max_credits);

            let professors: Vec<&str> = selection
                .iter()
                .filter_map(|id| subjects.iter().find(|s| s.id == *id))
                .map(|s| s.professor_id.as_str())
                .collect();
            let mut unique = professors.clone();
            unique.sort_unstable();
            unique.dedup();
            assert_eq!(professors.len(), unique.len(), "duplicate professor in {selection:?}");
        }
    }

    #[test]
    fn summary_line_formats() {
        let subjects = catalog();
        let selection = selection_of(&["sub-a"]);
        let summary = SelectionSummary::compute(
            EnrollmentLimits::default(),
            &[],
            &selection,
            &subjects,
        );
        assert_eq!(summary.to_string(), "1/3 subjects, 3/9 credits (unsaved changes)");
    }
}
