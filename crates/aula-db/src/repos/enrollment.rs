//! Enrollment edge repository.
//!
//! Edges are the single source of truth for everything enrollment-derived.
//! `save_selection` is the only writer: it diffs the persisted edge set
//! against the requested selection and applies the whole diff in one
//! transaction, so a crash can never leave a half-saved selection behind.
//!
//! Rule evaluation happens in callers before anything reaches this repo; a
//! rejected action never produces a write here.

use std::collections::BTreeSet;

use chrono::Utc;

use aula_core::entities::{Enrollment, Student};
use aula_core::enums::EntityType;
use aula_core::ids::PREFIX_ENROLLMENT;
use aula_core::rules::Selection;

use crate::error::DatabaseError;
use crate::helpers::parse_datetime;
use crate::service::AulaService;

const SELECT_COLS: &str = "id, student_id, subject_id, created_at";

fn row_to_enrollment(row: &libsql::Row) -> Result<Enrollment, DatabaseError> {
    Ok(Enrollment {
        id: row.get(0)?,
        student_id: row.get(1)?,
        subject_id: row.get(2)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

impl AulaService {
    /// List all enrollment edges, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_enrollments(&self) -> Result<Vec<Enrollment>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM enrollments ORDER BY created_at, id"),
                (),
            )
            .await?;
        let mut enrollments = Vec::new();
        while let Some(row) = rows.next().await? {
            enrollments.push(row_to_enrollment(&row)?);
        }
        Ok(enrollments)
    }

    /// List one student's enrollment edges, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_enrollments_for_student(
        &self,
        student_id: &str,
    ) -> Result<Vec<Enrollment>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM enrollments
                     WHERE student_id = ?1 ORDER BY created_at, id"
                ),
                [student_id],
            )
            .await?;
        let mut enrollments = Vec::new();
        while let Some(row) = rows.next().await? {
            enrollments.push(row_to_enrollment(&row)?);
        }
        Ok(enrollments)
    }

    /// The student's persisted selection as a subject-id set.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn persisted_selection(&self, student_id: &str) -> Result<Selection, DatabaseError> {
        let edges = self.list_enrollments_for_student(student_id).await?;
        Ok(edges.into_iter().map(|e| e.subject_id).collect())
    }

    /// Replace a student's persisted selection with `selection`, atomically.
    ///
    /// Diffs the requested set against the persisted edge set; edges in both
    /// are untouched (they keep their original `created_at`). Removed edges
    /// are deleted, added edges inserted, and the student's `updated_at` is
    /// stamped, all in one transaction. Returns the re-hydrated student.
    ///
    /// Callers must have evaluated enrollment rules already; this method
    /// persists whatever it is given.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the student or any selected
    /// subject does not exist.
    pub async fn save_selection(
        &self,
        student_id: &str,
        selection: &Selection,
    ) -> Result<Student, DatabaseError> {
        // Existence checks and diff computation happen before the
        // transaction; id generation uses the connection and cannot run
        // while a transaction borrows it.
        self.get_student(student_id)
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Student, student_id))?;
        for subject_id in selection {
            self.get_subject(subject_id)
                .await?
                .ok_or_else(|| DatabaseError::not_found(EntityType::Subject, subject_id))?;
        }

        let persisted = self.persisted_selection(student_id).await?;
        let to_add: BTreeSet<&String> = selection.difference(&persisted).collect();
        let to_remove: BTreeSet<&String> = persisted.difference(selection).collect();
        tracing::debug!(
            student_id,
            adding = to_add.len(),
            removing = to_remove.len(),
            "applying selection diff"
        );

        if to_add.is_empty() && to_remove.is_empty() {
            return self
                .get_student(student_id)
                .await?
                .ok_or_else(|| DatabaseError::not_found(EntityType::Student, student_id));
        }

        let mut new_ids = Vec::with_capacity(to_add.len());
        for _ in 0..to_add.len() {
            new_ids.push(self.db().generate_id(PREFIX_ENROLLMENT).await?);
        }

        let now = Utc::now();
        let tx = self.db().conn().transaction().await?;
        for subject_id in &to_remove {
            tx.execute(
                "DELETE FROM enrollments WHERE student_id = ?1 AND subject_id = ?2",
                libsql::params![student_id, subject_id.as_str()],
            )
            .await?;
        }
        for (subject_id, id) in to_add.iter().zip(new_ids.iter()) {
            tx.execute(
                &format!(
                    "INSERT INTO enrollments ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4)"
                ),
                libsql::params![
                    id.as_str(),
                    student_id,
                    subject_id.as_str(),
                    now.to_rfc3339()
                ],
            )
            .await?;
        }
        tx.execute(
            "UPDATE students SET updated_at = ?1 WHERE id = ?2",
            libsql::params![now.to_rfc3339(), student_id],
        )
        .await?;
        tx.commit().await?;

        // Edges moved, so both the student rollups and subject seat counts
        // are stale for subscribers.
        self.republish_students(&[student_id]).await?;
        self.republish_subjects().await?;

        self.get_student(student_id)
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Student, student_id))
    }
}
