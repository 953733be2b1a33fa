//! Subject repository.
//!
//! The `enrolled` count is a subquery over enrollment edges, never a stored
//! column. Professor teaching load is enforced here at assignment time
//! (create and reassign), since that is the only place the roster grows.

use chrono::Utc;

use aula_core::entities::{CreateSubjectRequest, Subject};
use aula_core::enums::EntityType;
use aula_core::ids::PREFIX_SUBJECT;

use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, parse_string_list, to_string_list};
use crate::service::AulaService;
use crate::updates::subject::SubjectUpdate;

const INSERT_COLS: &str = "id, name, credits, professor_id, schedule, capacity, description, \
                           prerequisites, is_active, created_at, updated_at";

/// Select list with the derived `enrolled` count in position 6.
const SELECT_COLS: &str = "id, name, credits, professor_id, schedule, capacity, \
     (SELECT COUNT(*) FROM enrollments e WHERE e.subject_id = subjects.id), \
     description, prerequisites, is_active, created_at, updated_at";

fn row_to_subject(row: &libsql::Row) -> Result<Subject, DatabaseError> {
    Ok(Subject {
        id: row.get(0)?,
        name: row.get(1)?,
        credits: u32::try_from(row.get::<i64>(2)?).unwrap_or(0),
        professor_id: row.get(3)?,
        schedule: row.get(4)?,
        capacity: u32::try_from(row.get::<i64>(5)?).unwrap_or(0),
        enrolled: u32::try_from(row.get::<i64>(6)?).unwrap_or(0),
        description: row.get(7)?,
        prerequisites: parse_string_list(row.get::<Option<String>>(8)?.as_deref())?,
        is_active: row.get::<i64>(9)? != 0,
        created_at: parse_datetime(&row.get::<String>(10)?)?,
        updated_at: parse_datetime(&row.get::<String>(11)?)?,
    })
}

impl AulaService {
    /// Count subjects currently assigned to a professor.
    /// Reject the assignment unless the professor exists and has roster room.
    ///
    /// The professor record comes back with the roster hydrated, so the load
    /// check is a plain capacity comparison.
    async fn check_professor_can_take(&self, professor_id: &str) -> Result<(), DatabaseError> {
        let professor = self
            .get_professor(professor_id)
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Professor, professor_id))?;
        if !professor.can_take_subject() {
            return Err(DatabaseError::Conflict(format!(
                "professor {professor_id} already teaches {} subjects (max {})",
                professor.subjects.len(),
                professor.max_subjects
            )));
        }
        Ok(())
    }

    /// Create a subject assigned to a professor.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the professor does not exist, or
    /// `DatabaseError::Conflict` if the professor's teaching load is full.
    pub async fn create_subject(
        &self,
        req: &CreateSubjectRequest,
    ) -> Result<Subject, DatabaseError> {
        self.check_professor_can_take(&req.professor_id).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_SUBJECT).await?;

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO subjects ({INSERT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1, ?9, ?10)"
                ),
                libsql::params![
                    id.as_str(),
                    req.name.as_str(),
                    i64::from(req.credits),
                    req.professor_id.as_str(),
                    req.schedule.as_str(),
                    i64::from(req.capacity),
                    req.description.as_str(),
                    to_string_list(&req.prerequisites)?,
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        self.republish_subjects().await?;
        self.republish_professors().await?;
        self.get_subject(&id)
            .await?
            .ok_or(DatabaseError::NoResult)
    }

    /// Fetch one subject. `Ok(None)` if absent.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn get_subject(&self, id: &str) -> Result<Option<Subject>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM subjects WHERE id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_subject(&row)?)),
            None => Ok(None),
        }
    }

    /// List all subjects, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_subjects(&self) -> Result<Vec<Subject>, DatabaseError> {
        self.query_subjects(&format!(
            "SELECT {SELECT_COLS} FROM subjects ORDER BY name, id"
        ))
        .await
    }

    /// List only active subjects (what students can pick from).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_active_subjects(&self) -> Result<Vec<Subject>, DatabaseError> {
        self.query_subjects(&format!(
            "SELECT {SELECT_COLS} FROM subjects WHERE is_active = 1 ORDER BY name, id"
        ))
        .await
    }

    /// List active subjects that still have seats.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_available_subjects(&self) -> Result<Vec<Subject>, DatabaseError> {
        let subjects = self.list_active_subjects().await?;
        Ok(subjects.into_iter().filter(Subject::has_capacity).collect())
    }

    /// List subjects assigned to the given professor.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_subjects_by_professor(
        &self,
        professor_id: &str,
    ) -> Result<Vec<Subject>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM subjects WHERE professor_id = ?1 ORDER BY name, id"
                ),
                [professor_id],
            )
            .await?;
        let mut subjects = Vec::new();
        while let Some(row) = rows.next().await? {
            subjects.push(row_to_subject(&row)?);
        }
        Ok(subjects)
    }

    /// Case-insensitive substring search over subject names.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn search_subjects(&self, term: &str) -> Result<Vec<Subject>, DatabaseError> {
        let needle = term.to_lowercase();
        let subjects = self.list_subjects().await?;
        Ok(subjects
            .into_iter()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .collect())
    }

    async fn query_subjects(&self, sql: &str) -> Result<Vec<Subject>, DatabaseError> {
        let mut rows = self.db().conn().query(sql, ()).await?;
        let mut subjects = Vec::new();
        while let Some(row) = rows.next().await? {
            subjects.push(row_to_subject(&row)?);
        }
        Ok(subjects)
    }

    /// Patch a subject. Reassigning `professor_id` re-checks the new
    /// professor's teaching load.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the subject (or a new professor)
    /// does not exist, `DatabaseError::Conflict` if the new professor's
    /// roster is full.
    pub async fn update_subject(
        &self,
        id: &str,
        update: SubjectUpdate,
    ) -> Result<Subject, DatabaseError> {
        let current = self
            .get_subject(id)
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Subject, id))?;

        if let Some(ref new_professor) = update.professor_id {
            if *new_professor != current.professor_id {
                self.check_professor_can_take(new_professor).await?;
            }
        }

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref name) = update.name {
            sets.push(format!("name = ?{idx}"));
            params.push(name.clone().into());
            idx += 1;
        }
        if let Some(credits) = update.credits {
            sets.push(format!("credits = ?{idx}"));
            params.push(i64::from(credits).into());
            idx += 1;
        }
        if let Some(ref professor_id) = update.professor_id {
            sets.push(format!("professor_id = ?{idx}"));
            params.push(professor_id.clone().into());
            idx += 1;
        }
        if let Some(ref schedule) = update.schedule {
            sets.push(format!("schedule = ?{idx}"));
            params.push(schedule.clone().into());
            idx += 1;
        }
        if let Some(capacity) = update.capacity {
            sets.push(format!("capacity = ?{idx}"));
            params.push(i64::from(capacity).into());
            idx += 1;
        }
        if let Some(ref description) = update.description {
            sets.push(format!("description = ?{idx}"));
            params.push(description.clone().into());
            idx += 1;
        }
        if let Some(ref prerequisites) = update.prerequisites {
            sets.push(format!("prerequisites = ?{idx}"));
            params.push(to_string_list(prerequisites)?.into());
            idx += 1;
        }
        if let Some(is_active) = update.is_active {
            sets.push(format!("is_active = ?{idx}"));
            params.push(i64::from(is_active).into());
            idx += 1;
        }

        if sets.is_empty() {
            return Ok(current);
        }

        let now = Utc::now();
        sets.push(format!("updated_at = ?{idx}"));
        params.push(now.to_rfc3339().into());
        idx += 1;

        params.push(id.into());
        let sql = format!("UPDATE subjects SET {} WHERE id = ?{idx}", sets.join(", "));
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;

        self.republish_subjects().await?;
        if update.professor_id.is_some() {
            // Rosters and student professor rollups may both have moved.
            self.republish_professors().await?;
            self.republish_students(&[]).await?;
        }
        self.get_subject(id)
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Subject, id))
    }

    /// Deactivate a subject without touching existing enrollments. Enrolled
    /// students keep their seats; new enrollments are rejected by rule
    /// evaluation.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the subject does not exist.
    pub async fn deactivate_subject(&self, id: &str) -> Result<Subject, DatabaseError> {
        self.update_subject(id, SubjectUpdate {
            is_active: Some(false),
            ..SubjectUpdate::default()
        })
        .await
    }

    /// Delete a subject. Refused while any student is enrolled; deactivate
    /// instead to retire a subject that still has seats taken.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the subject does not exist, or
    /// `DatabaseError::Conflict` if enrollment edges still reference it.
    pub async fn delete_subject(&self, id: &str) -> Result<(), DatabaseError> {
        let subject = self
            .get_subject(id)
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Subject, id))?;
        if subject.enrolled > 0 {
            return Err(DatabaseError::Conflict(format!(
                "subject {id} still has {} enrolled students",
                subject.enrolled
            )));
        }

        self.db()
            .conn()
            .execute("DELETE FROM subjects WHERE id = ?1", [id])
            .await?;

        self.republish_subjects().await?;
        self.republish_professors().await?;
        Ok(())
    }
}
