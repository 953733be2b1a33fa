//! Professor repository.
//!
//! The `subjects` roster is derived from `subjects.professor_id` at read
//! time. Teaching load enforcement lives in the subject repo, where
//! assignments are made; this repo only guards against shrinking
//! `max_subjects` below the current load.

use std::collections::HashMap;

use chrono::Utc;

use aula_core::entities::{CreateProfessorRequest, Professor};
use aula_core::enums::EntityType;
use aula_core::ids::PREFIX_PROFESSOR;

use crate::error::DatabaseError;
use crate::helpers::{is_unique_violation, parse_datetime};
use crate::service::AulaService;
use crate::updates::professor::ProfessorUpdate;

const SELECT_COLS: &str = "id, name, email, max_subjects, is_active, created_at, updated_at";

fn row_to_professor(row: &libsql::Row, subjects: Vec<String>) -> Result<Professor, DatabaseError> {
    Ok(Professor {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        subjects,
        max_subjects: u32::try_from(row.get::<i64>(3)?).unwrap_or(0),
        is_active: row.get::<i64>(4)? != 0,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
        updated_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

impl AulaService {
    /// Subject ids grouped by professor, ordered by subject name.
    async fn rosters(
        &self,
        professor_id: Option<&str>,
    ) -> Result<HashMap<String, Vec<String>>, DatabaseError> {
        let base = "SELECT professor_id, id FROM subjects";
        let mut rows = match professor_id {
            Some(id) => {
                let sql = format!("{base} WHERE professor_id = ?1 ORDER BY name, id");
                self.db().conn().query(&sql, [id]).await?
            }
            None => {
                let sql = format!("{base} ORDER BY name, id");
                self.db().conn().query(&sql, ()).await?
            }
        };

        let mut rosters: HashMap<String, Vec<String>> = HashMap::new();
        while let Some(row) = rows.next().await? {
            let professor: String = row.get(0)?;
            let subject: String = row.get(1)?;
            rosters.entry(professor).or_default().push(subject);
        }
        Ok(rosters)
    }

    /// Create a professor with an empty roster.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Conflict` if the email is already registered.
    pub async fn create_professor(
        &self,
        req: &CreateProfessorRequest,
    ) -> Result<Professor, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_PROFESSOR).await?;

        let result = self
            .db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO professors ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, 1, ?5, ?6)"
                ),
                libsql::params![
                    id.as_str(),
                    req.name.as_str(),
                    req.email.as_str(),
                    i64::from(req.max_subjects),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await;

        if let Err(e) = result {
            if is_unique_violation(&e) {
                return Err(DatabaseError::Conflict(format!(
                    "email already registered: {}",
                    req.email
                )));
            }
            return Err(e.into());
        }

        self.republish_professors().await?;
        self.get_professor(&id)
            .await?
            .ok_or(DatabaseError::NoResult)
    }

    /// Fetch one professor with the roster hydrated. `Ok(None)` if absent.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn get_professor(&self, id: &str) -> Result<Option<Professor>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM professors WHERE id = ?1"),
                [id],
            )
            .await?;
        let Some(row) = rows.next().await? else {
            return Ok(None);
        };
        let mut rosters = self.rosters(Some(id)).await?;
        let subjects = rosters.remove(id).unwrap_or_default();
        Ok(Some(row_to_professor(&row, subjects)?))
    }

    /// List all professors, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_professors(&self) -> Result<Vec<Professor>, DatabaseError> {
        let mut rosters = self.rosters(None).await?;
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM professors ORDER BY name, id"),
                (),
            )
            .await?;

        let mut professors = Vec::new();
        while let Some(row) = rows.next().await? {
            let id: String = row.get(0)?;
            let subjects = rosters.remove(&id).unwrap_or_default();
            professors.push(row_to_professor(&row, subjects)?);
        }
        Ok(professors)
    }

    /// Patch a professor's own fields.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the professor does not exist,
    /// `DatabaseError::Conflict` if a new email is taken or `max_subjects`
    /// would drop below the current roster size.
    pub async fn update_professor(
        &self,
        id: &str,
        update: ProfessorUpdate,
    ) -> Result<Professor, DatabaseError> {
        let current = self
            .get_professor(id)
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Professor, id))?;

        if let Some(max_subjects) = update.max_subjects {
            let load = current.subjects.len();
            if (max_subjects as usize) < load {
                return Err(DatabaseError::Conflict(format!(
                    "professor {id} already teaches {load} subjects, cannot cap at {max_subjects}"
                )));
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
        if let Some(ref email) = update.email {
            sets.push(format!("email = ?{idx}"));
            params.push(email.clone().into());
            idx += 1;
        }
        if let Some(max_subjects) = update.max_subjects {
            sets.push(format!("max_subjects = ?{idx}"));
            params.push(i64::from(max_subjects).into());
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
        let sql = format!(
            "UPDATE professors SET {} WHERE id = ?{idx}",
            sets.join(", ")
        );
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DatabaseError::Conflict("email already registered".into())
                } else {
                    e.into()
                }
            })?;

        self.republish_professors().await?;
        self.get_professor(id)
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Professor, id))
    }

    /// Delete a professor. Refused while any subject is still assigned.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the professor does not exist, or
    /// `DatabaseError::Conflict` if subjects still reference them.
    pub async fn delete_professor(&self, id: &str) -> Result<(), DatabaseError> {
        let professor = self
            .get_professor(id)
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Professor, id))?;
        if !professor.subjects.is_empty() {
            return Err(DatabaseError::Conflict(format!(
                "professor {id} still has {} assigned subjects",
                professor.subjects.len()
            )));
        }

        self.db()
            .conn()
            .execute("DELETE FROM professors WHERE id = ?1", [id])
            .await?;

        self.republish_professors().await?;
        Ok(())
    }
}
