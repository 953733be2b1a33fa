//! Student repository.
//!
//! The stored row carries only the student's own fields; `subjects`,
//! `professors`, and `credits` are hydrated from enrollment edges on every
//! read so they can never drift from the edge table.

use std::collections::HashMap;

use chrono::Utc;

use aula_core::entities::{CreateStudentRequest, Student};
use aula_core::enums::EntityType;
use aula_core::ids::PREFIX_STUDENT;

use crate::error::DatabaseError;
use crate::helpers::{is_unique_violation, parse_datetime, parse_semester};
use crate::service::AulaService;
use crate::updates::student::StudentUpdate;

const SELECT_COLS: &str =
    "id, name, email, phone, semester, gpa, max_credits, created_at, updated_at";

/// Per-student rollup of enrollment edges, joined against subjects.
#[derive(Debug, Default, Clone)]
struct EnrollmentRollup {
    subjects: Vec<String>,
    professors: Vec<String>,
    credits: u32,
}

fn row_to_student(row: &libsql::Row, rollup: EnrollmentRollup) -> Result<Student, DatabaseError> {
    Ok(Student {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        semester: parse_semester(row.get::<i64>(4)?)?,
        gpa: row.get(5)?,
        max_credits: u32::try_from(row.get::<i64>(6)?).unwrap_or(0),
        subjects: rollup.subjects,
        professors: rollup.professors,
        credits: rollup.credits,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        updated_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

impl AulaService {
    /// Fetch enrollment rollups for every student (or one, when `student_id`
    /// is given). Professors are deduplicated, insertion order preserved.
    async fn enrollment_rollups(
        &self,
        student_id: Option<&str>,
    ) -> Result<HashMap<String, EnrollmentRollup>, DatabaseError> {
        let base = "SELECT e.student_id, e.subject_id, s.professor_id, s.credits
             FROM enrollments e
             JOIN subjects s ON s.id = e.subject_id";
        let mut rows = match student_id {
            Some(id) => {
                let sql = format!("{base} WHERE e.student_id = ?1 ORDER BY e.created_at, e.id");
                self.db().conn().query(&sql, [id]).await?
            }
            None => {
                let sql = format!("{base} ORDER BY e.created_at, e.id");
                self.db().conn().query(&sql, ()).await?
            }
        };

        let mut rollups: HashMap<String, EnrollmentRollup> = HashMap::new();
        while let Some(row) = rows.next().await? {
            let student: String = row.get(0)?;
            let subject: String = row.get(1)?;
            let professor: String = row.get(2)?;
            let credits = u32::try_from(row.get::<i64>(3)?).unwrap_or(0);

            let rollup = rollups.entry(student).or_default();
            rollup.subjects.push(subject);
            if !rollup.professors.contains(&professor) {
                rollup.professors.push(professor);
            }
            rollup.credits += credits;
        }
        Ok(rollups)
    }

    /// Register a new student. Derived fields start empty.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Conflict` if the email is already registered.
    pub async fn create_student(
        &self,
        req: &CreateStudentRequest,
    ) -> Result<Student, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_STUDENT).await?;

        let result = self
            .db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO students ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, 0, 9, ?6, ?7)"
                ),
                libsql::params![
                    id.as_str(),
                    req.name.as_str(),
                    req.email.as_str(),
                    req.phone.as_str(),
                    i64::from(req.semester.number()),
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

        self.republish_students(&[id.as_str()]).await?;
        self.get_student(&id)
            .await?
            .ok_or(DatabaseError::NoResult)
    }

    /// Fetch one student with derived fields hydrated. `Ok(None)` if absent.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn get_student(&self, id: &str) -> Result<Option<Student>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM students WHERE id = ?1"),
                [id],
            )
            .await?;
        let Some(row) = rows.next().await? else {
            return Ok(None);
        };
        let mut rollups = self.enrollment_rollups(Some(id)).await?;
        let rollup = rollups.remove(id).unwrap_or_default();
        Ok(Some(row_to_student(&row, rollup)?))
    }

    /// List all students with derived fields hydrated, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_students(&self) -> Result<Vec<Student>, DatabaseError> {
        let mut rollups = self.enrollment_rollups(None).await?;
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM students ORDER BY created_at DESC, id"),
                (),
            )
            .await?;

        let mut students = Vec::new();
        while let Some(row) = rows.next().await? {
            let id: String = row.get(0)?;
            let rollup = rollups.remove(&id).unwrap_or_default();
            students.push(row_to_student(&row, rollup)?);
        }
        Ok(students)
    }

    /// List students enrolled in the given subject.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_students_by_subject(
        &self,
        subject_id: &str,
    ) -> Result<Vec<Student>, DatabaseError> {
        let students = self.list_students().await?;
        Ok(students
            .into_iter()
            .filter(|s| s.subjects.iter().any(|sub| sub == subject_id))
            .collect())
    }

    /// List students taking at least one subject from the given professor.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_students_by_professor(
        &self,
        professor_id: &str,
    ) -> Result<Vec<Student>, DatabaseError> {
        let students = self.list_students().await?;
        Ok(students
            .into_iter()
            .filter(|s| s.professors.iter().any(|p| p == professor_id))
            .collect())
    }

    /// Case-insensitive substring search over student names and emails.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn search_students(&self, term: &str) -> Result<Vec<Student>, DatabaseError> {
        let needle = term.to_lowercase();
        let students = self.list_students().await?;
        Ok(students
            .into_iter()
            .filter(|s| {
                s.name.to_lowercase().contains(&needle) || s.email.to_lowercase().contains(&needle)
            })
            .collect())
    }

    /// Patch a student's own fields. Derived fields cannot be written here;
    /// they only move through enrollment edges.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the student does not exist, or
    /// `DatabaseError::Conflict` if a new email is already taken.
    pub async fn update_student(
        &self,
        id: &str,
        update: StudentUpdate,
    ) -> Result<Student, DatabaseError> {
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
        if let Some(ref phone) = update.phone {
            sets.push(format!("phone = ?{idx}"));
            params.push(phone.clone().into());
            idx += 1;
        }
        if let Some(semester) = update.semester {
            sets.push(format!("semester = ?{idx}"));
            params.push(i64::from(semester.number()).into());
            idx += 1;
        }
        if let Some(gpa) = update.gpa {
            sets.push(format!("gpa = ?{idx}"));
            params.push(gpa.into());
            idx += 1;
        }
        if let Some(max_credits) = update.max_credits {
            sets.push(format!("max_credits = ?{idx}"));
            params.push(i64::from(max_credits).into());
            idx += 1;
        }

        if sets.is_empty() {
            return self
                .get_student(id)
                .await?
                .ok_or_else(|| DatabaseError::not_found(EntityType::Student, id));
        }

        let now = Utc::now();
        sets.push(format!("updated_at = ?{idx}"));
        params.push(now.to_rfc3339().into());
        idx += 1;

        params.push(id.into());
        let sql = format!("UPDATE students SET {} WHERE id = ?{idx}", sets.join(", "));
        let affected = self
            .db()
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
        if affected == 0 {
            return Err(DatabaseError::not_found(EntityType::Student, id));
        }

        self.republish_students(&[id]).await?;
        self.get_student(id)
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Student, id))
    }

    /// Delete a student. Enrollment edges cascade, so subject seat counts
    /// update in the same statement.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the student does not exist.
    pub async fn delete_student(&self, id: &str) -> Result<(), DatabaseError> {
        let affected = self
            .db()
            .conn()
            .execute("DELETE FROM students WHERE id = ?1", [id])
            .await?;
        if affected == 0 {
            return Err(DatabaseError::not_found(EntityType::Student, id));
        }
        // Cascaded edges change subject enrolled counts too.
        self.republish_students(&[id]).await?;
        self.republish_subjects().await?;
        Ok(())
    }
}
