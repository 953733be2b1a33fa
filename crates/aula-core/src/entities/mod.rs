//! Entity structs for all Aula domain objects.
//!
//! Each entity maps to a table in the libSQL database. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip and schema
//! generation.
//!
//! Enrollment-derived fields (`Student::subjects`, `Student::credits`,
//! `Subject::enrolled`, `Professor::subjects`) are hydrated by the gateway from
//! enrollment edges at read time and are never written back as stored columns.

mod enrollment;
mod professor;
mod student;
mod subject;

pub use enrollment::Enrollment;
pub use professor::{CreateProfessorRequest, Professor};
pub use student::{CreateStudentRequest, Student};
pub use subject::{CreateSubjectRequest, Subject};
