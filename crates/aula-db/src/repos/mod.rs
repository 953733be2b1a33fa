//! Repository modules implementing CRUD operations for the Aula collections.
//!
//! Each module adds methods to `AulaService` via `impl AulaService` blocks.
//! Derived fields (subject enrolled counts, student subject/professor/credit
//! rollups, professor rosters) are hydrated from the enrollments and subjects
//! tables at read time.

pub mod enrollment;
pub mod professor;
pub mod student;
pub mod subject;
