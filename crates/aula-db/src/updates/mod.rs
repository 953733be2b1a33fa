//! Update builder types for entity mutations.
//!
//! Each builder produces an update struct with `Option` fields. Only `Some`
//! fields generate SET clauses in the dynamic UPDATE SQL, so callers patch
//! exactly the fields they name and nothing else.

pub mod professor;
pub mod student;
pub mod subject;
