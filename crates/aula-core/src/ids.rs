//! ID prefix constants and formatting helpers.
//!
//! Every entity ID is `<prefix>-<8 hex chars>`, e.g. `stu-a3f8b2c1`. The random
//! part is generated by the gateway (see `aula-db`); this module only owns the
//! prefixes so every crate agrees on them.

pub const PREFIX_STUDENT: &str = "stu";
pub const PREFIX_SUBJECT: &str = "sub";
pub const PREFIX_PROFESSOR: &str = "prf";
pub const PREFIX_ENROLLMENT: &str = "enr";

/// All known prefixes, for exhaustive tests.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_STUDENT,
    PREFIX_SUBJECT,
    PREFIX_PROFESSOR,
    PREFIX_ENROLLMENT,
];

/// Check whether an ID carries the given prefix.
#[must_use]
pub fn has_prefix(id: &str, prefix: &str) -> bool {
    id.len() > prefix.len() + 1 && id.starts_with(prefix) && id.as_bytes()[prefix.len()] == b'-'
}
