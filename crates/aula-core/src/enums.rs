//! Semester and entity-type enums for Aula.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! except [`Semester`], which serializes as its ordinal number.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Semester
// ---------------------------------------------------------------------------

/// Academic semester, 1 through 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "u8", into = "u8")]
pub enum Semester {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
    Seventh,
    Eighth,
    Ninth,
    Tenth,
}

impl Semester {
    /// Ordinal number of the semester (1-based).
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
            Self::Fourth => 4,
            Self::Fifth => 5,
            Self::Sixth => 6,
            Self::Seventh => 7,
            Self::Eighth => 8,
            Self::Ninth => 9,
            Self::Tenth => 10,
        }
    }
}

impl TryFrom<u8> for Semester {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Self::First),
            2 => Ok(Self::Second),
            3 => Ok(Self::Third),
            4 => Ok(Self::Fourth),
            5 => Ok(Self::Fifth),
            6 => Ok(Self::Sixth),
            7 => Ok(Self::Seventh),
            8 => Ok(Self::Eighth),
            9 => Ok(Self::Ninth),
            10 => Ok(Self::Tenth),
            other => Err(format!("semester out of range (1-10): {other}")),
        }
    }
}

impl From<Semester> for u8 {
    fn from(s: Semester) -> Self {
        s.number()
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// The entity collections managed by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Student,
    Subject,
    Professor,
    Enrollment,
}

impl EntityType {
    /// String representation used in error messages and audit output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Subject => "subject",
            Self::Professor => "professor",
            Self::Enrollment => "enrollment",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn semester_roundtrips_through_u8() {
        for n in 1..=10u8 {
            let sem = Semester::try_from(n).unwrap();
            assert_eq!(u8::from(sem), n);
        }
    }

    #[test]
    fn semester_rejects_out_of_range() {
        assert!(Semester::try_from(0).is_err());
        assert!(Semester::try_from(11).is_err());
    }

    #[test]
    fn semester_serde_uses_number() {
        let json = serde_json::to_string(&Semester::Fifth).unwrap();
        assert_eq!(json, "5");
        let back: Semester = serde_json::from_str("5").unwrap();
        assert_eq!(back, Semester::Fifth);
    }

    #[test]
    fn entity_type_snake_case() {
        let json = serde_json::to_string(&EntityType::Professor).unwrap();
        assert_eq!(json, "\"professor\"");
    }
}
