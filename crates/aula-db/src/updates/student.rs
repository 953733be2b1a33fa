//! Student update builder.

use serde::Serialize;

use aula_core::enums::Semester;

#[derive(Debug, Clone, Default, Serialize)]
pub struct StudentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<Semester>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpa: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_credits: Option<u32>,
}

pub struct StudentUpdateBuilder(StudentUpdate);

impl Default for StudentUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StudentUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(StudentUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.0.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.0.phone = Some(phone.into());
        self
    }

    #[must_use]
    pub const fn semester(mut self, semester: Semester) -> Self {
        self.0.semester = Some(semester);
        self
    }

    #[must_use]
    pub const fn gpa(mut self, gpa: f64) -> Self {
        self.0.gpa = Some(gpa);
        self
    }

    #[must_use]
    pub const fn max_credits(mut self, max_credits: u32) -> Self {
        self.0.max_credits = Some(max_credits);
        self
    }

    #[must_use]
    pub fn build(self) -> StudentUpdate {
        self.0
    }
}
