//! Professor update builder.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfessorUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_subjects: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

pub struct ProfessorUpdateBuilder(ProfessorUpdate);

impl Default for ProfessorUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfessorUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(ProfessorUpdate::default())
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
    pub const fn max_subjects(mut self, max_subjects: u32) -> Self {
        self.0.max_subjects = Some(max_subjects);
        self
    }

    #[must_use]
    pub const fn is_active(mut self, is_active: bool) -> Self {
        self.0.is_active = Some(is_active);
        self
    }

    #[must_use]
    pub fn build(self) -> ProfessorUpdate {
        self.0
    }
}
