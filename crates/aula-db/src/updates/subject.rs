//! Subject update builder.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct SubjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub professor_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prerequisites: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

pub struct SubjectUpdateBuilder(SubjectUpdate);

impl Default for SubjectUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SubjectUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(SubjectUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub const fn credits(mut self, credits: u32) -> Self {
        self.0.credits = Some(credits);
        self
    }

    #[must_use]
    pub fn professor_id(mut self, professor_id: impl Into<String>) -> Self {
        self.0.professor_id = Some(professor_id.into());
        self
    }

    #[must_use]
    pub fn schedule(mut self, schedule: impl Into<String>) -> Self {
        self.0.schedule = Some(schedule.into());
        self
    }

    #[must_use]
    pub const fn capacity(mut self, capacity: u32) -> Self {
        self.0.capacity = Some(capacity);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.0.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn prerequisites(mut self, prerequisites: Vec<String>) -> Self {
        self.0.prerequisites = Some(prerequisites);
        self
    }

    #[must_use]
    pub const fn is_active(mut self, is_active: bool) -> Self {
        self.0.is_active = Some(is_active);
        self
    }

    #[must_use]
    pub fn build(self) -> SubjectUpdate {
        self.0
    }
}
