//! Draft selection persistence between CLI invocations.
//!
//! The selection screen of a long-lived UI keeps its working selection in
//! memory; a one-shot CLI needs it on disk between `toggle` and `save`. One
//! draft file per student, next to the session file.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;

use aula_core::rules::Selection;

#[derive(Debug, Clone)]
pub struct DraftStore {
    path: PathBuf,
}

impl DraftStore {
    /// Draft store for one student at the default location
    /// (`<user config dir>/aula/draft-<student_id>.json`).
    ///
    /// # Errors
    ///
    /// Fails if no user config directory exists.
    pub fn for_student(student_id: &str) -> anyhow::Result<Self> {
        let dir = dirs::config_dir().context("no user config directory available")?;
        Ok(Self::at(dir.join("aula").join(format!("draft-{student_id}.json"))))
    }

    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the draft. `Ok(None)` when no draft exists.
    pub fn load(&self) -> anyhow::Result<Option<Selection>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read draft at {}", self.path.display()))?;
        let ids: Vec<String> = serde_json::from_str(&raw)
            .with_context(|| format!("corrupt draft file at {}", self.path.display()))?;
        Ok(Some(ids.into_iter().collect()))
    }

    pub fn save(&self, selection: &Selection) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let ids: Vec<&String> = selection.iter().collect();
        fs::write(&self.path, serde_json::to_string_pretty(&ids)?)
            .with_context(|| format!("failed to write draft at {}", self.path.display()))?;
        Ok(())
    }

    /// Remove the draft. Idempotent.
    pub fn clear(&self) -> anyhow::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn draft_roundtrip_and_clear() {
        let dir = TempDir::new().unwrap();
        let store = DraftStore::at(dir.path().join("draft.json"));
        assert_eq!(store.load().unwrap(), None);

        let selection: Selection = ["sub-2".to_string(), "sub-1".to_string()]
            .into_iter()
            .collect();
        store.save(&selection).unwrap();
        assert_eq!(store.load().unwrap(), Some(selection));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }
}
