//! Normalized entity maps with guarded reconciliation.
//!
//! Two write paths, both guarded against stale data:
//!
//! - **Confirmed mutation** (`apply_confirmed_*` / `remove_*`): the caller got
//!   an entity back from the gateway. Upserts exactly one record; an incoming
//!   `updated_at` older than the stored one is discarded.
//! - **Realtime replace** (`apply_*_snapshot`): a full-collection snapshot
//!   from the watch hub, keyed by its sequence number. Snapshots at or below
//!   the last applied sequence are discarded.

use std::collections::BTreeMap;

use aula_core::entities::{Professor, Student, Subject};
use aula_db::watch::CollectionSnapshot;

use crate::status::LoadState;

/// One collection's map plus its reconciliation bookkeeping.
#[derive(Debug)]
struct Collection<T> {
    items: BTreeMap<String, T>,
    load: LoadState,
    last_seq: u64,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: BTreeMap::new(),
            load: LoadState::default(),
            last_seq: 0,
        }
    }
}

impl<T> Collection<T> {
    /// Apply a snapshot unless it is stale. Returns whether it was applied.
    fn apply_snapshot(&mut self, seq: u64, items: Vec<T>, id_of: impl Fn(&T) -> String) -> bool {
        if seq <= self.last_seq {
            tracing::debug!(seq, last_seq = self.last_seq, "discarding stale snapshot");
            return false;
        }
        self.items = items.into_iter().map(|item| (id_of(&item), item)).collect();
        self.last_seq = seq;
        self.load = LoadState::Ready;
        true
    }
}

/// The single normalized store.
#[derive(Debug, Default)]
pub struct EntityStore {
    students: Collection<Student>,
    subjects: Collection<Subject>,
    professors: Collection<Professor>,
}

macro_rules! collection_accessors {
    ($col:ident, $ty:ty,
     $get:ident, $all:ident, $load:ident, $set_load:ident,
     $confirm:ident, $remove:ident, $snapshot:ident) => {
        #[must_use]
        pub fn $get(&self, id: &str) -> Option<&$ty> {
            self.$col.items.get(id)
        }

        /// All records, ordered by id.
        #[must_use]
        pub fn $all(&self) -> Vec<&$ty> {
            self.$col.items.values().collect()
        }

        #[must_use]
        pub const fn $load(&self) -> &LoadState {
            &self.$col.load
        }

        pub fn $set_load(&mut self, state: LoadState) {
            self.$col.load = state;
        }

        /// Upsert one confirmed record. Discarded if the stored copy has a
        /// newer `updated_at`. Returns whether it was applied.
        pub fn $confirm(&mut self, entity: $ty) -> bool {
            if let Some(existing) = self.$col.items.get(&entity.id) {
                if entity.updated_at < existing.updated_at {
                    tracing::debug!(id = %entity.id, "discarding stale confirmed write");
                    return false;
                }
            }
            self.$col.items.insert(entity.id.clone(), entity);
            true
        }

        /// Remove one record after a confirmed delete. Idempotent.
        pub fn $remove(&mut self, id: &str) {
            self.$col.items.remove(id);
        }

        /// Replace the collection from a watch-hub snapshot. Returns whether
        /// it was applied (false when stale).
        pub fn $snapshot(&mut self, snapshot: CollectionSnapshot<$ty>) -> bool {
            self.$col
                .apply_snapshot(snapshot.seq, snapshot.items, |item| item.id.clone())
        }
    };
}

impl EntityStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    collection_accessors!(
        students, Student,
        student, students, students_load, set_students_load,
        apply_confirmed_student, remove_student, apply_students_snapshot
    );

    collection_accessors!(
        subjects, Subject,
        subject, subjects, subjects_load, set_subjects_load,
        apply_confirmed_subject, remove_subject, apply_subjects_snapshot
    );

    collection_accessors!(
        professors, Professor,
        professor, professors, professors_load, set_professors_load,
        apply_confirmed_professor, remove_professor, apply_professors_snapshot
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use aula_core::enums::Semester;
    use aula_db::watch::CollectionSnapshot;
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;

    fn student(id: &str, updated_offset_secs: i64) -> Student {
        let now = Utc::now();
        Student {
            id: id.to_string(),
            name: "Test".into(),
            email: format!("{id}@aula.edu"),
            phone: String::new(),
            semester: Semester::First,
            gpa: 0.0,
            max_credits: 9,
            subjects: vec![],
            professors: vec![],
            credits: 0,
            created_at: now,
            updated_at: now + Duration::seconds(updated_offset_secs),
        }
    }

    #[test]
    fn confirmed_upsert_and_remove() {
        let mut store = EntityStore::new();
        assert!(store.apply_confirmed_student(student("stu-1", 0)));
        assert!(store.student("stu-1").is_some());

        store.remove_student("stu-1");
        assert!(store.student("stu-1").is_none());
        // Removing again is a no-op.
        store.remove_student("stu-1");
    }

    #[test]
    fn older_confirmed_write_is_discarded() {
        let mut store = EntityStore::new();
        let mut newer = student("stu-1", 100);
        newer.name = "Newer".into();
        assert!(store.apply_confirmed_student(newer));

        let mut older = student("stu-1", 0);
        older.name = "Older".into();
        assert!(!store.apply_confirmed_student(older));
        assert_eq!(store.student("stu-1").unwrap().name, "Newer");
    }

    #[test]
    fn snapshot_replaces_collection() {
        let mut store = EntityStore::new();
        store.apply_confirmed_student(student("stu-gone", 0));

        let applied = store.apply_students_snapshot(CollectionSnapshot {
            seq: 1,
            items: vec![student("stu-1", 0), student("stu-2", 0)],
        });
        assert!(applied);
        assert!(store.student("stu-gone").is_none());
        assert_eq!(store.students().len(), 2);
        assert!(store.students_load().is_ready());
    }

    #[test]
    fn stale_snapshot_is_discarded() {
        let mut store = EntityStore::new();
        assert!(store.apply_students_snapshot(CollectionSnapshot {
            seq: 5,
            items: vec![student("stu-1", 0)],
        }));

        // A late snapshot with an older sequence must not win.
        assert!(!store.apply_students_snapshot(CollectionSnapshot {
            seq: 4,
            items: vec![],
        }));
        assert_eq!(store.students().len(), 1);

        // Same sequence replayed (at-least-once delivery) is also discarded.
        assert!(!store.apply_students_snapshot(CollectionSnapshot {
            seq: 5,
            items: vec![],
        }));
        assert_eq!(store.students().len(), 1);
    }
}
