//! Realtime subscription hub.
//!
//! Every committed mutation republishes the affected collection as a
//! sequence-numbered full snapshot on a `tokio::sync::broadcast` channel.
//! Delivery is at-least-once: a slow receiver may observe a `Lagged` gap, in
//! which case it simply resumes with a newer snapshot (each snapshot carries
//! the complete collection, so skipped intermediates lose nothing).
//!
//! Sequence numbers are monotonic per collection. Consumers (the entity store)
//! discard any snapshot at or below the last sequence they applied, so a
//! late-arriving stale snapshot can never overwrite fresher state.
//!
//! Unsubscribing is explicit by construction: dropping a [`Subscription`]
//! detaches its receiver from the channel.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::broadcast;

use aula_core::entities::{Professor, Student, Subject};

/// Broadcast buffer depth per feed. Snapshots are full-state, so a lagged
/// receiver only ever needs the newest one.
const FEED_CAPACITY: usize = 32;

/// A full-collection snapshot pushed on any change to the collection.
#[derive(Debug, Clone)]
pub struct CollectionSnapshot<T> {
    /// Monotonic per-collection sequence number.
    pub seq: u64,
    pub items: Vec<T>,
}

/// A single-document event: the document's current state, or `None` on delete.
#[derive(Debug, Clone)]
pub struct DocumentEvent<T> {
    pub seq: u64,
    pub id: String,
    pub doc: Option<T>,
}

/// One broadcast feed plus its sequence counter.
struct Feed<T> {
    tx: broadcast::Sender<T>,
    seq: AtomicU64,
}

impl<T: Clone> Feed<T> {
    fn new() -> Self {
        let (tx, _) = broadcast::channel(FEED_CAPACITY);
        Self {
            tx,
            seq: AtomicU64::new(0),
        }
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn send(&self, event: T) {
        // No receivers is fine; the event is simply dropped.
        let _ = self.tx.send(event);
    }
}

/// Central hub owning one feed per collection plus the per-student feed.
pub struct WatchHub {
    students: Feed<CollectionSnapshot<Student>>,
    subjects: Feed<CollectionSnapshot<Subject>>,
    professors: Feed<CollectionSnapshot<Professor>>,
    student_docs: Feed<DocumentEvent<Student>>,
}

impl Default for WatchHub {
    fn default() -> Self {
        Self::new()
    }
}

impl WatchHub {
    #[must_use]
    pub fn new() -> Self {
        Self {
            students: Feed::new(),
            subjects: Feed::new(),
            professors: Feed::new(),
            student_docs: Feed::new(),
        }
    }

    /// Subscribe to full-collection snapshots of students.
    #[must_use]
    pub fn subscribe_students(&self) -> Subscription<CollectionSnapshot<Student>> {
        Subscription {
            rx: self.students.tx.subscribe(),
        }
    }

    /// Subscribe to full-collection snapshots of subjects.
    #[must_use]
    pub fn subscribe_subjects(&self) -> Subscription<CollectionSnapshot<Subject>> {
        Subscription {
            rx: self.subjects.tx.subscribe(),
        }
    }

    /// Subscribe to full-collection snapshots of professors.
    #[must_use]
    pub fn subscribe_professors(&self) -> Subscription<CollectionSnapshot<Professor>> {
        Subscription {
            rx: self.professors.tx.subscribe(),
        }
    }

    /// Subscribe to one student's document feed. The payload is `None` when
    /// the student is deleted.
    #[must_use]
    pub fn subscribe_student(&self, student_id: &str) -> DocumentSubscription<Student> {
        DocumentSubscription {
            rx: self.student_docs.tx.subscribe(),
            id: student_id.to_string(),
        }
    }

    pub(crate) fn publish_students(&self, items: Vec<Student>) {
        let seq = self.students.next_seq();
        self.students.send(CollectionSnapshot { seq, items });
    }

    pub(crate) fn publish_subjects(&self, items: Vec<Subject>) {
        let seq = self.subjects.next_seq();
        self.subjects.send(CollectionSnapshot { seq, items });
    }

    pub(crate) fn publish_professors(&self, items: Vec<Professor>) {
        let seq = self.professors.next_seq();
        self.professors.send(CollectionSnapshot { seq, items });
    }

    pub(crate) fn publish_student_doc(&self, id: &str, doc: Option<Student>) {
        let seq = self.student_docs.next_seq();
        self.student_docs.send(DocumentEvent {
            seq,
            id: id.to_string(),
            doc,
        });
    }
}

/// A live collection feed. Drop it to unsubscribe.
pub struct Subscription<T> {
    rx: broadcast::Receiver<T>,
}

impl<T: Clone> Subscription<T> {
    /// Receive the next event. Returns `None` once the hub is gone.
    ///
    /// A `Lagged` gap is skipped transparently; the next received snapshot is
    /// full-state anyway.
    pub async fn recv(&mut self) -> Option<T> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking poll for the next event, for UI ticks.
    pub fn try_recv(&mut self) -> Option<T> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => {}
                Err(_) => return None,
            }
        }
    }
}

/// A live single-document feed filtered by id. Drop it to unsubscribe.
pub struct DocumentSubscription<T> {
    rx: broadcast::Receiver<DocumentEvent<T>>,
    id: String,
}

impl<T: Clone> DocumentSubscription<T> {
    /// Receive the next event for the subscribed document.
    pub async fn recv(&mut self) -> Option<DocumentEvent<T>> {
        loop {
            match self.rx.recv().await {
                Ok(event) if event.id == self.id => return Some(event),
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: &str) -> Student {
        use aula_core::enums::Semester;
        let now = chrono::Utc::now();
        Student {
            id: id.to_string(),
            name: "Test".into(),
            email: format!("{id}@x.edu"),
            phone: String::new(),
            semester: Semester::First,
            gpa: 0.0,
            max_credits: 9,
            subjects: vec![],
            professors: vec![],
            credits: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn snapshot_sequence_is_monotonic() {
        let hub = WatchHub::new();
        let mut sub = hub.subscribe_students();

        hub.publish_students(vec![student("stu-1")]);
        hub.publish_students(vec![student("stu-1"), student("stu-2")]);

        let first = sub.recv().await.unwrap();
        let second = sub.recv().await.unwrap();
        assert_eq!(first.seq, 1);
        assert_eq!(second.seq, 2);
        assert_eq!(second.items.len(), 2);
    }

    #[tokio::test]
    async fn publish_without_receivers_is_noop() {
        let hub = WatchHub::new();
        hub.publish_subjects(vec![]);
        // Subscribing after the fact sees only new events.
        let mut sub = hub.subscribe_subjects();
        hub.publish_subjects(vec![]);
        let snap = sub.recv().await.unwrap();
        assert_eq!(snap.seq, 2);
    }

    #[tokio::test]
    async fn document_feed_filters_by_id() {
        let hub = WatchHub::new();
        let mut sub = hub.subscribe_student("stu-2");

        hub.publish_student_doc("stu-1", Some(student("stu-1")));
        hub.publish_student_doc("stu-2", Some(student("stu-2")));

        let event = sub.recv().await.unwrap();
        assert_eq!(event.id, "stu-2");
        assert!(event.doc.is_some());
    }

    #[tokio::test]
    async fn document_feed_delivers_delete_as_none() {
        let hub = WatchHub::new();
        let mut sub = hub.subscribe_student("stu-1");
        hub.publish_student_doc("stu-1", None);
        let event = sub.recv().await.unwrap();
        assert!(event.doc.is_none());
    }

    #[tokio::test]
    async fn dropped_subscription_detaches() {
        let hub = WatchHub::new();
        let sub = hub.subscribe_students();
        drop(sub);
        // Sending after the only receiver is gone must not panic.
        hub.publish_students(vec![]);
    }
}
