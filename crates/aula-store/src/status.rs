//! Load states and per-action finite state machines.
//!
//! `LoadState` gates initial collection fetches (a Ready collection is not
//! re-fetched). `ActionState` replaces ad hoc boolean "busy" flags: each
//! action owns one FSM, and the RAII [`ActionGuard`] makes a second in-flight
//! invocation of the same action structurally impossible.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::StoreError;

/// Lifecycle of a collection's initial load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    NotLoaded,
    Loading,
    Ready,
    /// Load failed with a user-facing message.
    Failed(String),
}

impl LoadState {
    /// Whether a fetch should run: only from `NotLoaded` or `Failed`.
    #[must_use]
    pub const fn needs_fetch(&self) -> bool {
        matches!(self, Self::NotLoaded | Self::Failed(_))
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Lifecycle of one user-triggered action (e.g. "save selection").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ActionState {
    #[default]
    Idle,
    InFlight,
    Done,
    /// Failed with a user-facing message. A fresh invocation may retry.
    Failed(String),
}

/// Per-action FSM with an RAII in-flight guard.
///
/// `begin()` transitions Idle/Done/Failed to InFlight and hands back a guard;
/// while the guard lives, `begin()` refuses a second invocation. Dropping the
/// guard without completing marks the action Failed (an abandoned action is
/// not silently Idle again).
#[derive(Debug, Clone, Default)]
pub struct ActionFsm {
    name: String,
    state: ActionState,
    in_flight: Arc<AtomicBool>,
}

impl ActionFsm {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: ActionState::Idle,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &ActionState {
        &self.state
    }

    /// Start the action.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ActionInFlight` if a previous invocation's guard
    /// is still alive.
    pub fn begin(&mut self) -> Result<ActionGuard, StoreError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(StoreError::ActionInFlight(self.name.clone()));
        }
        self.state = ActionState::InFlight;
        Ok(ActionGuard {
            in_flight: Arc::clone(&self.in_flight),
            completed: false,
        })
    }

    /// Record a successful completion and release the guard.
    pub fn complete(&mut self, mut guard: ActionGuard) {
        guard.completed = true;
        drop(guard);
        self.state = ActionState::Done;
    }

    /// Record a failure and release the guard.
    pub fn fail(&mut self, mut guard: ActionGuard, message: impl Into<String>) {
        guard.completed = true;
        drop(guard);
        self.state = ActionState::Failed(message.into());
    }

    /// Observe an abandoned guard (dropped without complete/fail).
    pub fn reconcile_abandoned(&mut self) {
        if self.state == ActionState::InFlight && !self.in_flight.load(Ordering::SeqCst) {
            self.state = ActionState::Failed("action abandoned".into());
        }
    }
}

/// Held while an action runs. Dropping it releases the in-flight slot.
#[derive(Debug)]
pub struct ActionGuard {
    in_flight: Arc<AtomicBool>,
    completed: bool,
}

impl Drop for ActionGuard {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::SeqCst);
        let _ = self.completed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn load_state_fetch_gating() {
        assert!(LoadState::NotLoaded.needs_fetch());
        assert!(LoadState::Failed("boom".into()).needs_fetch());
        assert!(!LoadState::Loading.needs_fetch());
        assert!(!LoadState::Ready.needs_fetch());
    }

    #[test]
    fn action_happy_path() {
        let mut fsm = ActionFsm::new("save");
        assert_eq!(*fsm.state(), ActionState::Idle);

        let guard = fsm.begin().unwrap();
        assert_eq!(*fsm.state(), ActionState::InFlight);
        fsm.complete(guard);
        assert_eq!(*fsm.state(), ActionState::Done);

        // Done allows a fresh invocation.
        let guard = fsm.begin().unwrap();
        fsm.fail(guard, "db unreachable");
        assert_eq!(*fsm.state(), ActionState::Failed("db unreachable".into()));
    }

    #[test]
    fn concurrent_begin_is_refused() {
        let mut fsm = ActionFsm::new("save");
        let _guard = fsm.begin().unwrap();
        assert!(matches!(
            fsm.begin(),
            Err(StoreError::ActionInFlight(name)) if name == "save"
        ));
    }

    #[test]
    fn dropped_guard_frees_slot_and_reconciles_to_failed() {
        let mut fsm = ActionFsm::new("save");
        let guard = fsm.begin().unwrap();
        drop(guard);
        fsm.reconcile_abandoned();
        assert_eq!(*fsm.state(), ActionState::Failed("action abandoned".into()));
        // Slot is free again.
        assert!(fsm.begin().is_ok());
    }
}
