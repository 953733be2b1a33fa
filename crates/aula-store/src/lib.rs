//! # aula-store
//!
//! Normalized client-side entity store.
//!
//! One store holds every entity collection as an id-keyed map, the per-type
//! load states, and the auth session (which carries only the authenticated
//! student's id, never a second copy of the record). All writes arrive either
//! as a confirmed single-entity mutation guarded by `updated_at`, or as a
//! sequence-numbered full snapshot from the watch hub guarded by the last
//! applied sequence, so stale data can never clobber fresh state.

pub mod error;
pub mod session;
pub mod status;
pub mod store;

pub use error::StoreError;
pub use session::{AuthSession, SessionStore};
pub use status::{ActionFsm, ActionGuard, ActionState, LoadState};
pub use store::EntityStore;
