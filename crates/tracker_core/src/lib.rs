//! Kanban board core for the job-application tracker.
//!
//! [`store::Store`] holds the board and applies [`store::Action`]s;
//! [`drag::DragCoordinator`] turns pointer gestures into actions;
//! [`session::TrackerSession`] pairs the store with the registry that owns
//! attachment handles, and hands out [`draft::JobDraft`]s and
//! [`forms::ColumnForm`]s for the dialogs.

pub mod attachments;
pub mod display;
pub mod draft;
pub mod drag;
pub mod forms;
pub mod invariants;
pub mod seed;
pub mod session;
pub mod store;

pub use attachments::{FileBlob, ObjectUrlRegistry, ResourceError, ResourceRegistry};
pub use draft::{DraftError, DraftMode, JobDraft, Saved};
pub use drag::{ColumnSpan, DragCoordinator, DragPhase};
pub use invariants::InvariantViolation;
pub use session::TrackerSession;
pub use store::{reduce, Action, BoardState, Dispatcher, Store};
