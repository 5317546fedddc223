//! Session state for one project board.
//!
//! A session owns a [`BoardStore`] and a [`LabelRegistry`] over a shared
//! cache, plus a [`DragOrchestrator`] that turns pointer gestures into store
//! operations. All mutation goes through `&mut` methods, so gestures and
//! pending edits are strictly sequential.

mod commit;
pub mod drag;
pub mod labels;
pub mod session;
pub mod store;

pub use drag::{DragContext, DragOrchestrator, DropOutcome, DropTarget};
pub use labels::{LabelRegistry, LabelUsage};
pub use session::BoardSession;
pub use store::BoardStore;
