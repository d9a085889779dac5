//! Session lifecycle: in-memory registry and the orchestrating service.

pub mod registry;
pub mod service;

pub use registry::{SessionRecord, SessionRegistry, SessionStatus};
pub use service::{SessionService, SessionView, StartedSession};
