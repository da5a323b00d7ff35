mod progress;
mod service;
mod summary;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use service::{PracticeSession, StepAnswer};
pub use summary::SessionSummary;
