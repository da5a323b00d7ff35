#![forbid(unsafe_code)]

pub mod error;
pub mod feedback;
pub mod sessions;

pub use fraction_core::Clock;

pub use error::SessionError;
pub use feedback::{Cue, FeedbackSink, RecordingFeedback, SilentFeedback, Tone, Waveform};
pub use sessions::{PracticeSession, SessionProgress, SessionSummary, StepAnswer};
