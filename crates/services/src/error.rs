//! Shared error types for the services crate.

use thiserror::Error;

use fraction_core::grader::GradeError;
use fraction_core::steps::StepBuildError;

/// Errors emitted by `PracticeSession`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no round has been started")]
    NoActiveRound,
    #[error("the current round is already complete")]
    RoundComplete,
    #[error("all {rounds} rounds of this session are done")]
    SessionComplete { rounds: u32 },
    #[error(transparent)]
    Grade(#[from] GradeError),
    #[error(transparent)]
    StepBuild(#[from] StepBuildError),
}
