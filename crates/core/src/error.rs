use thiserror::Error;

use crate::grader::GradeError;
use crate::model::{
    DifficultyError, FractionError, ParseIdError, ParseOperationError, ParseSignError, PracticeSettingsError,
};
use crate::steps::StepBuildError;

/// Any error raised by this crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Fraction(#[from] FractionError),
    #[error(transparent)]
    Difficulty(#[from] DifficultyError),
    #[error(transparent)]
    Id(#[from] ParseIdError),
    #[error(transparent)]
    Operation(#[from] ParseOperationError),
    #[error(transparent)]
    Sign(#[from] ParseSignError),
    #[error(transparent)]
    Settings(#[from] PracticeSettingsError),
    #[error(transparent)]
    StepBuild(#[from] StepBuildError),
    #[error(transparent)]
    Grade(#[from] GradeError),
}
