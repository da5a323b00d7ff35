mod fraction;
mod ids;
mod operation;
mod problem;
mod settings;
mod sign;
mod step;

pub use fraction::{Fraction, FractionError};
pub use ids::{ParseIdError, ProblemId, StepId};
pub use operation::{Difficulty, DifficultyError, OperationKind, ParseOperationError};
pub use problem::{Expected, Problem};
pub use settings::{PracticeSettings, PracticeSettingsError};
pub use sign::{ComparisonSign, ParseSignError};
pub use step::{InputSlots, InteractiveStep, StepKind, StepSequence};
