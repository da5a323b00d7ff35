//! Fraction arithmetic tutor core: problem generation, step decomposition and
//! step grading. Everything here is synchronous and free of I/O.

#![forbid(unsafe_code)]

pub mod error;
pub mod generator;
pub mod grader;
pub mod input;
pub mod math;
pub mod model;
pub mod steps;
pub mod time;

pub use error::Error;
pub use generator::{ProblemGenerator, generate_problem};
pub use grader::{Graded, Remediation, Submission, grade_step};
pub use math::fractions_equivalent;
pub use steps::build_step_sequence;
pub use time::Clock;
