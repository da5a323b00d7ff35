use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use fraction_core::Clock;
use fraction_core::generator::ProblemGenerator;
use fraction_core::grader::{Remediation, Submission, grade_step};
use fraction_core::model::{
    Difficulty, InteractiveStep, OperationKind, PracticeSettings, Problem, StepSequence,
};
use fraction_core::steps::build_step_sequence;

use super::progress::SessionProgress;
use super::summary::SessionSummary;
use crate::error::SessionError;
use crate::feedback::{Cue, FeedbackSink};

//
// ─── STEP ANSWER ───────────────────────────────────────────────────────────────
//

/// Outcome of submitting an answer for the active step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepAnswer {
    pub correct: bool,
    pub round_complete: bool,
    /// Set when an improper answer was accepted and an extra step inserted.
    pub remediation: Option<Remediation>,
    pub score: u32,
    pub streak: u32,
}

//
// ─── ROUND ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone)]
struct Round {
    problem: Problem,
    steps: StepSequence,
    cursor: usize,
    complete: bool,
}

impl Round {
    fn current_step(&self) -> Option<&InteractiveStep> {
        if self.complete {
            None
        } else {
            self.steps.get(self.cursor)
        }
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Drives a practice run: one problem per round, one step at a time.
///
/// Score and streak go up by one for every completed round; any incorrect step
/// answer resets the streak. Difficulty for the next round follows the score
/// unless the settings pin it.
pub struct PracticeSession<R = StdRng> {
    operation: OperationKind,
    settings: PracticeSettings,
    clock: Clock,
    feedback: Arc<dyn FeedbackSink>,
    generator: ProblemGenerator<R>,
    round: Option<Round>,
    rounds_started: u32,
    rounds_completed: u32,
    score: u32,
    streak: u32,
    best_streak: u32,
    correct_answers: u32,
    incorrect_answers: u32,
    remediations: u32,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl PracticeSession<StdRng> {
    /// Create a session with an OS-seeded generator.
    #[must_use]
    pub fn new(
        operation: OperationKind,
        settings: PracticeSettings,
        clock: Clock,
        feedback: Arc<dyn FeedbackSink>,
    ) -> Self {
        let generator = ProblemGenerator::new(StdRng::from_os_rng());
        Self::with_generator(operation, settings, clock, feedback, generator)
    }
}

impl<R: rand::Rng> PracticeSession<R> {
    /// Create a session that draws problems from `generator`.
    ///
    /// Pass `ProblemGenerator::seeded` for reproducible sessions.
    #[must_use]
    pub fn with_generator(
        operation: OperationKind,
        settings: PracticeSettings,
        clock: Clock,
        feedback: Arc<dyn FeedbackSink>,
        generator: ProblemGenerator<R>,
    ) -> Self {
        Self {
            operation,
            settings,
            started_at: clock.now(),
            clock,
            feedback,
            generator,
            round: None,
            rounds_started: 0,
            rounds_completed: 0,
            score: 0,
            streak: 0,
            best_streak: 0,
            correct_answers: 0,
            incorrect_answers: 0,
            remediations: 0,
            completed_at: None,
        }
    }

    #[must_use]
    pub fn operation(&self) -> OperationKind {
        self.operation
    }

    /// Switch the operation practised from the next round on.
    pub fn set_operation(&mut self, operation: OperationKind) {
        if operation != self.operation {
            debug!(from = %self.operation, to = %operation, "operation changed");
            self.operation = operation;
        }
    }

    #[must_use]
    pub fn settings(&self) -> &PracticeSettings {
        &self.settings
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn streak(&self) -> u32 {
        self.streak
    }

    #[must_use]
    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Mutable access to the session clock, mainly for advancing fixed clocks.
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    /// Difficulty the next round will use.
    #[must_use]
    pub fn next_difficulty(&self) -> Difficulty {
        self.settings.difficulty_for_score(self.score)
    }

    /// Generate the next problem and make its first step active.
    ///
    /// Starting a round while another is unfinished abandons the old one
    /// without touching score or streak.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SessionComplete` once the configured number of
    /// rounds is done, or `SessionError::StepBuild` if the generated problem
    /// cannot be decomposed.
    pub fn start_round(&mut self) -> Result<&Problem, SessionError> {
        if let Some(rounds) = self.settings.rounds_per_session() {
            if self.rounds_completed >= rounds {
                return Err(SessionError::SessionComplete { rounds });
            }
        }

        if let Some(abandoned) = self.round.as_ref().filter(|round| !round.complete) {
            debug!(problem = %abandoned.problem.id, "abandoning unfinished round");
        }

        let difficulty = self.next_difficulty();
        let problem = self.generator.generate(self.operation, difficulty);
        let steps = build_step_sequence(&problem)?;

        let cue = if self.rounds_started == 0 {
            Cue::Start
        } else {
            Cue::Click
        };
        self.feedback.play(cue);
        self.rounds_started += 1;

        info!(
            round = self.rounds_started,
            problem = %problem.id,
            operation = %problem.operation,
            difficulty = difficulty.level(),
            steps = steps.len(),
            expression = %problem,
            "round started"
        );

        let round = self.round.insert(Round {
            problem,
            steps,
            cursor: 0,
            complete: false,
        });
        Ok(&round.problem)
    }

    #[must_use]
    pub fn problem(&self) -> Option<&Problem> {
        self.round.as_ref().map(|round| &round.problem)
    }

    /// Steps of the current round, including any inserted remediation step.
    #[must_use]
    pub fn steps(&self) -> Option<&StepSequence> {
        self.round.as_ref().map(|round| &round.steps)
    }

    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.round.as_ref().map(|round| round.cursor)
    }

    /// The step awaiting an answer, or `None` between rounds.
    #[must_use]
    pub fn current_step(&self) -> Option<&InteractiveStep> {
        self.round.as_ref().and_then(Round::current_step)
    }

    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        self.current_step().map(|step| step.hint.as_str())
    }

    /// Grade an answer for the active step and advance on success.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveRound` before the first round,
    /// `SessionError::RoundComplete` once the round's last step is answered.
    pub fn submit(&mut self, submission: &Submission) -> Result<StepAnswer, SessionError> {
        let round = self.round.as_mut().ok_or(SessionError::NoActiveRound)?;
        if round.complete {
            return Err(SessionError::RoundComplete);
        }

        let graded = grade_step(&round.steps, round.cursor, submission)?;
        let step_kind = round.steps.get(round.cursor).map(|step| step.kind);

        if !graded.correct {
            self.incorrect_answers += 1;
            self.streak = 0;
            self.feedback.play(Cue::Incorrect);
            debug!(step = ?step_kind, cursor = round.cursor, "incorrect answer");
            return Ok(StepAnswer {
                correct: false,
                round_complete: false,
                remediation: None,
                score: self.score,
                streak: self.streak,
            });
        }

        self.correct_answers += 1;
        debug!(step = ?step_kind, cursor = round.cursor, "correct answer");

        if let Some(remediation) = graded.remediation {
            self.remediations += 1;
            info!(
                entered = %remediation.entered,
                target = %remediation.target,
                inserted = %remediation.inserted,
                "improper answer accepted, extract-whole step inserted"
            );
        }

        round.steps = graded.sequence;
        round.cursor = graded.cursor;
        round.complete = graded.round_complete;
        let problem_id = round.problem.id;

        self.feedback.play(Cue::Correct);

        if graded.round_complete {
            self.finish_round(problem_id);
        }

        Ok(StepAnswer {
            correct: true,
            round_complete: graded.round_complete,
            remediation: graded.remediation,
            score: self.score,
            streak: self.streak,
        })
    }

    fn finish_round(&mut self, problem_id: fraction_core::model::ProblemId) {
        let before = self.next_difficulty();
        self.rounds_completed += 1;
        self.score += 1;
        self.streak += 1;
        self.best_streak = self.best_streak.max(self.streak);

        info!(
            problem = %problem_id,
            score = self.score,
            streak = self.streak,
            "round complete"
        );

        let after = self.next_difficulty();
        if after != before {
            info!(from = before.level(), to = after.level(), "difficulty changed");
        }

        if self.is_complete() {
            self.completed_at = Some(self.clock.now());
            info!(rounds = self.rounds_completed, score = self.score, "session complete");
        }
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let (step_index, step_count, round_complete, difficulty) = match &self.round {
            Some(round) => (
                round.cursor,
                round.steps.len(),
                round.complete,
                Some(round.problem.difficulty),
            ),
            None => (0, 0, false, None),
        };
        SessionProgress {
            rounds_completed: self.rounds_completed,
            score: self.score,
            streak: self.streak,
            difficulty,
            step_index,
            step_count,
            round_complete,
        }
    }

    /// True once the configured number of rounds has been completed.
    ///
    /// Sessions without a round limit never complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.settings
            .rounds_per_session()
            .is_some_and(|rounds| self.rounds_completed >= rounds)
    }

    /// Report for the session so far. An unfinished session is stamped with
    /// the current clock time.
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            operation: self.operation,
            started_at: self.started_at,
            completed_at: self.completed_at.unwrap_or_else(|| self.clock.now()),
            rounds_completed: self.rounds_completed,
            score: self.score,
            best_streak: self.best_streak,
            correct_answers: self.correct_answers,
            incorrect_answers: self.incorrect_answers,
            remediations: self.remediations,
            final_difficulty: self
                .round
                .as_ref()
                .map_or_else(|| self.next_difficulty(), |round| round.problem.difficulty),
        }
    }
}

impl<R> fmt::Debug for PracticeSession<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PracticeSession")
            .field("operation", &self.operation)
            .field("settings", &self.settings)
            .field("rounds_completed", &self.rounds_completed)
            .field("score", &self.score)
            .field("streak", &self.streak)
            .field("round", &self.round)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{RecordingFeedback, SilentFeedback};
    use chrono::Duration;
    use fraction_core::model::{ComparisonSign, Expected, Fraction, StepKind};
    use fraction_core::time::fixed_clock;

    fn build_session(
        operation: OperationKind,
        settings: PracticeSettings,
        feedback: Arc<dyn FeedbackSink>,
    ) -> PracticeSession<StdRng> {
        PracticeSession::with_generator(
            operation,
            settings,
            fixed_clock(),
            feedback,
            ProblemGenerator::seeded(42),
        )
    }

    fn silent(operation: OperationKind) -> PracticeSession<StdRng> {
        build_session(operation, PracticeSettings::default(), Arc::new(SilentFeedback))
    }

    /// Answer the active step exactly as the step expects.
    fn answer_correctly<R: rand::Rng>(session: &mut PracticeSession<R>) -> StepAnswer {
        let step = session.current_step().unwrap().clone();
        let submission = if step.input_slots.sign {
            Submission::sign(step.expected_center.and_then(|e| e.as_sign()).unwrap())
        } else if step.input_slots.left {
            Submission::operands(step.expected_left.unwrap(), step.expected_right.unwrap())
        } else {
            Submission::center(step.expected_center.and_then(|e| e.as_fraction()).unwrap())
        };
        session.submit(&submission).unwrap()
    }

    fn play_round<R: rand::Rng>(session: &mut PracticeSession<R>) {
        session.start_round().unwrap();
        while !answer_correctly(session).round_complete {}
    }

    fn wrong_answer() -> Submission {
        Submission {
            left: Some(Fraction::new(9, 9, 10).unwrap()),
            right: Some(Fraction::new(9, 9, 10).unwrap()),
            center: Some(Fraction::new(9, 9, 10).unwrap()),
            sign: None,
        }
    }

    #[test]
    fn submit_before_start_is_an_error() {
        let mut session = silent(OperationKind::Add);
        let err = session.submit(&Submission::default()).unwrap_err();
        assert!(matches!(err, SessionError::NoActiveRound));
        assert!(session.current_step().is_none());
    }

    #[test]
    fn completed_round_scores_and_blocks_further_answers() {
        let mut session = silent(OperationKind::Add);
        play_round(&mut session);

        assert_eq!(session.score(), 1);
        assert_eq!(session.streak(), 1);
        let progress = session.progress();
        assert!(progress.round_complete);
        assert_eq!(progress.step_index, progress.step_count);
        assert!(session.current_step().is_none());

        let err = session.submit(&Submission::default()).unwrap_err();
        assert!(matches!(err, SessionError::RoundComplete));
    }

    #[test]
    fn incorrect_answer_resets_streak_but_not_score() {
        let mut session = silent(OperationKind::Multiply);
        play_round(&mut session);
        play_round(&mut session);
        assert_eq!(session.streak(), 2);

        session.start_round().unwrap();
        let answer = session.submit(&wrong_answer()).unwrap();
        assert!(!answer.correct);
        assert_eq!(answer.streak, 0);
        assert_eq!(answer.score, 2);
        assert_eq!(session.cursor(), Some(0));
        assert_eq!(session.best_streak(), 2);
    }

    #[test]
    fn cues_follow_the_session() {
        let recorder = RecordingFeedback::new();
        let mut session = build_session(
            OperationKind::ConvertToImproper,
            PracticeSettings::default(),
            Arc::new(recorder.clone()),
        );

        session.start_round().unwrap();
        session.submit(&wrong_answer()).unwrap();
        answer_correctly(&mut session);
        session.start_round().unwrap();

        assert_eq!(
            recorder.cues(),
            vec![Cue::Start, Cue::Incorrect, Cue::Correct, Cue::Click]
        );
    }

    #[test]
    fn difficulty_climbs_with_score() {
        let settings = PracticeSettings::new(1, 2, None, None).unwrap();
        let mut session = build_session(OperationKind::Add, settings, Arc::new(SilentFeedback));

        assert_eq!(session.next_difficulty(), Difficulty::EASY);
        play_round(&mut session);
        assert_eq!(session.next_difficulty(), Difficulty::EASY);
        play_round(&mut session);
        assert_eq!(session.next_difficulty(), Difficulty::MEDIUM);
        play_round(&mut session);
        assert_eq!(session.next_difficulty(), Difficulty::HARD);

        let problem = session.start_round().unwrap();
        assert_eq!(problem.difficulty, Difficulty::HARD);
    }

    #[test]
    fn fixed_difficulty_overrides_score() {
        let settings = PracticeSettings::default().with_fixed_difficulty(Difficulty::HARD);
        let mut session = build_session(OperationKind::Compare, settings, Arc::new(SilentFeedback));
        let problem = session.start_round().unwrap();
        assert_eq!(problem.difficulty, Difficulty::HARD);
        assert!(matches!(problem.expected, Expected::Sign(_)));
    }

    #[test]
    fn improper_answer_inserts_extra_step() {
        let settings = PracticeSettings::default().with_fixed_difficulty(Difficulty::HARD);
        let mut session =
            build_session(OperationKind::ConvertToMixed, settings, Arc::new(SilentFeedback));
        session.start_round().unwrap();

        let target = session.problem().unwrap().expected.as_fraction().unwrap();
        let answer = session.submit(&Submission::center(target.to_improper())).unwrap();

        assert!(answer.correct);
        assert!(!answer.round_complete);
        assert!(answer.remediation.is_some());
        assert_eq!(session.current_step().unwrap().kind, StepKind::ExtractWhole);
        assert_eq!(session.progress().step_count, 2);

        let done = answer_correctly(&mut session);
        assert!(done.round_complete);
        assert_eq!(session.summary().remediations, 1);
    }

    #[test]
    fn wrong_sign_is_rejected() {
        let mut session = silent(OperationKind::Compare);
        session.start_round().unwrap();
        let expected = session.problem().unwrap().expected.as_sign().unwrap();
        let wrong = match expected {
            ComparisonSign::Less => ComparisonSign::Greater,
            _ => ComparisonSign::Less,
        };
        assert!(!session.submit(&Submission::sign(wrong)).unwrap().correct);
        assert!(session.submit(&Submission::sign(expected)).unwrap().round_complete);
    }

    #[test]
    fn round_limit_completes_session() {
        let settings = PracticeSettings::default().with_rounds(2).unwrap();
        let mut session = build_session(OperationKind::Subtract, settings, Arc::new(SilentFeedback));

        play_round(&mut session);
        assert!(!session.is_complete());
        session.clock_mut().advance(Duration::seconds(30));
        play_round(&mut session);
        assert!(session.is_complete());

        let err = session.start_round().unwrap_err();
        assert!(matches!(err, SessionError::SessionComplete { rounds: 2 }));

        let summary = session.summary();
        assert_eq!(summary.rounds_completed, 2);
        assert_eq!(summary.duration_secs(), 30);
        assert_eq!(summary.accuracy(), Some(1.0));
    }

    #[test]
    fn restarting_abandons_the_round_without_penalty() {
        let mut session = silent(OperationKind::Divide);
        session.start_round().unwrap();
        let first = session.problem().unwrap().id;
        session.start_round().unwrap();
        assert_ne!(session.problem().unwrap().id, first);
        assert_eq!(session.cursor(), Some(0));
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn hint_tracks_current_step() {
        let mut session = silent(OperationKind::ConvertToImproper);
        assert!(session.hint().is_none());
        session.start_round().unwrap();
        assert!(!session.hint().unwrap().is_empty());
    }
}
