//! Terminal fraction tutor.
//!
//! Walks the learner through generated problems one step at a time. Type `?`
//! at any prompt for a hint and `q` to stop.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use fraction_core::Clock;
use fraction_core::generator::ProblemGenerator;
use fraction_core::grader::Submission;
use fraction_core::input::FractionEntry;
use fraction_core::model::{
    ComparisonSign, Difficulty, InteractiveStep, OperationKind, PracticeSettings,
};
use services::{Cue, FeedbackSink, PracticeSession, SessionSummary, SilentFeedback};
use tracing_subscriber::EnvFilter;

/// Step-by-step fraction arithmetic practice.
#[derive(Parser, Debug)]
#[command(name = "fraction-tutor")]
#[command(version, about, long_about = None)]
struct Args {
    /// Operation to practise: add, subtract, multiply, divide, convert_mixed,
    /// convert_improper or compare
    #[arg(short, long, env = "FRACTION_OPERATION", default_value = "add")]
    operation: OperationKind,

    /// Pin difficulty (1-3) instead of letting the score raise it
    #[arg(short, long, env = "FRACTION_DIFFICULTY", value_parser = parse_difficulty)]
    difficulty: Option<Difficulty>,

    /// Rounds to play; 0 keeps going until you quit
    #[arg(short, long, env = "FRACTION_ROUNDS", default_value_t = 5)]
    rounds: u32,

    /// Seed for reproducible problems
    #[arg(long, env = "FRACTION_SEED")]
    seed: Option<u64>,

    /// Ring the terminal bell for start, correct and incorrect cues
    #[arg(long)]
    bell: bool,

    /// Print the final summary as JSON
    #[arg(long)]
    summary_json: bool,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,
}

fn parse_difficulty(raw: &str) -> Result<Difficulty, String> {
    let level: u8 = raw
        .trim()
        .parse()
        .map_err(|_| format!("expected 1, 2 or 3, got {raw:?}"))?;
    Difficulty::new(level).map_err(|err| err.to_string())
}

fn main() -> ExitCode {
    let args = Args::parse();

    // RUST_LOG wins, then --verbose, then warnings only so logs stay out of the prompt.
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "tutor failed");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let settings = settings_from(args).context("invalid practice settings")?;
    let feedback: Arc<dyn FeedbackSink> = if args.bell {
        Arc::new(TerminalBell)
    } else {
        Arc::new(SilentFeedback)
    };

    tracing::debug!(operation = %args.operation, seed = ?args.seed, ?settings, "starting session");
    let mut session = match args.seed {
        Some(seed) => PracticeSession::with_generator(
            args.operation,
            settings,
            Clock::System,
            feedback,
            ProblemGenerator::seeded(seed),
        ),
        None => PracticeSession::new(args.operation, settings, Clock::System, feedback),
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut terminal = Terminal::new(stdin.lock(), stdout.lock());

    if play(&mut session, &mut terminal)? == Outcome::Quit {
        tracing::info!("session stopped by learner");
    }
    print_summary(&mut terminal.output, &session.summary(), args.summary_json)
}

fn settings_from(args: &Args) -> Result<PracticeSettings> {
    let mut settings = PracticeSettings::default();
    if let Some(difficulty) = args.difficulty {
        settings = settings.with_fixed_difficulty(difficulty);
    }
    if args.rounds > 0 {
        settings = settings.with_rounds(args.rounds)?;
    }
    Ok(settings)
}

//
// ─── FEEDBACK ──────────────────────────────────────────────────────────────────
//

/// Rings the terminal bell. A bell has no pitch, so every cue but the click
/// sounds the same.
#[derive(Debug, Clone, Copy, Default)]
struct TerminalBell;

impl FeedbackSink for TerminalBell {
    fn play(&self, cue: Cue) {
        if cue == Cue::Click {
            return;
        }
        tracing::trace!(%cue, tones = cue.tones().len(), "bell");
        let mut stderr = io::stderr().lock();
        let _ = stderr.write_all(b"\x07");
        let _ = stderr.flush();
    }
}

//
// ─── TERMINAL LOOP ─────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Finished,
    Quit,
}

enum Line {
    Text(String),
    Hint,
    Quit,
}

struct Terminal<I, O> {
    input: I,
    output: O,
}

impl<I: BufRead, O: Write> Terminal<I, O> {
    fn new(input: I, output: O) -> Self {
        Self { input, output }
    }

    fn prompt(&mut self, label: &str) -> Result<Line> {
        write!(self.output, "  {label}> ")?;
        self.output.flush()?;

        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(Line::Quit);
        }
        Ok(match buf.trim() {
            "q" | "quit" => Line::Quit,
            "?" | "hint" => Line::Hint,
            text => Line::Text(text.to_owned()),
        })
    }

    /// Prompt until the learner types an answer. `None` means quit.
    fn ask(&mut self, label: &str, hint: &str) -> Result<Option<String>> {
        loop {
            match self.prompt(label)? {
                Line::Text(text) => return Ok(Some(text)),
                Line::Hint => writeln!(self.output, "  hint: {hint}")?,
                Line::Quit => return Ok(None),
            }
        }
    }
}

fn play<I: BufRead, O: Write>(
    session: &mut PracticeSession,
    terminal: &mut Terminal<I, O>,
) -> Result<Outcome> {
    while !session.is_complete() {
        let problem = session.start_round()?;
        writeln!(
            terminal.output,
            "\nProblem: {problem}   (difficulty {})",
            problem.difficulty.level()
        )?;

        loop {
            let Some(step) = session.current_step().cloned() else {
                break;
            };
            let progress = session.progress();
            writeln!(
                terminal.output,
                "Step {}/{}: {}",
                progress.step_index + 1,
                progress.step_count,
                step.title
            )?;

            let Some(submission) = read_submission(terminal, &step)? else {
                return Ok(Outcome::Quit);
            };
            let answer = session.submit(&submission)?;

            if !answer.correct {
                writeln!(terminal.output, "  Not quite. Try again (? for a hint).")?;
                continue;
            }
            writeln!(terminal.output, "  Correct!")?;
            if let Some(remediation) = answer.remediation {
                writeln!(
                    terminal.output,
                    "  {} is right. One more step: write it as a mixed number.",
                    remediation.entered
                )?;
            }
            if answer.round_complete {
                writeln!(
                    terminal.output,
                    "Round complete. Score {}, streak {}.",
                    answer.score, answer.streak
                )?;
            }
        }
    }
    Ok(Outcome::Finished)
}

fn read_submission<I: BufRead, O: Write>(
    terminal: &mut Terminal<I, O>,
    step: &InteractiveStep,
) -> Result<Option<Submission>> {
    let slots = step.input_slots;
    let mut submission = Submission::default();

    if slots.left {
        let Some(text) = terminal.ask("left", &step.hint)? else {
            return Ok(None);
        };
        submission.left = Some(FractionEntry::parse(&text).to_fraction());
    }
    if slots.right {
        let label = format!("{} right", step.symbol);
        let Some(text) = terminal.ask(&label, &step.hint)? else {
            return Ok(None);
        };
        submission.right = Some(FractionEntry::parse(&text).to_fraction());
    }
    if slots.center {
        let label = format!("{} answer", step.symbol);
        let Some(text) = terminal.ask(&label, &step.hint)? else {
            return Ok(None);
        };
        submission.center = Some(FractionEntry::parse(&text).to_fraction());
    }
    if slots.sign {
        let Some(text) = terminal.ask("sign (<, =, >)", &step.hint)? else {
            return Ok(None);
        };
        submission.sign = text.parse::<ComparisonSign>().ok();
    }
    Ok(Some(submission))
}

fn print_summary(out: &mut impl Write, summary: &SessionSummary, json: bool) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(summary)?)?;
        return Ok(());
    }

    writeln!(out, "\n── Session summary ──")?;
    writeln!(out, "Operation:   {}", summary.operation)?;
    writeln!(out, "Rounds:      {}", summary.rounds_completed)?;
    writeln!(out, "Score:       {}", summary.score)?;
    writeln!(out, "Best streak: {}", summary.best_streak)?;
    if let Some(accuracy) = summary.accuracy() {
        writeln!(out, "Accuracy:    {:.0}%", accuracy * 100.0)?;
    }
    writeln!(out, "Time:        {}s", summary.duration_secs())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fraction_core::time::fixed_clock;
    use std::io::Cursor;

    fn session(operation: OperationKind, seed: u64) -> PracticeSession {
        let settings = PracticeSettings::default().with_rounds(1).unwrap();
        PracticeSession::with_generator(
            operation,
            settings,
            fixed_clock(),
            Arc::new(SilentFeedback),
            ProblemGenerator::seeded(seed),
        )
    }

    fn run_script(session: &mut PracticeSession, script: &str) -> (Outcome, String) {
        let mut terminal = Terminal::new(Cursor::new(script.to_owned()), Vec::new());
        let outcome = play(session, &mut terminal).unwrap();
        (outcome, String::from_utf8(terminal.output).unwrap())
    }

    #[test]
    fn args_parse_with_defaults() {
        let args = Args::try_parse_from(["fraction-tutor"]).unwrap();
        assert_eq!(args.operation, OperationKind::Add);
        assert_eq!(args.rounds, 5);
        assert!(args.difficulty.is_none());
    }

    #[test]
    fn args_accept_operation_and_difficulty() {
        let args = Args::try_parse_from([
            "fraction-tutor",
            "--operation",
            "convert_mixed",
            "--difficulty",
            "3",
            "--rounds",
            "0",
        ])
        .unwrap();
        assert_eq!(args.operation, OperationKind::ConvertToMixed);
        assert_eq!(args.difficulty, Some(Difficulty::HARD));

        let settings = settings_from(&args).unwrap();
        assert_eq!(settings.rounds_per_session(), None);
        assert_eq!(settings.fixed_difficulty(), Some(Difficulty::HARD));
    }

    #[test]
    fn args_reject_bad_difficulty() {
        assert!(Args::try_parse_from(["fraction-tutor", "-d", "4"]).is_err());
    }

    #[test]
    fn quitting_stops_the_loop() {
        let mut session = session(OperationKind::Add, 1);
        let (outcome, output) = run_script(&mut session, "?\nq\n");
        assert_eq!(outcome, Outcome::Quit);
        assert!(output.contains("Problem:"));
        assert!(output.contains("hint:"));
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn end_of_input_counts_as_quit() {
        let mut session = session(OperationKind::Compare, 2);
        let (outcome, _) = run_script(&mut session, "");
        assert_eq!(outcome, Outcome::Quit);
    }

    #[test]
    fn scripted_round_completes() {
        let problem =
            ProblemGenerator::seeded(9).generate(OperationKind::ConvertToImproper, Difficulty::EASY);
        let expected = problem.expected.as_fraction().unwrap();
        let script = format!("1/1\n{expected}\n");

        let mut session = session(OperationKind::ConvertToImproper, 9);
        let (outcome, output) = run_script(&mut session, &script);
        assert_eq!(outcome, Outcome::Finished);
        assert!(output.contains("Not quite"));
        assert!(output.contains("Round complete. Score 1, streak 1."));
        assert!(session.is_complete());
    }

    #[test]
    fn summary_prints_as_json() {
        let session = session(OperationKind::Add, 3);
        let mut out = Vec::new();
        print_summary(&mut out, &session.summary(), true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["operation"], "add");
        assert_eq!(value["rounds_completed"], 0);
    }
}
