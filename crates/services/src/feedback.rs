//! Audio feedback cues.
//!
//! The session decides *when* a cue fires; a [`FeedbackSink`] decides what, if
//! anything, the learner hears. Playback is fire-and-forget and never fails.

use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// Neutral tick when moving on to a new problem.
    Click,
    Correct,
    Incorrect,
    /// Played once when the first round of a session starts.
    Start,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
}

/// One oscillator note of a cue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tone {
    pub frequency_hz: f32,
    pub waveform: Waveform,
    pub duration_secs: f32,
    /// Delay from the start of the cue.
    pub offset_secs: f32,
    pub volume: f32,
}

const fn tone(
    frequency_hz: f32,
    waveform: Waveform,
    duration_secs: f32,
    offset_secs: f32,
    volume: f32,
) -> Tone {
    Tone {
        frequency_hz,
        waveform,
        duration_secs,
        offset_secs,
        volume,
    }
}

const CLICK: [Tone; 1] = [tone(800.0, Waveform::Sine, 0.05, 0.0, 0.05)];

// C major arpeggio.
const CORRECT: [Tone; 3] = [
    tone(523.25, Waveform::Sine, 0.15, 0.0, 0.1),
    tone(659.25, Waveform::Sine, 0.15, 0.1, 0.1),
    tone(783.99, Waveform::Sine, 0.3, 0.2, 0.1),
];

const INCORRECT: [Tone; 2] = [
    tone(200.0, Waveform::Sawtooth, 0.2, 0.0, 0.08),
    tone(150.0, Waveform::Sawtooth, 0.4, 0.15, 0.08),
];

// A major arpeggio.
const START: [Tone; 3] = [
    tone(440.0, Waveform::Triangle, 0.1, 0.0, 0.1),
    tone(554.37, Waveform::Triangle, 0.1, 0.1, 0.1),
    tone(659.25, Waveform::Triangle, 0.4, 0.2, 0.1),
];

impl Cue {
    /// Notes that make up this cue, in start order.
    #[must_use]
    pub fn tones(self) -> &'static [Tone] {
        match self {
            Cue::Click => &CLICK,
            Cue::Correct => &CORRECT,
            Cue::Incorrect => &INCORRECT,
            Cue::Start => &START,
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Cue::Click => "click",
            Cue::Correct => "correct",
            Cue::Incorrect => "incorrect",
            Cue::Start => "start",
        };
        f.write_str(name)
    }
}

//
// ─── SINKS ─────────────────────────────────────────────────────────────────────
//

/// Receives cues from a practice session.
pub trait FeedbackSink: Send + Sync {
    fn play(&self, cue: Cue);
}

/// Plays nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentFeedback;

impl FeedbackSink for SilentFeedback {
    fn play(&self, _cue: Cue) {}
}

/// Remembers every cue it was asked to play.
#[derive(Debug, Clone, Default)]
pub struct RecordingFeedback {
    cues: Arc<Mutex<Vec<Cue>>>,
}

impl RecordingFeedback {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cues played so far, oldest first.
    #[must_use]
    pub fn cues(&self) -> Vec<Cue> {
        self.cues.lock().map(|cues| cues.clone()).unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut cues) = self.cues.lock() {
            cues.clear();
        }
    }
}

impl FeedbackSink for RecordingFeedback {
    fn play(&self, cue: Cue) {
        if let Ok(mut cues) = self.cues.lock() {
            cues.push(cue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_cue_is_a_rising_arpeggio() {
        let tones = Cue::Correct.tones();
        assert_eq!(tones.len(), 3);
        assert!(tones.windows(2).all(|w| w[0].frequency_hz < w[1].frequency_hz));
        assert!(tones.iter().all(|t| t.waveform == Waveform::Sine));
    }

    #[test]
    fn incorrect_cue_falls() {
        let tones = Cue::Incorrect.tones();
        assert_eq!(tones[0].frequency_hz, 200.0);
        assert_eq!(tones[1].frequency_hz, 150.0);
        assert_eq!(tones[1].offset_secs, 0.15);
        assert!(tones.iter().all(|t| t.waveform == Waveform::Sawtooth));
    }

    #[test]
    fn click_is_short() {
        assert_eq!(Cue::Click.tones().len(), 1);
        assert_eq!(Cue::Click.tones()[0].duration_secs, 0.05);
    }

    #[test]
    fn recording_sink_keeps_order_across_clones() {
        let sink = RecordingFeedback::new();
        let shared = sink.clone();
        shared.play(Cue::Start);
        shared.play(Cue::Incorrect);
        assert_eq!(sink.cues(), vec![Cue::Start, Cue::Incorrect]);
        sink.clear();
        assert!(shared.cues().is_empty());
    }
}
