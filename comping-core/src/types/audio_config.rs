//! Playback configuration types
//!
//! Pure data with no timing or device logic, so the same values drive the
//! native playback thread and a browser front end.

use anyhow::{bail, Result};
use num_rational::Ratio;
use num_traits::{ToPrimitive, Zero};

/// Exact musical length in beats (quarter notes)
pub type Beats = Ratio<i64>;

pub const DEFAULT_BPM: f32 = 90.0;
pub const MIN_BPM: f32 = 1.0;
pub const MAX_BPM: f32 = 400.0;

/// Relative note length handed to the synthesizer as a duration token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoteValue {
    Whole,
    #[default]
    Half,
    Quarter,
    Eighth,
    Sixteenth,
}

impl NoteValue {
    /// Token understood by the synthesizer (`"1n"`, `"2n"`, `"4n"`, ...)
    pub fn token(self) -> &'static str {
        match self {
            NoteValue::Whole => "1n",
            NoteValue::Half => "2n",
            NoteValue::Quarter => "4n",
            NoteValue::Eighth => "8n",
            NoteValue::Sixteenth => "16n",
        }
    }

    pub fn from_token(token: &str) -> Option<NoteValue> {
        match token.trim() {
            "1n" | "whole" => Some(NoteValue::Whole),
            "2n" | "half" => Some(NoteValue::Half),
            "4n" | "quarter" => Some(NoteValue::Quarter),
            "8n" | "eighth" => Some(NoteValue::Eighth),
            "16n" | "sixteenth" => Some(NoteValue::Sixteenth),
            _ => None,
        }
    }

    pub fn beats(self) -> Beats {
        match self {
            NoteValue::Whole => Ratio::from_integer(4),
            NoteValue::Half => Ratio::from_integer(2),
            NoteValue::Quarter => Ratio::from_integer(1),
            NoteValue::Eighth => Ratio::new(1, 2),
            NoteValue::Sixteenth => Ratio::new(1, 4),
        }
    }

    /// Length in milliseconds at `bpm`
    pub fn millis(self, bpm: f32) -> u64 {
        beats_to_millis(self.beats(), bpm)
    }
}

/// Convert a beat count to milliseconds at `bpm`
pub fn beats_to_millis(beats: Beats, bpm: f32) -> u64 {
    let beats = beats.to_f64().unwrap_or(0.0);
    ((beats * 60000.0) / bpm as f64).round().max(0.0) as u64
}

/// How a chord sequence is played back
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaybackConfig {
    /// Tempo in beats per minute
    pub bpm: f32,
    /// How long each chord sounds
    pub chord_value: NoteValue,
    /// Silence between chords
    pub gap: Beats,
    /// How many times the sequence is played
    pub repeats: usize,
}

impl PlaybackConfig {
    pub fn new() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            chord_value: NoteValue::default(),
            gap: Beats::zero(),
            repeats: 1,
        }
    }

    /// Set the tempo; must be within 1-400 BPM
    pub fn with_tempo(mut self, bpm: f32) -> Result<Self> {
        if !(MIN_BPM..=MAX_BPM).contains(&bpm) {
            bail!("Invalid tempo {}. Use a value between 1-400 BPM", bpm);
        }
        self.bpm = bpm;
        Ok(self)
    }

    pub fn with_chord_value(mut self, value: NoteValue) -> Self {
        self.chord_value = value;
        self
    }

    pub fn with_gap(mut self, gap: Beats) -> Self {
        self.gap = if gap < Beats::zero() { Beats::zero() } else { gap };
        self
    }

    pub fn with_repeats(mut self, repeats: usize) -> Self {
        self.repeats = repeats.max(1);
        self
    }

    /// Fixed delay between the starts of consecutive chords
    pub fn step_millis(&self) -> u64 {
        beats_to_millis(self.chord_value.beats() + self.gap, self.bpm)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_value_tokens() {
        assert_eq!(NoteValue::Half.token(), "2n");
        assert_eq!(NoteValue::from_token("8n"), Some(NoteValue::Eighth));
        assert_eq!(NoteValue::from_token("quarter"), Some(NoteValue::Quarter));
        assert_eq!(NoteValue::from_token("3n"), None);
    }

    #[test]
    fn test_duration_conversion() {
        // 1 beat at 120 BPM = 500ms
        assert_eq!(NoteValue::Quarter.millis(120.0), 500);
        assert_eq!(NoteValue::Whole.millis(120.0), 2000);
        assert_eq!(NoteValue::Eighth.millis(60.0), 500);
    }

    #[test]
    fn test_step_includes_gap() {
        let config = PlaybackConfig::new()
            .with_tempo(120.0)
            .unwrap()
            .with_chord_value(NoteValue::Quarter)
            .with_gap(Ratio::new(1, 2));
        assert_eq!(config.step_millis(), 750);
    }

    #[test]
    fn test_tempo_validation() {
        assert!(PlaybackConfig::new().with_tempo(0.0).is_err());
        assert!(PlaybackConfig::new().with_tempo(401.0).is_err());
        assert_eq!(PlaybackConfig::new().with_tempo(200.0).unwrap().bpm, 200.0);
    }

    #[test]
    fn test_defaults() {
        let config = PlaybackConfig::default();
        assert_eq!(config.bpm, DEFAULT_BPM);
        assert_eq!(config.chord_value, NoteValue::Half);
        assert_eq!(config.repeats, 1);
        assert!(config.gap.is_zero());
    }
}
