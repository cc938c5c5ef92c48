//! Voice leading analysis between four-voice voicings
//!
//! Voices are matched by position (bass to bass, tenor to tenor, ...). For each
//! transition this module reports how far every voice moves, in which
//! direction, which voices hold a common tone, and the total movement with a
//! qualitative band. A song summary averages the transitions.

use crate::types::note::{pitch_to_note_name, Pitch};
use crate::types::voicing::{Song, Voice, Voicing};
#[cfg(feature = "colored")]
use colored::*;
use std::fmt;

/// Which way a voice moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Up,
    Down,
    Same,
}

impl Direction {
    pub fn arrow(self) -> &'static str {
        match self {
            Direction::Up => "↑",
            Direction::Down => "↓",
            Direction::Same => "=",
        }
    }
}

/// Per-voice display tier, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VoiceTier {
    /// Common tone
    Hold,
    /// Up to a whole step
    Step,
    /// Up to a major third
    Skip,
    /// Anything wider
    Leap,
}

impl VoiceTier {
    pub fn classify(distance: u32, is_common_tone: bool) -> VoiceTier {
        if is_common_tone {
            VoiceTier::Hold
        } else if distance <= 2 {
            VoiceTier::Step
        } else if distance <= 4 {
            VoiceTier::Skip
        } else {
            VoiceTier::Leap
        }
    }
}

/// Qualitative rating of total movement across all four voices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovementBand {
    Excellent,
    Good,
    Fair,
    NeedsWork,
}

impl MovementBand {
    /// <=4 Excellent, <=8 Good, <=12 Fair, otherwise Needs work
    pub fn from_total(total: u32) -> MovementBand {
        Self::from_movement(total as f64)
    }

    /// Same thresholds for a fractional movement (e.g. a song average)
    pub fn from_movement(movement: f64) -> MovementBand {
        if movement <= 4.0 {
            MovementBand::Excellent
        } else if movement <= 8.0 {
            MovementBand::Good
        } else if movement <= 12.0 {
            MovementBand::Fair
        } else {
            MovementBand::NeedsWork
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MovementBand::Excellent => "Excellent",
            MovementBand::Good => "Good",
            MovementBand::Fair => "Fair",
            MovementBand::NeedsWork => "Needs work",
        }
    }
}

impl fmt::Display for MovementBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Unsigned semitone distance between two pitches
pub fn movement_distance(from: Pitch, to: Pitch) -> u32 {
    (to - from).unsigned_abs()
}

/// A voice that keeps its exact pitch
pub fn is_common_tone(from: Pitch, to: Pitch) -> bool {
    from == to
}

pub fn direction(from: Pitch, to: Pitch) -> Direction {
    match to.cmp(&from) {
        std::cmp::Ordering::Greater => Direction::Up,
        std::cmp::Ordering::Less => Direction::Down,
        std::cmp::Ordering::Equal => Direction::Same,
    }
}

/// Movement of a single voice from one voicing to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VoiceMovement {
    pub voice: Voice,
    pub from: Pitch,
    pub to: Pitch,
    pub distance: u32,
    pub direction: Direction,
    pub is_common_tone: bool,
}

impl VoiceMovement {
    pub fn between(voice: Voice, from: Pitch, to: Pitch) -> Self {
        VoiceMovement {
            voice,
            from,
            to,
            distance: movement_distance(from, to),
            direction: direction(from, to),
            is_common_tone: is_common_tone(from, to),
        }
    }

    pub fn tier(&self) -> VoiceTier {
        VoiceTier::classify(self.distance, self.is_common_tone)
    }

    /// Signed semitones (positive = up)
    pub fn semitones(&self) -> i32 {
        self.to - self.from
    }
}

/// Two voices moving in the same direction into the same perfect interval
/// they already formed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParallelMotion {
    Fifths { lower: Voice, upper: Voice },
    Octaves { lower: Voice, upper: Voice },
}

impl fmt::Display for ParallelMotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParallelMotion::Fifths { lower, upper } => {
                write!(f, "parallel 5ths ({}/{})", lower, upper)
            }
            ParallelMotion::Octaves { lower, upper } => {
                write!(f, "parallel 8ves ({}/{})", lower, upper)
            }
        }
    }
}

/// Voice leading report for one pair of adjacent voicings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionAnalysis {
    pub movements: Vec<VoiceMovement>,
    pub total_movement: u32,
}

impl TransitionAnalysis {
    /// Number of voices that hold their pitch
    pub fn common_tone_count(&self) -> usize {
        self.movements.iter().filter(|m| m.is_common_tone).count()
    }

    pub fn band(&self) -> MovementBand {
        MovementBand::from_total(self.total_movement)
    }

    pub fn distances(&self) -> Vec<u32> {
        self.movements.iter().map(|m| m.distance).collect()
    }

    pub fn movement(&self, voice: Voice) -> &VoiceMovement {
        &self.movements[voice.index()]
    }

    /// Parallel fifths and octaves between any two moving voices.
    /// Informational only; it does not change the band.
    pub fn parallel_perfects(&self) -> Vec<ParallelMotion> {
        let mut found = Vec::new();

        for (i, lower) in self.movements.iter().enumerate() {
            for upper in &self.movements[i + 1..] {
                if lower.direction == Direction::Same || lower.direction != upper.direction {
                    continue;
                }

                let before = (upper.from - lower.from).rem_euclid(12);
                let after = (upper.to - lower.to).rem_euclid(12);
                if before != after {
                    continue;
                }

                match after {
                    7 => found.push(ParallelMotion::Fifths {
                        lower: lower.voice,
                        upper: upper.voice,
                    }),
                    0 => found.push(ParallelMotion::Octaves {
                        lower: lower.voice,
                        upper: upper.voice,
                    }),
                    _ => {}
                }
            }
        }

        found
    }
}

/// Analyze the movement from `prev` to `curr`, voice by voice
pub fn analyze_transition(prev: &Voicing, curr: &Voicing) -> TransitionAnalysis {
    let movements: Vec<VoiceMovement> = Voice::ALL
        .iter()
        .map(|&voice| VoiceMovement::between(voice, prev.pitch(voice), curr.pitch(voice)))
        .collect();

    let total_movement = movements.iter().map(|m| m.distance).sum();

    TransitionAnalysis {
        movements,
        total_movement,
    }
}

/// Analyze every adjacent pair in a sequence of voicings
pub fn analyze_voicings(voicings: &[Voicing]) -> Vec<TransitionAnalysis> {
    voicings
        .windows(2)
        .map(|pair| analyze_transition(&pair[0], &pair[1]))
        .collect()
}

/// Voice leading across a whole song
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SongAnalysis {
    pub transitions: Vec<TransitionAnalysis>,
    /// Mean of the per-transition totals (0 with no transitions)
    pub mean_total_movement: f64,
    pub common_tones: usize,
    /// `4 * transitions.len()`
    pub voice_movements: usize,
}

impl SongAnalysis {
    pub fn band(&self) -> MovementBand {
        MovementBand::from_movement(self.mean_total_movement)
    }

    /// Fraction of voice movements that were common tones
    pub fn common_tone_ratio(&self) -> f64 {
        if self.voice_movements == 0 {
            return 0.0;
        }
        self.common_tones as f64 / self.voice_movements as f64
    }
}

/// One report per adjacent voicing pair plus the song summary
pub fn analyze_song(song: &Song) -> SongAnalysis {
    let transitions = analyze_voicings(song.voicings());

    let mean_total_movement = if transitions.is_empty() {
        0.0
    } else {
        let sum: u32 = transitions.iter().map(|t| t.total_movement).sum();
        sum as f64 / transitions.len() as f64
    };

    let common_tones = transitions.iter().map(|t| t.common_tone_count()).sum();
    let voice_movements = transitions.len() * Voice::ALL.len();

    SongAnalysis {
        transitions,
        mean_total_movement,
        common_tones,
        voice_movements,
    }
}

#[cfg(feature = "colored")]
fn paint(text: String, tier: VoiceTier) -> String {
    match tier {
        VoiceTier::Hold => text.bright_blue().to_string(),
        VoiceTier::Step => text.green().to_string(),
        VoiceTier::Skip => text.yellow().to_string(),
        VoiceTier::Leap => text.red().to_string(),
    }
}

#[cfg(not(feature = "colored"))]
fn paint(text: String, _tier: VoiceTier) -> String {
    text
}

impl fmt::Display for VoiceMovement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let from = pitch_to_note_name(self.from);
        let to = pitch_to_note_name(self.to);

        let text = if self.is_common_tone {
            format!("{}={}", from, to)
        } else {
            format!("{}→{}({:+})", from, to, self.semitones())
        };

        write!(f, "{}: {}", self.voice, paint(text, self.tier()))
    }
}

impl fmt::Display for TransitionAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let movements: Vec<String> = self.movements.iter().map(|m| m.to_string()).collect();
        write!(
            f,
            "{} [Total: {}, Common: {}, {}]",
            movements.join(", "),
            self.total_movement,
            self.common_tone_count(),
            self.band()
        )?;

        let parallels = self.parallel_perfects();
        if !parallels.is_empty() {
            let names: Vec<String> = parallels.iter().map(|p| p.to_string()).collect();
            write!(f, " ⚠ {}", names.join(", "))?;
        }

        Ok(())
    }
}

impl fmt::Display for SongAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Average movement {:.1} ({}), common tones {}/{}",
            self.mean_total_movement,
            self.band(),
            self.common_tones,
            self.voice_movements
        )
    }
}
