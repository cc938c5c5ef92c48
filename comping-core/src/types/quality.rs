//! Chord qualities and their interval tables
//!
//! Every recognized quality maps to an ascending list of semitone offsets from
//! the root. Suffixes that are not recognized are kept as
//! [`ChordQuality::Unrecognized`] and voiced with the major triad.

use std::fmt;

const MAJ: &[i32] = &[0, 4, 7];

/// The intervallic flavor of a chord, independent of its root
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChordQuality {
    Maj,
    Min,
    Dim,
    Aug,
    Sus2,
    Sus4,
    Maj6,
    Min6,
    Dom7,
    Maj7,
    Min7,
    MinMaj7,
    Min7b5,
    Dim7,
    Dom9,
    Maj9,
    Min9,
    /// Suffix text that is not in the table
    Unrecognized(String),
}

/// Qualities drilled by the chord ear-training quiz
pub const PRACTICE_QUALITIES: [ChordQuality; 5] = [
    ChordQuality::Maj7,
    ChordQuality::Min7,
    ChordQuality::Dom7,
    ChordQuality::Min7b5,
    ChordQuality::Dim7,
];

impl ChordQuality {
    /// Resolve a chord-symbol suffix. An empty suffix is a major triad.
    pub fn from_suffix(suffix: &str) -> ChordQuality {
        match suffix {
            "" | "maj" | "M" => ChordQuality::Maj,
            "min" | "m" | "-" => ChordQuality::Min,
            "dim" | "°" => ChordQuality::Dim,
            "aug" | "+" => ChordQuality::Aug,
            "sus2" => ChordQuality::Sus2,
            "sus4" | "sus" => ChordQuality::Sus4,
            "6" | "maj6" => ChordQuality::Maj6,
            "min6" | "m6" | "-6" => ChordQuality::Min6,
            "7" | "dom7" => ChordQuality::Dom7,
            "maj7" | "M7" | "ma7" | "Δ" | "Δ7" => ChordQuality::Maj7,
            "min7" | "m7" | "-7" => ChordQuality::Min7,
            "minMaj7" | "mM7" | "-Δ7" => ChordQuality::MinMaj7,
            "min7b5" | "m7b5" | "-7b5" | "ø" | "ø7" => ChordQuality::Min7b5,
            "dim7" | "°7" => ChordQuality::Dim7,
            "9" => ChordQuality::Dom9,
            "maj9" | "M9" => ChordQuality::Maj9,
            "min9" | "m9" | "-9" => ChordQuality::Min9,
            other => ChordQuality::Unrecognized(other.to_string()),
        }
    }

    /// Semitone offsets from the root. Unrecognized qualities fall back to
    /// the major triad.
    pub fn intervals(&self) -> &'static [i32] {
        match self {
            ChordQuality::Maj => MAJ,
            ChordQuality::Min => &[0, 3, 7],
            ChordQuality::Dim => &[0, 3, 6],
            ChordQuality::Aug => &[0, 4, 8],
            ChordQuality::Sus2 => &[0, 2, 7],
            ChordQuality::Sus4 => &[0, 5, 7],
            ChordQuality::Maj6 => &[0, 4, 7, 9],
            ChordQuality::Min6 => &[0, 3, 7, 9],
            ChordQuality::Dom7 => &[0, 4, 7, 10],
            ChordQuality::Maj7 => &[0, 4, 7, 11],
            ChordQuality::Min7 => &[0, 3, 7, 10],
            ChordQuality::MinMaj7 => &[0, 3, 7, 11],
            ChordQuality::Min7b5 => &[0, 3, 6, 10],
            ChordQuality::Dim7 => &[0, 3, 6, 9],
            ChordQuality::Dom9 => &[0, 4, 7, 10, 14],
            ChordQuality::Maj9 => &[0, 4, 7, 11, 14],
            ChordQuality::Min9 => &[0, 3, 7, 10, 14],
            ChordQuality::Unrecognized(_) => MAJ,
        }
    }

    /// Canonical identifier (`maj7`, `min7b5`, ...). Unrecognized qualities
    /// return their original text.
    pub fn identifier(&self) -> &str {
        match self {
            ChordQuality::Maj => "maj",
            ChordQuality::Min => "min",
            ChordQuality::Dim => "dim",
            ChordQuality::Aug => "aug",
            ChordQuality::Sus2 => "sus2",
            ChordQuality::Sus4 => "sus4",
            ChordQuality::Maj6 => "6",
            ChordQuality::Min6 => "min6",
            ChordQuality::Dom7 => "7",
            ChordQuality::Maj7 => "maj7",
            ChordQuality::Min7 => "min7",
            ChordQuality::MinMaj7 => "minMaj7",
            ChordQuality::Min7b5 => "min7b5",
            ChordQuality::Dim7 => "dim7",
            ChordQuality::Dom9 => "9",
            ChordQuality::Maj9 => "maj9",
            ChordQuality::Min9 => "min9",
            ChordQuality::Unrecognized(text) => text,
        }
    }

    /// Human-readable name for quiz feedback
    pub fn description(&self) -> &str {
        match self {
            ChordQuality::Maj => "major triad",
            ChordQuality::Min => "minor triad",
            ChordQuality::Dim => "diminished triad",
            ChordQuality::Aug => "augmented triad",
            ChordQuality::Sus2 => "suspended 2nd",
            ChordQuality::Sus4 => "suspended 4th",
            ChordQuality::Maj6 => "major 6th",
            ChordQuality::Min6 => "minor 6th",
            ChordQuality::Dom7 => "dominant 7th",
            ChordQuality::Maj7 => "major 7th",
            ChordQuality::Min7 => "minor 7th",
            ChordQuality::MinMaj7 => "minor-major 7th",
            ChordQuality::Min7b5 => "half-diminished",
            ChordQuality::Dim7 => "diminished 7th",
            ChordQuality::Dom9 => "dominant 9th",
            ChordQuality::Maj9 => "major 9th",
            ChordQuality::Min9 => "minor 9th",
            ChordQuality::Unrecognized(_) => "unrecognized (voiced as major)",
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, ChordQuality::Unrecognized(_))
    }
}

impl fmt::Display for ChordQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_lookup() {
        assert_eq!(ChordQuality::from_suffix(""), ChordQuality::Maj);
        assert_eq!(ChordQuality::from_suffix("maj7"), ChordQuality::Maj7);
        assert_eq!(ChordQuality::from_suffix("7"), ChordQuality::Dom7);
        assert_eq!(ChordQuality::from_suffix("m7"), ChordQuality::Min7);
        assert_eq!(ChordQuality::from_suffix("ø7"), ChordQuality::Min7b5);
    }

    #[test]
    fn test_unrecognized_falls_back_to_major() {
        let typo = ChordQuality::from_suffix("mja7");
        assert!(!typo.is_recognized());
        assert_eq!(typo.intervals(), ChordQuality::Maj.intervals());
        assert_eq!(typo.identifier(), "mja7");
    }

    #[test]
    fn test_interval_tables_are_ascending() {
        for suffix in [
            "", "min", "dim", "aug", "sus2", "sus4", "6", "min6", "7", "maj7", "min7",
            "minMaj7", "min7b5", "dim7", "9", "maj9", "min9",
        ] {
            let quality = ChordQuality::from_suffix(suffix);
            let intervals = quality.intervals();
            assert_eq!(intervals[0], 0, "{} must start on the root", quality);
            assert!(
                intervals.windows(2).all(|w| w[0] < w[1]),
                "{} is not ascending",
                quality
            );
        }
    }

    #[test]
    fn test_identifier_round_trip() {
        for quality in PRACTICE_QUALITIES.iter() {
            assert_eq!(&ChordQuality::from_suffix(quality.identifier()), quality);
        }
    }
}
