use std::fmt;

/// A named distance in semitones, from unison to octave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Interval {
    pub name: &'static str,
    pub semitones: i32,
}

/// The 13 intervals drilled by the ear-training quiz, in order
pub const INTERVALS: [Interval; 13] = [
    Interval::new("Perfect Unison", 0),
    Interval::new("Minor 2nd", 1),
    Interval::new("Major 2nd", 2),
    Interval::new("Minor 3rd", 3),
    Interval::new("Major 3rd", 4),
    Interval::new("Perfect 4th", 5),
    Interval::new("Tritone", 6),
    Interval::new("Perfect 5th", 7),
    Interval::new("Minor 6th", 8),
    Interval::new("Major 6th", 9),
    Interval::new("Minor 7th", 10),
    Interval::new("Major 7th", 11),
    Interval::new("Octave", 12),
];

impl Interval {
    pub const fn new(name: &'static str, semitones: i32) -> Self {
        Interval { name, semitones }
    }

    /// Interval spanning exactly `semitones` (0-12)
    pub fn from_semitones(semitones: i32) -> Option<Interval> {
        INTERVALS.iter().copied().find(|i| i.semitones == semitones)
    }

    pub fn from_name(name: &str) -> Option<Interval> {
        INTERVALS
            .iter()
            .copied()
            .find(|i| i.name.eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
