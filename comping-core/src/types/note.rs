use anyhow::{anyhow, Result};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A MIDI-style semitone index (middle C = 60)
pub type Pitch = i32;

/// Octave used when a chord or question needs concrete pitches (C4 = 60)
pub const REFERENCE_OCTAVE: i32 = 4;

/// Canonical note names, indexed by pitch class
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

const FLAT_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// One of the 12 chromatic pitch classes
/// 0=C, 1=C#, 2=D, 3=D#, 4=E, 5=F, 6=F#, 7=G, 8=G#, 9=A, 10=A#, 11=B
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoteName {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl NoteName {
    pub const ALL: [NoteName; 12] = [
        NoteName::C,
        NoteName::CSharp,
        NoteName::D,
        NoteName::DSharp,
        NoteName::E,
        NoteName::F,
        NoteName::FSharp,
        NoteName::G,
        NoteName::GSharp,
        NoteName::A,
        NoteName::ASharp,
        NoteName::B,
    ];

    /// Note for a pitch class; values outside 0-11 wrap around
    pub fn from_pitch_class(pitch_class: u8) -> NoteName {
        Self::ALL[(pitch_class % 12) as usize]
    }

    /// Get the chromatic pitch class (0-11)
    pub fn pitch_class(self) -> u8 {
        self as u8
    }

    /// Canonical (sharp) name
    pub fn name(self) -> &'static str {
        NOTE_NAMES[self.pitch_class() as usize]
    }

    /// Flat name for black keys, natural name otherwise
    pub fn flat_name(self) -> &'static str {
        FLAT_NAMES[self.pitch_class() as usize]
    }

    /// Check if this is a natural note (white key)
    pub fn is_natural(self) -> bool {
        matches!(self.pitch_class(), 0 | 2 | 4 | 5 | 7 | 9 | 11)
    }

    /// Strict lookup in the canonical sharp table. Flat spellings are not keys.
    pub fn from_canonical(name: &str) -> Option<NoteName> {
        NOTE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|pc| Self::from_pitch_class(pc as u8))
    }

    /// Lenient lookup: canonical names, flats, and the enharmonic naturals
    /// (Cb, Fb, E#, B#). Returns the spelling the name was written in.
    pub fn from_spelling(name: &str) -> Option<(NoteName, Spelling)> {
        let mut chars = name.chars();
        let letter = chars.next()?;
        let natural: i32 = match letter {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return None,
        };

        let (offset, spelling) = match chars.next() {
            None => (0, Spelling::Sharp),
            Some('#') => (1, Spelling::Sharp),
            Some('b') => (-1, Spelling::Flat),
            Some(_) => return None,
        };

        if chars.next().is_some() {
            return None;
        }

        let pitch_class = (natural + offset).rem_euclid(12) as u8;
        Some((Self::from_pitch_class(pitch_class), spelling))
    }

    /// Move by a number of semitones, wrapping within the octave
    pub fn transpose(self, semitones: i32) -> NoteName {
        let pc = (self.pitch_class() as i32 + semitones).rem_euclid(12);
        Self::from_pitch_class(pc as u8)
    }

    /// Upward distance in semitones from `self` to `other` (0-11)
    pub fn semitones_to(self, other: NoteName) -> i32 {
        (other.pitch_class() as i32 - self.pitch_class() as i32).rem_euclid(12)
    }

    /// Concrete pitch of this note in the given octave
    pub fn pitch(self, octave: i32) -> Pitch {
        (octave + 1) * 12 + self.pitch_class() as i32
    }
}

impl FromStr for NoteName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        NoteName::from_spelling(s.trim())
            .map(|(note, _)| note)
            .ok_or_else(|| anyhow!("Invalid note name: {}", s))
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Accidental used when displaying a black key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Spelling {
    #[default]
    Sharp,
    Flat,
}

/// A pitch class together with how it was written.
///
/// Equality and hashing only look at the pitch class, so `Bb` and `A#` compare
/// equal; the spelling only matters for display.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpelledNote {
    note: NoteName,
    spelling: Spelling,
}

impl SpelledNote {
    pub fn new(note: NoteName, spelling: Spelling) -> Self {
        SpelledNote { note, spelling }
    }

    pub fn note(&self) -> NoteName {
        self.note
    }

    pub fn spelling(&self) -> Spelling {
        self.spelling
    }

    pub fn pitch_class(&self) -> u8 {
        self.note.pitch_class()
    }

    pub fn name(&self) -> &'static str {
        match self.spelling {
            Spelling::Sharp => self.note.name(),
            Spelling::Flat => self.note.flat_name(),
        }
    }

    /// Same pitch class written with another spelling
    pub fn respelled(self, spelling: Spelling) -> Self {
        SpelledNote { spelling, ..self }
    }
}

impl From<NoteName> for SpelledNote {
    fn from(note: NoteName) -> Self {
        SpelledNote::new(note, Spelling::Sharp)
    }
}

impl PartialEq for SpelledNote {
    fn eq(&self, other: &Self) -> bool {
        self.note == other.note
    }
}

impl Eq for SpelledNote {}

impl Hash for SpelledNote {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.note.hash(state);
    }
}

impl FromStr for SpelledNote {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        NoteName::from_spelling(s.trim())
            .map(|(note, spelling)| SpelledNote::new(note, spelling))
            .ok_or_else(|| anyhow!("Invalid note name: {}", s))
    }
}

impl fmt::Display for SpelledNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Pitch class (0-11) of a canonical note name, `None` for anything else
pub fn note_to_pitch_class(name: &str) -> Option<u8> {
    NoteName::from_canonical(name).map(NoteName::pitch_class)
}

/// Pitch class (0-11) of a pitch, for any integer pitch
pub fn pitch_class_of(pitch: Pitch) -> u8 {
    pitch.rem_euclid(12) as u8
}

/// Scientific octave number of a pitch (60 -> 4)
pub fn octave_of(pitch: Pitch) -> i32 {
    pitch.div_euclid(12) - 1
}

/// Name with octave, e.g. 60 -> "C4", 58 -> "A#3"
pub fn pitch_to_note_name(pitch: Pitch) -> String {
    format!(
        "{}{}",
        NOTE_NAMES[pitch_class_of(pitch) as usize],
        octave_of(pitch)
    )
}

/// Parse a name with octave (`"C4"`, `"A#3"`, `"Bb2"`, `"C-1"`) back to a pitch
pub fn note_name_to_pitch(name: &str) -> Option<Pitch> {
    let name = name.trim();
    let split = name.find(|c: char| c.is_ascii_digit() || c == '-')?;
    let (note, octave) = name.split_at(split);
    let octave: i32 = octave.parse().ok()?;

    // Validates the accidental; the letter sets the octave boundary
    NoteName::from_spelling(note)?;
    let letter = NoteName::from_canonical(note.get(..1)?)?;
    let accidental = match note.get(1..) {
        Some("#") => 1,
        Some("b") => -1,
        _ => 0,
    };

    octave
        .checked_add(1)?
        .checked_mul(12)?
        .checked_add(letter.pitch_class() as Pitch + accidental)
}
