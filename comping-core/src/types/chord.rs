use crate::types::note::{pitch_to_note_name, NoteName, Pitch, SpelledNote, Spelling, REFERENCE_OCTAVE};
use crate::types::quality::ChordQuality;
use log::debug;
use std::fmt;

/// A lead-sheet chord symbol such as `Dmin7`, `Bbmaj7` or `F#7`.
///
/// The suffix is kept exactly as written so that transposition never rewrites
/// the quality text; [`ChordSymbol::quality`] interprets it on demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChordSymbol {
    root: SpelledNote,
    suffix: String,
}

impl ChordSymbol {
    /// Create a chord symbol from a root and a quality suffix
    pub fn new(root: impl Into<SpelledNote>, suffix: &str) -> Self {
        ChordSymbol {
            root: root.into(),
            suffix: suffix.to_string(),
        }
    }

    /// Parse a chord symbol. Never fails: text that does not start with a note
    /// letter becomes a C major triad.
    pub fn parse(text: &str) -> Self {
        parse_chord_symbol(text)
    }

    pub fn root(&self) -> SpelledNote {
        self.root
    }

    /// Quality suffix as written (empty for a plain major triad)
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn quality(&self) -> ChordQuality {
        ChordQuality::from_suffix(&self.suffix)
    }

    /// Absolute pitches of the chord in root position at the reference octave
    pub fn tones(&self) -> Vec<Pitch> {
        chord_tones(self.root.note(), &self.quality())
    }

    /// Pitch names with octave (e.g. `["D4", "F4", "A4", "C5"]`)
    pub fn tone_names(&self) -> Vec<String> {
        self.tones().into_iter().map(pitch_to_note_name).collect()
    }

    /// Move the root by `semitones`, writing the new root with `spelling`.
    /// The suffix is carried over untouched.
    pub fn transpose(&self, semitones: i32, spelling: Spelling) -> Self {
        ChordSymbol {
            root: SpelledNote::new(self.root.note().transpose(semitones), spelling),
            suffix: self.suffix.clone(),
        }
    }
}

impl From<&str> for ChordSymbol {
    fn from(text: &str) -> Self {
        parse_chord_symbol(text)
    }
}

impl fmt::Display for ChordSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.suffix)
    }
}

/// Split `<A-G><# or b>?<suffix>` into root and suffix.
///
/// Unmatched input falls back to C major; this is a recovery policy, not an
/// error.
pub fn parse_chord_symbol(text: &str) -> ChordSymbol {
    let text = text.trim();
    let mut chars = text.char_indices();

    let letter_matches = matches!(chars.next(), Some((_, 'A'..='G')));
    if !letter_matches {
        return fallback(text);
    }

    let split_at = match chars.next() {
        Some((i, '#')) | Some((i, 'b')) => i + 1,
        _ => 1,
    };

    let (root_text, suffix) = text.split_at(split_at);
    match NoteName::from_spelling(root_text) {
        Some((note, spelling)) => ChordSymbol {
            root: SpelledNote::new(note, spelling),
            suffix: suffix.to_string(),
        },
        None => fallback(text),
    }
}

fn fallback(text: &str) -> ChordSymbol {
    debug!("unparseable chord symbol {:?}, using C major", text);
    ChordSymbol::new(NoteName::C, "")
}

/// Root-position pitches for `root` and `quality` at the reference octave.
/// Unrecognized qualities are voiced as major triads.
pub fn chord_tones(root: NoteName, quality: &ChordQuality) -> Vec<Pitch> {
    let root_pitch = root.pitch(REFERENCE_OCTAVE);
    quality
        .intervals()
        .iter()
        .map(|offset| root_pitch + offset)
        .collect()
}
