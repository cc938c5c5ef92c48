use crate::types::note::{pitch_to_note_name, Pitch, SpelledNote};
use crate::types::progression::Progression;
use anyhow::{bail, Result};
use std::fmt;

/// Number of voices in every voicing
pub const VOICE_COUNT: usize = 4;

/// One of the four voices, ordered bass to soprano
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Voice {
    Bass,
    Tenor,
    Alto,
    Soprano,
}

impl Voice {
    pub const ALL: [Voice; VOICE_COUNT] = [Voice::Bass, Voice::Tenor, Voice::Alto, Voice::Soprano];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Voice::Bass => "Bass",
            Voice::Tenor => "Tenor",
            Voice::Alto => "Alto",
            Voice::Soprano => "Soprano",
        }
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A four-voice realization of a chord, bass first.
///
/// Voice `i` of one voicing is the same voice `i` in the next; nothing here
/// reorders voices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Voicing([Pitch; VOICE_COUNT]);

impl Voicing {
    pub fn new(pitches: [Pitch; VOICE_COUNT]) -> Self {
        Voicing(pitches)
    }

    /// Build from a slice; fails unless it holds exactly four pitches
    pub fn from_slice(pitches: &[Pitch]) -> Result<Self> {
        match <[Pitch; VOICE_COUNT]>::try_from(pitches) {
            Ok(array) => Ok(Voicing(array)),
            Err(_) => bail!(
                "A voicing needs exactly {} pitches, got {}",
                VOICE_COUNT,
                pitches.len()
            ),
        }
    }

    pub fn pitch(&self, voice: Voice) -> Pitch {
        self.0[voice.index()]
    }

    pub fn pitches(&self) -> &[Pitch; VOICE_COUNT] {
        &self.0
    }

    /// Every voice moved by `semitones`
    pub fn shifted(&self, semitones: i32) -> Voicing {
        Voicing(self.0.map(|p| p + semitones))
    }

    /// Pitch names bass to soprano (e.g. `["A3", "D4", "F4", "A4"]`)
    pub fn note_names(&self) -> Vec<String> {
        self.0.iter().map(|p| pitch_to_note_name(*p)).collect()
    }
}

impl fmt::Display for Voicing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.note_names().join(", "))
    }
}

/// A progression with one voicing per chord
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Song {
    progression: Progression,
    voicings: Vec<Voicing>,
}

impl Song {
    /// Pair a progression with its voicings; the counts must match
    pub fn new(progression: Progression, voicings: Vec<Voicing>) -> Result<Self> {
        if voicings.len() != progression.len() {
            bail!(
                "Song '{}' has {} chords but {} voicings",
                progression.title(),
                progression.len(),
                voicings.len()
            );
        }

        Ok(Song {
            progression,
            voicings,
        })
    }

    pub fn title(&self) -> &str {
        self.progression.title()
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub fn voicings(&self) -> &[Voicing] {
        &self.voicings
    }

    /// Move the song into `new_key`. Chords follow [`Progression::transpose`];
    /// voicings move by the nearest equivalent shift (-5..=6 semitones) so they
    /// stay in the same register.
    pub fn transpose(&self, new_key: impl Into<SpelledNote>) -> Song {
        let new_key = new_key.into();
        let shift = match self.progression.key().note().semitones_to(new_key.note()) {
            up if up > 6 => up - 12,
            up => up,
        };

        Song {
            progression: self.progression.transpose(new_key),
            voicings: self.voicings.iter().map(|v| v.shifted(shift)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.voicings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voicings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::note::NoteName;

    #[test]
    fn test_voicing_from_slice() {
        let v = Voicing::from_slice(&[57, 62, 65, 69]).unwrap();
        assert_eq!(v.pitch(Voice::Bass), 57);
        assert_eq!(v.pitch(Voice::Soprano), 69);
        assert_eq!(v.to_string(), "[A3, D4, F4, A4]");

        assert!(Voicing::from_slice(&[60, 64, 67]).is_err());
        assert!(Voicing::from_slice(&[60, 64, 67, 71, 74]).is_err());
    }

    #[test]
    fn test_voice_order() {
        let indices: Vec<usize> = Voice::ALL.iter().map(|v| v.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert!(Voice::Bass < Voice::Soprano);
    }

    #[test]
    fn test_song_length_must_match() {
        let prog = Progression::from_symbols("two", "C", &["Dmin7", "G7"]).unwrap();
        let one = vec![Voicing::new([57, 62, 65, 69])];
        assert!(Song::new(prog.clone(), one).is_err());

        let two = vec![Voicing::new([57, 62, 65, 69]), Voicing::new([59, 62, 65, 71])];
        let song = Song::new(prog, two).unwrap();
        assert_eq!(song.len(), 2);
        assert_eq!(song.title(), "two");
    }

    #[test]
    fn test_song_transpose_moves_voicings() {
        let prog = Progression::from_symbols("two", "C", &["Dmin7", "G7"]).unwrap();
        let voicings = vec![Voicing::new([57, 62, 65, 69]), Voicing::new([59, 62, 65, 71])];
        let song = Song::new(prog, voicings).unwrap();

        let up = song.transpose(NoteName::D);
        assert_eq!(up.progression().symbols(), vec!["Emin7", "A7"]);
        assert_eq!(up.voicings()[0].pitches(), &[59, 64, 67, 71]);

        // A fifth up is reached by moving down a fourth
        let g = song.transpose(NoteName::G);
        assert_eq!(g.progression().symbols(), vec!["Amin7", "D7"]);
        assert_eq!(g.voicings()[1].pitches(), &[54, 57, 60, 66]);

        assert_eq!(song.transpose(NoteName::C), song);
    }
}
