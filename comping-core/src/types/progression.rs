use crate::types::chord::ChordSymbol;
use crate::types::note::{Pitch, SpelledNote};
use anyhow::{anyhow, bail, Result};
use std::fmt;
use std::ops::Index;

/// An ordered sequence of chord symbols tied to a home key.
///
/// A progression always holds at least one chord. It is an immutable value:
/// transposition builds a new progression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Progression {
    title: String,
    key: SpelledNote,
    chords: Vec<ChordSymbol>,
}

impl Progression {
    /// Create a progression; fails when `chords` is empty
    pub fn new(title: &str, key: impl Into<SpelledNote>, chords: Vec<ChordSymbol>) -> Result<Self> {
        if chords.is_empty() {
            bail!("Progression '{}' needs at least one chord", title);
        }

        Ok(Progression {
            title: title.to_string(),
            key: key.into(),
            chords,
        })
    }

    /// Create a progression from a key name and chord symbol strings
    /// (e.g. `("ii-V-I", "C", &["Dmin7", "G7", "Cmaj7"])`).
    ///
    /// Chord symbols never fail to parse, but the key must be a real note name.
    pub fn from_symbols(title: &str, key: &str, symbols: &[&str]) -> Result<Self> {
        let key: SpelledNote = key
            .parse()
            .map_err(|e| anyhow!("Bad key for '{}': {}", title, e))?;
        let chords = symbols.iter().map(|s| ChordSymbol::parse(s)).collect();
        Self::new(title, key, chords)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn key(&self) -> SpelledNote {
        self.key
    }

    /// Get the number of chords in the progression
    pub fn len(&self) -> usize {
        self.chords.len()
    }

    /// Always false for a constructed progression
    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    pub fn chords(&self) -> &[ChordSymbol] {
        &self.chords
    }

    /// Get a reference to a specific chord by index
    pub fn get(&self, index: usize) -> Option<&ChordSymbol> {
        self.chords.get(index)
    }

    /// Chord symbols as display strings
    pub fn symbols(&self) -> Vec<String> {
        self.chords.iter().map(|c| c.to_string()).collect()
    }

    /// Transpose the whole progression into `new_key`.
    ///
    /// Every root moves by the same shift `(new_key - key) mod 12` and is
    /// written with the new key's spelling; suffixes are preserved exactly.
    /// Transposing into the current key returns an unchanged copy.
    pub fn transpose(&self, new_key: impl Into<SpelledNote>) -> Progression {
        let new_key = new_key.into();
        let shift = self.key.note().semitones_to(new_key.note());

        if shift == 0 {
            return self.clone();
        }

        let chords = self
            .chords
            .iter()
            .map(|chord| chord.transpose(shift, new_key.spelling()))
            .collect();

        Progression {
            title: self.title.clone(),
            key: new_key,
            chords,
        }
    }

    /// Transpose by a signed number of semitones, keeping the key's spelling
    pub fn transpose_by(&self, semitones: i32) -> Progression {
        let target = SpelledNote::new(self.key.note().transpose(semitones), self.key.spelling());
        self.transpose(target)
    }

    /// Root-position pitches of every chord, in playback order
    pub fn chord_tones(&self) -> Vec<Vec<Pitch>> {
        self.chords.iter().map(ChordSymbol::tones).collect()
    }

    /// A cursor positioned on the first chord
    pub fn cursor(&self) -> ProgressionCursor {
        ProgressionCursor::new(self.len())
    }
}

impl Index<usize> for Progression {
    type Output = ChordSymbol;

    fn index(&self, index: usize) -> &Self::Output {
        &self.chords[index]
    }
}

impl fmt::Display for Progression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (key of {}): {}", self.title, self.key, self.symbols().join(" | "))
    }
}

/// Index after `index` in a circular sequence of length `len`
pub fn next_index(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (index + 1) % len
}

/// Index before `index` in a circular sequence of length `len`
pub fn previous_index(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (index % len + len - 1) % len
}

/// Circular position within a progression. Always in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressionCursor {
    index: usize,
    len: usize,
}

impl ProgressionCursor {
    pub fn new(len: usize) -> Self {
        ProgressionCursor { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Advance one chord, wrapping to the start
    pub fn next(&mut self) -> usize {
        self.index = next_index(self.index, self.len);
        self.index
    }

    /// Step back one chord, wrapping to the end
    pub fn previous(&mut self) -> usize {
        self.index = previous_index(self.index, self.len);
        self.index
    }

    /// Jump to `index`, wrapped into range
    pub fn jump(&mut self, index: usize) -> usize {
        self.index = if self.len == 0 { 0 } else { index % self.len };
        self.index
    }
}
