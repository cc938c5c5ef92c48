//! Bundled standards library
//!
//! Short, well-known progressions for playback and transposition, and a couple
//! of songs with hand-written four-voice voicings for voice-leading practice.

use crate::types::note::Pitch;
use crate::types::progression::Progression;
use crate::types::voicing::{Song, Voicing, VOICE_COUNT};
use anyhow::{anyhow, Result};

/// A bundled progression as authored data
#[derive(Debug, Clone, Copy)]
pub struct Standard {
    pub title: &'static str,
    pub key: &'static str,
    pub chords: &'static [&'static str],
}

impl Standard {
    pub fn progression(&self) -> Result<Progression> {
        Progression::from_symbols(self.title, self.key, self.chords)
    }
}

/// A bundled progression with one voicing per chord
#[derive(Debug, Clone, Copy)]
pub struct StandardSong {
    pub standard: Standard,
    pub voicings: &'static [[Pitch; VOICE_COUNT]],
}

impl StandardSong {
    pub fn song(&self) -> Result<Song> {
        let voicings = self.voicings.iter().copied().map(Voicing::new).collect();
        Song::new(self.standard.progression()?, voicings)
    }
}

const II_V_I: Standard = Standard {
    title: "ii-V-I in C",
    key: "C",
    chords: &["Dmin7", "G7", "Cmaj7", "Cmaj7"],
};

const AUTUMN_LEAVES: Standard = Standard {
    title: "Autumn Leaves",
    key: "Bb",
    chords: &["Cmin7", "F7", "Bbmaj7", "Ebmaj7", "Amin7b5", "D7", "Gmin7", "Gmin7"],
};

pub const STANDARDS: &[Standard] = &[
    II_V_I,
    Standard {
        title: "Minor ii-V-i in A",
        key: "A",
        chords: &["Bmin7b5", "E7", "Amin7", "Amin7"],
    },
    AUTUMN_LEAVES,
    Standard {
        title: "Blue Bossa",
        key: "C",
        chords: &["Cmin7", "Fmin7", "Dmin7b5", "G7", "Ebmin7", "Ab7", "Dbmaj7", "G7"],
    },
    Standard {
        title: "Rhythm Changes",
        key: "Bb",
        chords: &["Bbmaj7", "G7", "Cmin7", "F7", "Dmin7", "G7", "Cmin7", "F7"],
    },
    Standard {
        title: "Take the A Train",
        key: "C",
        chords: &["C6", "C6", "D7", "D7", "Dmin7", "G7", "C6", "C6"],
    },
    Standard {
        title: "So What",
        key: "D",
        chords: &["Dmin7", "Dmin7", "Ebmin7", "Dmin7"],
    },
    Standard {
        title: "Tune Up",
        key: "D",
        chords: &["Emin7", "A7", "Dmaj7", "Dmaj7", "Dmin7", "G7", "Cmaj7", "Cmaj7"],
    },
];

pub const SONGS: &[StandardSong] = &[
    StandardSong {
        standard: II_V_I,
        voicings: &[
            [57, 62, 65, 69],
            [59, 62, 65, 71],
            [59, 64, 67, 72],
            [59, 64, 67, 72],
        ],
    },
    StandardSong {
        standard: AUTUMN_LEAVES,
        voicings: &[
            [48, 58, 63, 67],
            [53, 57, 63, 65],
            [46, 57, 62, 65],
            [51, 55, 58, 62],
            [45, 55, 60, 63],
            [50, 54, 57, 60],
            [43, 53, 58, 62],
            [43, 53, 58, 62],
        ],
    },
];

pub fn titles() -> Vec<&'static str> {
    STANDARDS.iter().map(|s| s.title).collect()
}

pub fn progressions() -> Result<Vec<Progression>> {
    STANDARDS.iter().map(Standard::progression).collect()
}

pub fn songs() -> Result<Vec<Song>> {
    SONGS.iter().map(StandardSong::song).collect()
}

/// Look up a bundled progression by title, ignoring case
pub fn find(title: &str) -> Result<Progression> {
    let title = title.trim();
    STANDARDS
        .iter()
        .find(|s| s.title.eq_ignore_ascii_case(title))
        .ok_or_else(|| anyhow!("Unknown standard: '{}'", title))?
        .progression()
}

/// Look up a bundled song (progression plus voicings) by title, ignoring case
pub fn find_song(title: &str) -> Result<Song> {
    let title = title.trim();
    SONGS
        .iter()
        .find(|s| s.standard.title.eq_ignore_ascii_case(title))
        .ok_or_else(|| anyhow!("No voicings bundled for '{}'", title))?
        .song()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::voice_leading::{analyze_song, MovementBand};

    #[test]
    fn test_all_standards_build() {
        let all = progressions().unwrap();
        assert_eq!(all.len(), STANDARDS.len());
        for prog in &all {
            assert!(!prog.is_empty());
            assert!(prog.len() <= 8);
            assert!(prog.chords().iter().all(|c| c.quality().is_recognized()));
        }
    }

    #[test]
    fn test_all_songs_build() {
        let all = songs().unwrap();
        assert_eq!(all.len(), 2);
        for song in &all {
            assert_eq!(song.len(), song.progression().len());
        }
    }

    #[test]
    fn test_find_ignores_case() {
        let prog = find("ii-v-i in c").unwrap();
        assert_eq!(prog.symbols(), vec!["Dmin7", "G7", "Cmaj7", "Cmaj7"]);
        assert_eq!(find("  Blue Bossa ").unwrap().len(), 8);
        assert!(find("Giant Steps").is_err());
    }

    #[test]
    fn test_flat_keys_keep_spelling() {
        let prog = find("Autumn Leaves").unwrap();
        assert_eq!(prog.key().name(), "Bb");
        assert_eq!(prog[2].to_string(), "Bbmaj7");
    }

    #[test]
    fn test_ii_v_i_song_leading() {
        let song = find_song("ii-V-I in C").unwrap();
        let analysis = analyze_song(&song);
        assert_eq!(analysis.transitions.len(), 3);
        assert_eq!(analysis.transitions[0].total_movement, 4);
        assert_eq!(analysis.transitions[0].band(), MovementBand::Excellent);
        assert!(find_song("So What").is_err());
    }
}
