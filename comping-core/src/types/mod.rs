// comping-core/src/types/mod.rs

pub mod audio_config;
pub mod chord;
pub mod interval;
pub mod note;
pub mod progression;
pub mod quality;
pub mod voice_leading;
pub mod voicing;

pub use audio_config::{Beats, NoteValue, PlaybackConfig};
pub use chord::{chord_tones, parse_chord_symbol, ChordSymbol};
pub use interval::{Interval, INTERVALS};
pub use note::{NoteName, Pitch, SpelledNote, Spelling};
pub use progression::{Progression, ProgressionCursor};
pub use quality::{ChordQuality, PRACTICE_QUALITIES};
pub use voice_leading::{
    analyze_song, analyze_transition, analyze_voicings, MovementBand, SongAnalysis,
    TransitionAnalysis, VoiceMovement,
};
pub use voicing::{Song, Voice, Voicing};
