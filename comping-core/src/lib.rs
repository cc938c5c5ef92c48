//! # Comping Core
//!
//! WASM-compatible theory core for the comping jazz piano practice tool.
//! Chord spelling, transposition, voice-leading analysis, ear-training
//! questions and the bundled standards, with no audio or MIDI dependencies.
//!
//! ## Features
//!
//! - **serde**: Enable JSON serialization for web interop
//! - **wasm**: Enable WASM bindings via wasm-bindgen
//! - **colored**: Enable colored terminal output (disabled in WASM)
//!
//! ## Example
//!
//! ```
//! use comping_core::types::{ChordSymbol, NoteName, Progression};
//!
//! let chord = ChordSymbol::parse("Cmaj7");
//! assert_eq!(chord.tones(), vec![60, 64, 67, 71]);
//!
//! let prog = Progression::from_symbols("ii-V-I", "C", &["Dmin7", "G7", "Cmaj7"]).unwrap();
//! assert_eq!(prog.transpose(NoteName::D).symbols(), vec!["Emin7", "A7", "Dmaj7"]);
//! ```

pub mod audio;
pub mod ear_training;
pub mod standards;
pub mod types;
pub mod wasm;

// Re-export commonly used types
pub use audio::{AudioBackend, AudioEngine, Sequencer};
pub use ear_training::{Question, QuestionGenerator, Quiz, Scoreboard};
pub use types::{ChordQuality, ChordSymbol, NoteName, Pitch, Progression, Song, Voicing};
