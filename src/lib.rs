//! # Comping
//!
//! An interactive shell for jazz piano practice, built on `comping-core`.
//! It steps through bundled standards, transposes them, plays chords through
//! a MIDI synthesizer (or prints them when none is connected), analyzes the
//! voice leading of planned voicings and runs interval and chord-quality
//! ear-training quizzes.
//!
//! ## Modules
//!
//! - `audio`: MIDI and console backends and the threaded playback engine.
//! - `commands`: The command registry and every REPL command.
//! - `logger`: `log` output for the shell, filtered by `COMPING_LOG`.
//! - `repl`: The Read-Eval-Print Loop.

pub mod audio;
pub mod commands;
pub mod logger;
pub mod repl;

pub use crate::commands::{create_registry, CommandContext, CommandResult};
pub use crate::repl::Repl;
