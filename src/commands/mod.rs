//! Command registry for REPL commands
//!
//! Commands are matched by prefix, longest first; whatever follows the prefix
//! is handed to the handler as its argument string.

pub mod general;
pub mod midi;
pub mod progression;
pub mod quiz;
pub mod voicing;

use crate::audio::{MidiConfig, PlaybackEngine, SharedTempo};
use anyhow::Result;
use comping_core::ear_training::{QuestionGenerator, Quiz};
use comping_core::standards;
use comping_core::types::{ChordSymbol, PlaybackConfig, Progression, ProgressionCursor};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Standard selected when the REPL starts
pub const DEFAULT_STANDARD: &str = "ii-V-I in C";

/// Result of executing a command
#[derive(Debug)]
pub enum CommandResult {
    /// Command executed successfully, continue REPL
    Success,
    /// Command executed, show this message
    Message(String),
    /// Exit the REPL
    Exit,
    /// Not a command, try reading it as a chord symbol
    NotACommand,
    /// Error occurred
    Error(String),
}

impl From<Result<String>> for CommandResult {
    fn from(result: Result<String>) -> Self {
        match result {
            Ok(msg) => CommandResult::Message(msg),
            Err(e) => CommandResult::Error(e.to_string()),
        }
    }
}

/// Session state shared by every command
pub struct CommandContext {
    pub playback: PlaybackEngine,
    pub tempo: SharedTempo,
    pub config: PlaybackConfig,
    pub midi: MidiConfig,
    /// Progression in use, possibly transposed away from its bundled key
    pub progression: Progression,
    pub cursor: ProgressionCursor,
    pub quiz: Quiz<StdRng>,
}

impl CommandContext {
    pub fn new(playback: PlaybackEngine, tempo: SharedTempo, midi: MidiConfig) -> Result<Self> {
        let config = PlaybackConfig::new().with_tempo(tempo.get())?;
        let progression = standards::find(DEFAULT_STANDARD)?;

        Ok(Self {
            playback,
            tempo,
            config,
            midi,
            cursor: progression.cursor(),
            progression,
            quiz: Quiz::new(QuestionGenerator::new(StdRng::from_entropy())),
        })
    }

    /// Make `progression` current and rewind to its first chord
    pub fn select(&mut self, progression: Progression) {
        self.cursor = progression.cursor();
        self.progression = progression;
    }

    pub fn current_chord(&self) -> &ChordSymbol {
        &self.progression[self.cursor.index()]
    }

    pub fn set_tempo(&mut self, bpm: f32) -> Result<()> {
        self.config = self.config.clone().with_tempo(bpm)?;
        self.tempo.set(bpm);
        Ok(())
    }
}

/// A command handler function
pub type CommandHandler = fn(&str, &mut CommandContext) -> CommandResult;

/// Registry of available commands
pub struct CommandRegistry {
    /// Sorted by prefix length descending for longest-match-first lookup
    commands: Vec<(String, CommandHandler)>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Register a command with its prefix
    pub fn register(&mut self, prefix: &str, handler: CommandHandler) {
        self.commands.push((prefix.to_string(), handler));
        self.commands.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    }

    /// Execute a command, returning NotACommand if no match found
    pub fn execute(&self, input: &str, ctx: &mut CommandContext) -> CommandResult {
        for (prefix, handler) in &self.commands {
            if input == prefix || input.starts_with(&format!("{} ", prefix)) {
                let args = input[prefix.len()..].trim();
                return handler(args, ctx);
            }
        }
        CommandResult::NotACommand
    }

    /// Get all registered command prefixes
    pub fn list_commands(&self) -> Vec<&str> {
        self.commands.iter().map(|(p, _)| p.as_str()).collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a fully populated command registry with all built-in commands
pub fn create_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    // Progressions and playback
    registry.register("standards", progression::cmd_standards);
    registry.register("show", progression::cmd_show);
    registry.register("select", progression::cmd_select);
    registry.register("key", progression::cmd_key);
    registry.register("next", progression::cmd_next);
    registry.register("prev", progression::cmd_prev);
    registry.register("chord", progression::cmd_chord);
    registry.register("play chord", progression::cmd_play_chord);
    registry.register("play", progression::cmd_play);
    registry.register("stop", progression::cmd_stop);

    // Voice leading
    registry.register("voicings", voicing::cmd_voicings);
    registry.register("play voicings", voicing::cmd_play_voicings);

    // Ear training
    registry.register("quiz interval", quiz::cmd_quiz_interval);
    registry.register("quiz chord", quiz::cmd_quiz_chord);
    registry.register("quiz replay", quiz::cmd_quiz_replay);
    registry.register("answer", quiz::cmd_answer);
    registry.register("score", quiz::cmd_score);

    // MIDI commands
    registry.register("midi ports", midi::cmd_midi_ports);
    registry.register("midi connect", midi::cmd_midi_connect);
    registry.register("midi channel", midi::cmd_midi_channel);
    registry.register("midi console", midi::cmd_midi_console);

    // General commands
    registry.register("tempo", general::cmd_tempo);
    registry.register("help", general::cmd_help);
    registry.register("quit", general::cmd_quit);
    registry.register("exit", general::cmd_quit);

    registry
}


#[cfg(test)]
mod tests {
    use super::test_support::context;
    use super::*;

    #[test]
    fn test_longest_prefix_wins() {
        let registry = create_registry();
        let commands = registry.list_commands();
        let play_chord = commands.iter().position(|c| *c == "play chord").unwrap();
        let play = commands.iter().position(|c| *c == "play").unwrap();
        assert!(play_chord < play);
    }

    #[test]
    fn test_unknown_input_is_not_a_command() {
        let registry = create_registry();
        let mut ctx = context();
        assert!(matches!(registry.execute("Dmin7", &mut ctx), CommandResult::NotACommand));
        // Prefix must be followed by a space
        assert!(matches!(registry.execute("nextt", &mut ctx), CommandResult::NotACommand));
        assert!(matches!(registry.execute("quit", &mut ctx), CommandResult::Exit));
    }

    #[test]
    fn test_context_defaults() {
        let ctx = context();
        assert_eq!(ctx.progression.title(), DEFAULT_STANDARD);
        assert_eq!(ctx.current_chord().to_string(), "Dmin7");
        assert_eq!(ctx.config.bpm, 120.0);
    }
}
