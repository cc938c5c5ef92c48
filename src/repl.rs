//! REPL (Read-Eval-Print Loop) for the practice shell

use crate::audio::{open_backend, MidiConfig, PlaybackEngine, SharedTempo};
use crate::commands::progression::describe_chord;
use crate::commands::{create_registry, CommandContext, CommandRegistry, CommandResult};
use anyhow::Result;
use colored::*;
use comping_core::types::{ChordSymbol, PlaybackConfig};
use log::info;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Interactive practice shell
pub struct Repl {
    editor: DefaultEditor,
    registry: CommandRegistry,
    ctx: CommandContext,
}

impl Repl {
    /// Create a new REPL, playing through MIDI when a port is available
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new()?;
        let tempo = SharedTempo::new(PlaybackConfig::default().bpm);
        let midi = MidiConfig::default();
        let playback = PlaybackEngine::new(open_backend(&midi, &tempo));
        let ctx = CommandContext::new(playback, tempo, midi)?;

        Ok(Repl {
            editor,
            registry: create_registry(),
            ctx,
        })
    }

    /// Run one line; returns false when the REPL should exit
    fn handle_line(&mut self, line: &str) -> bool {
        match self.registry.execute(line, &mut self.ctx) {
            CommandResult::Success => {}
            CommandResult::Message(msg) => println!("{}", msg),
            CommandResult::Exit => return false,
            CommandResult::Error(e) => {
                println!("{} {}", "Error:".bright_red().bold(), e.red());
            }
            CommandResult::NotACommand => match chord_input(line) {
                Some(chord) => println!("{}", describe_chord(&chord)),
                None => println!(
                    "{} {} {}",
                    "Unknown command:".bright_red().bold(),
                    line.red(),
                    "(type 'help')".dimmed()
                ),
            },
        }
        true
    }

    /// Start the REPL loop
    pub fn run(&mut self) -> Result<()> {
        println!(
            "{} {}",
            "🎹".bright_yellow(),
            "Comping: jazz piano practice".bright_cyan().bold()
        );
        println!(
            "Type a chord like {} or {}, or try {}, {}, {}",
            "Dmin7".cyan(),
            "Bbmaj7".cyan(),
            "standards".cyan(),
            "play".cyan(),
            "quiz chord".cyan()
        );
        println!(
            "Type '{}' for more information, '{}' or {} to exit.\n",
            "help".bright_green(),
            "quit".bright_red(),
            "Ctrl+C".bright_red()
        );

        loop {
            let prompt = format!("{} ", "comping>".bright_magenta().bold());
            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    self.editor.add_history_entry(line)?;
                    if !self.handle_line(line) {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => {
                    println!(
                        "{} {}",
                        "Error reading input:".bright_red().bold(),
                        err.to_string().red()
                    );
                    break;
                }
            }
        }

        println!("{} 🎵", "Goodbye!".bright_cyan());
        info!("REPL closed");
        Ok(())
    }
}

/// Input that starts with a note letter is read as a chord symbol
fn chord_input(line: &str) -> Option<ChordSymbol> {
    line.starts_with(|c: char| ('A'..='G').contains(&c))
        .then(|| ChordSymbol::parse(line))
}

/// Convenience function to start the REPL
pub fn start() -> Result<()> {
    let mut repl = Repl::new().map_err(|e| anyhow::anyhow!("Failed to initialize REPL: {}", e))?;
    repl.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chord_input() {
        assert_eq!(chord_input("Bbmaj7").unwrap().to_string(), "Bbmaj7");
        assert_eq!(chord_input("F#7").unwrap().tone_names(), vec!["F#4", "A#4", "C#5", "E5"]);
        assert!(chord_input("hello").is_none());
        assert!(chord_input("dmin7").is_none());
    }
}
