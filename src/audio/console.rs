//! Prints triggered notes instead of sounding them

use anyhow::Result;
use colored::*;
use comping_core::types::NoteValue;
use comping_core::AudioBackend;

#[derive(Debug, Default)]
pub struct ConsoleBackend;

impl ConsoleBackend {
    pub fn new() -> Self {
        ConsoleBackend
    }

    fn line(notes: &str, value: NoteValue) -> String {
        format!(
            "  {} {} {}",
            "♪".bright_yellow(),
            notes.cyan(),
            format!("({})", value.token()).dimmed()
        )
    }
}

impl AudioBackend for ConsoleBackend {
    fn start(&mut self) -> Result<()> {
        println!("{}", "🎹 No MIDI output; printing notes".dimmed());
        Ok(())
    }

    fn play_note(&mut self, note: &str, value: NoteValue) -> Result<()> {
        println!("{}", Self::line(note, value));
        Ok(())
    }

    fn play_chord(&mut self, notes: &[String], value: NoteValue) -> Result<()> {
        println!("{}", Self::line(&notes.join(" "), value));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_lists_notes_and_token() {
        colored::control::set_override(false);
        let line = ConsoleBackend::line("C4 E4 G4", NoteValue::Half);
        assert_eq!(line, "  ♪ C4 E4 G4 (2n)");
    }
}
