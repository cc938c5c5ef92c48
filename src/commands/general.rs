//! General REPL commands (help, quit, tempo)

use crate::commands::{CommandContext, CommandResult};
use colored::*;

/// Handle `help` command
pub fn cmd_help(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    print_help();
    CommandResult::Success
}

/// Handle `quit` or `exit` command
pub fn cmd_quit(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Exit
}

/// Handle `tempo [bpm]` command
pub fn cmd_tempo(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!("Current tempo: {:.1} BPM", ctx.config.bpm));
    }

    let bpm = match args.parse::<f32>() {
        Ok(bpm) => bpm,
        Err(_) => {
            return CommandResult::Error("Invalid tempo. Use a value between 1-400 BPM".to_string())
        }
    };

    match ctx.set_tempo(bpm) {
        Ok(()) => CommandResult::Message(
            format!("🎵 Tempo set to {:.1} BPM", bpm)
                .bright_green()
                .to_string(),
        ),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Print help information
fn print_help() {
    println!("{}", "🎹 Comping Help".bold());
    println!("{}", "===============".bold());
    println!();
    println!("{}", "Chords:".green());
    println!("  {}           - Show the tones of any chord symbol", "Dmin7".cyan());
    println!("  {}          - Flats work too", "Bbmaj7".cyan());
    println!();
    println!("{}", "Progressions:".green());
    println!("  {}       - List bundled standards", "standards".cyan());
    println!("  {}    - Show a standard without selecting it", "show <title>".cyan());
    println!("  {}  - Make a standard current", "select <title>".cyan());
    println!("  {}      - Transpose the current progression", "key <name>".cyan());
    println!("  {}      - Move through the chords", "next / prev".cyan());
    println!("  {}           - Tones of the current chord", "chord".cyan());
    println!();
    println!("{}", "Playback:".green());
    println!("  {}            - Play the current progression", "play".cyan());
    println!("  {}      - Play only the current chord", "play chord".cyan());
    println!("  {}            - Stop playback", "stop".cyan());
    println!("  {}           - Show current tempo", "tempo".cyan());
    println!("  {}     - Set tempo (1-400)", "tempo <bpm>".cyan());
    println!();
    println!("{}", "Voice Leading:".green());
    println!(
        "  {} - Analyze the voicings of a song",
        "voicings [title]".cyan()
    );
    println!(
        "  {} - Play those voicings",
        "play voicings [title]".cyan()
    );
    println!();
    println!("{}", "Ear Training:".green());
    println!("  {}   - Name the interval you hear", "quiz interval".cyan());
    println!("  {}      - Name the chord quality you hear", "quiz chord".cyan());
    println!("  {}     - Hear the question again", "quiz replay".cyan());
    println!(
        "  {} - Answer by option number or name",
        "answer <choice>".cyan()
    );
    println!("  {}           - Show your accuracy", "score".cyan());
    println!();
    println!("{}", "MIDI Commands:".green());
    println!("  {}      - List MIDI output ports", "midi ports".cyan());
    println!("  {} - Play through a MIDI port", "midi connect <port>".cyan());
    println!("  {}  - Set channel (1-16)", "midi channel <n>".cyan());
    println!("  {}    - Print notes instead", "midi console".cyan());
    println!();
    println!("{}", "Other Commands:".green());
    println!("  {}            - Show this help", "help".bright_green());
    println!("  {}            - Exit the REPL", "quit".bright_red());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{context, message};

    #[test]
    fn test_tempo_show_and_set() {
        let mut ctx = context();
        assert!(message(cmd_tempo("", &mut ctx)).contains("120.0 BPM"));

        assert!(message(cmd_tempo("140", &mut ctx)).contains("140.0 BPM"));
        assert_eq!(ctx.config.bpm, 140.0);
        assert_eq!(ctx.tempo.get(), 140.0);
    }

    #[test]
    fn test_tempo_rejects_out_of_range() {
        let mut ctx = context();
        assert!(matches!(cmd_tempo("0", &mut ctx), CommandResult::Error(_)));
        assert!(matches!(cmd_tempo("401", &mut ctx), CommandResult::Error(_)));
        assert!(matches!(cmd_tempo("fast", &mut ctx), CommandResult::Error(_)));
        assert_eq!(ctx.config.bpm, 120.0);
    }
}
