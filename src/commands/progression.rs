//! Progression commands: browsing standards, transposing, stepping through
//! chords and playing them

use crate::commands::{CommandContext, CommandResult};
use anyhow::{anyhow, Result};
use colored::*;
use comping_core::audio::progression_steps;
use comping_core::standards;
use comping_core::types::{ChordSymbol, Progression, SpelledNote};

/// One-line summary of a chord: symbol, quality and tones
pub fn describe_chord(chord: &ChordSymbol) -> String {
    let quality = chord.quality();
    let mut line = format!(
        "{} {}: {}",
        chord.to_string().bright_cyan().bold(),
        format!("({})", quality.description()).dimmed(),
        chord.tone_names().join(" ")
    );
    if !quality.is_recognized() {
        line.push_str(&format!(" {}", "(unknown quality, voiced as major)".yellow()));
    }
    line
}

/// Chords separated by bars, with the chord at `current` highlighted
pub fn render_progression(prog: &Progression, current: Option<usize>) -> String {
    let chords: Vec<String> = prog
        .chords()
        .iter()
        .enumerate()
        .map(|(i, chord)| {
            if Some(i) == current {
                format!("[{}]", chord).bright_yellow().bold().to_string()
            } else {
                chord.to_string()
            }
        })
        .collect();

    format!(
        "{} {}\n  {}",
        prog.title().bold(),
        format!("(key of {})", prog.key()).dimmed(),
        chords.join(" | ")
    )
}

fn position(ctx: &CommandContext) -> String {
    format!(
        "{} {}",
        format!("{}/{}", ctx.cursor.index() + 1, ctx.progression.len()).dimmed(),
        describe_chord(ctx.current_chord())
    )
}

fn list_standards(current: &str) -> Result<String> {
    let mut output = format!("{}\n", "📚 Standards:".bold());
    for prog in standards::progressions()? {
        let marker = if prog.title() == current {
            "▶".bright_green()
        } else {
            " ".normal()
        };
        output.push_str(&format!(
            "{} {} {}\n",
            marker,
            prog.title().cyan(),
            format!("({}, {} chords)", prog.key(), prog.len()).dimmed()
        ));
    }
    output.push_str(&format!("\n{} {}", "Use".dimmed(), "select <title>".green()));
    Ok(output)
}

/// Handle `standards` command
pub fn cmd_standards(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    list_standards(ctx.progression.title()).into()
}

/// Handle `show <title>` command
pub fn cmd_show(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(render_progression(
            &ctx.progression,
            Some(ctx.cursor.index()),
        ));
    }
    standards::find(args)
        .map(|prog| render_progression(&prog, None))
        .into()
}

/// Handle `select <title>` command
pub fn cmd_select(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: select <title>\nUse 'standards' to list them".to_string());
    }
    match standards::find(args) {
        Ok(prog) => {
            ctx.select(prog);
            CommandResult::Message(render_progression(&ctx.progression, Some(0)))
        }
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

fn transpose_current(args: &str, ctx: &mut CommandContext) -> Result<String> {
    let key: SpelledNote = args.parse().map_err(|_| anyhow!("Unknown key '{}'", args))?;
    ctx.progression = ctx.progression.transpose(key);
    Ok(render_progression(&ctx.progression, Some(ctx.cursor.index())))
}

/// Handle `key <name>` command
pub fn cmd_key(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!("Current key: {}", ctx.progression.key()));
    }
    transpose_current(args, ctx).into()
}

/// Handle `next` command
pub fn cmd_next(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    ctx.cursor.next();
    CommandResult::Message(position(ctx))
}

/// Handle `prev` command
pub fn cmd_prev(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    ctx.cursor.previous();
    CommandResult::Message(position(ctx))
}

/// Handle `chord` command
pub fn cmd_chord(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Message(position(ctx))
}

/// Handle `play` command
pub fn cmd_play(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    let steps = progression_steps(&ctx.progression.chord_tones(), &ctx.config);
    match ctx.playback.play(steps) {
        Ok(()) => CommandResult::Message(format!(
            "▶ Playing {} at {:.0} BPM",
            ctx.progression.title().bright_cyan(),
            ctx.config.bpm
        )),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `play chord` command
pub fn cmd_play_chord(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    let chord = ctx.current_chord();
    match ctx.playback.play_chord(&chord.tones(), ctx.config.chord_value) {
        Ok(()) => CommandResult::Message(format!("▶ {}", describe_chord(chord))),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `stop` command
pub fn cmd_stop(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    match ctx.playback.stop() {
        Ok(()) => CommandResult::Message("⏹ Stopped".to_string()),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{context, message};

    #[test]
    fn test_describe_chord() {
        let line = describe_chord(&ChordSymbol::parse("Dmin7"));
        assert!(line.contains("Dmin7"));
        assert!(line.contains("D4 F4 A4 C5"));

        let odd = describe_chord(&ChordSymbol::parse("Cwhatever"));
        assert!(odd.contains("C4 E4 G4"));
        assert!(odd.contains("unknown quality"));
    }

    #[test]
    fn test_select_and_navigate() {
        let mut ctx = context();
        message(cmd_select("autumn leaves", &mut ctx));
        assert_eq!(ctx.progression.title(), "Autumn Leaves");
        assert_eq!(ctx.cursor.index(), 0);

        let prev = message(cmd_prev("", &mut ctx));
        assert!(prev.contains("Gmin7"));
        assert_eq!(ctx.cursor.index(), 7);

        message(cmd_next("", &mut ctx));
        assert_eq!(ctx.current_chord().to_string(), "Cmin7");
    }

    #[test]
    fn test_select_unknown() {
        let mut ctx = context();
        assert!(matches!(cmd_select("Giant Steps", &mut ctx), CommandResult::Error(_)));
        assert!(matches!(cmd_select("", &mut ctx), CommandResult::Error(_)));
        assert_eq!(ctx.progression.title(), "ii-V-I in C");
    }

    #[test]
    fn test_key_transposes_current() {
        let mut ctx = context();
        cmd_next("", &mut ctx);
        message(cmd_key("D", &mut ctx));
        assert_eq!(ctx.progression.symbols(), vec!["Emin7", "A7", "Dmaj7", "Dmaj7"]);
        // Position survives transposition
        assert_eq!(ctx.current_chord().to_string(), "A7");

        assert!(matches!(cmd_key("H", &mut ctx), CommandResult::Error(_)));
        assert!(message(cmd_key("", &mut ctx)).contains("D"));
    }

    #[test]
    fn test_show_does_not_select() {
        let mut ctx = context();
        let shown = message(cmd_show("blue bossa", &mut ctx));
        assert!(shown.contains("Dbmaj7"));
        assert_eq!(ctx.progression.title(), "ii-V-I in C");
    }

    #[test]
    fn test_play_and_stop() {
        let mut ctx = context();
        assert!(message(cmd_play("", &mut ctx)).contains("ii-V-I in C"));
        assert!(message(cmd_play_chord("", &mut ctx)).contains("Dmin7"));
        message(cmd_stop("", &mut ctx));
    }
}
