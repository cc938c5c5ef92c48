//! Voice-leading commands

use crate::commands::{CommandContext, CommandResult};
use anyhow::Result;
use colored::*;
use comping_core::audio::progression_steps;
use comping_core::standards;
use comping_core::types::{analyze_song, Song};

/// Named song in its bundled key, or the current song in the current key
fn song_for(args: &str, ctx: &CommandContext) -> Result<Song> {
    if !args.is_empty() {
        return standards::find_song(args);
    }
    let song = standards::find_song(ctx.progression.title())?;
    Ok(song.transpose(ctx.progression.key()))
}

/// Voicings of a song followed by each transition and the summary
pub fn render_song_analysis(song: &Song) -> String {
    let analysis = analyze_song(song);
    let chords = song.progression().chords();

    let mut output = format!("{} {}\n", "🎼".bright_yellow(), song.title().bold());
    for (chord, voicing) in chords.iter().zip(song.voicings()) {
        output.push_str(&format!("  {:<8} {}\n", chord.to_string(), voicing));
    }
    output.push('\n');

    for (i, transition) in analysis.transitions.iter().enumerate() {
        output.push_str(&format!(
            "  {} {}\n    {}\n",
            format!("{} → {}", chords[i], chords[i + 1]).cyan(),
            format!("({})", transition.total_movement).dimmed(),
            transition
        ));
    }

    output.push_str(&format!("\n{}", analysis.to_string().bold()));
    output
}

/// Handle `voicings [title]` command
pub fn cmd_voicings(args: &str, ctx: &mut CommandContext) -> CommandResult {
    song_for(args, ctx)
        .map(|song| render_song_analysis(&song))
        .into()
}

fn play_voicings(args: &str, ctx: &CommandContext) -> Result<String> {
    let song = song_for(args, ctx)?;
    let voicings: Vec<Vec<i32>> = song
        .voicings()
        .iter()
        .map(|v| v.pitches().to_vec())
        .collect();
    ctx.playback.play(progression_steps(&voicings, &ctx.config))?;
    Ok(format!("▶ Playing voicings of {}", song.title().bright_cyan()))
}

/// Handle `play voicings [title]` command
pub fn cmd_play_voicings(args: &str, ctx: &mut CommandContext) -> CommandResult {
    play_voicings(args, ctx).into()
}
