//! MIDI REPL commands

use crate::audio::{ConsoleBackend, MidiBackend};
use crate::commands::{CommandContext, CommandResult};
use anyhow::{anyhow, Result};
use colored::*;

/// Numbered port list, or a hint when there are none
pub fn render_ports(ports: &[String]) -> String {
    if ports.is_empty() {
        return "No MIDI output ports found. Make sure a MIDI device or virtual port is connected."
            .yellow()
            .to_string();
    }
    let mut output = format!("{}\n", "🎹 Available MIDI Output Ports:".bold());
    for (i, port) in ports.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, port.cyan()));
    }
    output.push_str(&format!(
        "\n{} {}",
        "Use".dimmed(),
        "midi connect <port name>".green()
    ));
    output
}

/// Handle `midi ports` command - list available MIDI output ports
pub fn cmd_midi_ports(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    match MidiBackend::list_ports() {
        Ok(ports) => CommandResult::Message(render_ports(&ports)),
        Err(e) => CommandResult::Error(format!("Failed to list MIDI ports: {}", e)),
    }
}

fn connect(args: &str, ctx: &mut CommandContext) -> Result<String> {
    let config = ctx.midi.clone().with_port(args);
    let port = MidiBackend::find_port(&config)?;
    ctx.playback.use_backend(Box::new(MidiBackend::new(
        port.clone(),
        config.clone(),
        ctx.tempo.clone(),
    )))?;
    ctx.midi = config;
    Ok(format!("🎹 Connected to MIDI port: {}", port.green()))
}

/// Handle `midi connect <port>` command - switch playback to a MIDI output port
pub fn cmd_midi_connect(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error(
            "Usage: midi connect <port name>\nUse 'midi ports' to see available ports".to_string(),
        );
    }
    connect(args, ctx).into()
}

fn set_channel(args: &str, ctx: &mut CommandContext) -> Result<String> {
    let channel: u8 = args
        .parse()
        .map_err(|_| anyhow!("Invalid channel '{}'. Use 1-16", args))?;
    ctx.midi = ctx.midi.clone().with_channel(channel)?;
    Ok(format!(
        "🎹 MIDI channel set to {} {}",
        channel.to_string().green(),
        "(applies from the next 'midi connect')".dimmed()
    ))
}

/// Handle `midi channel [n]` command
pub fn cmd_midi_channel(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!("MIDI channel: {}", ctx.midi.channel + 1));
    }
    set_channel(args, ctx).into()
}

/// Handle `midi console` command - print notes instead of sending them
pub fn cmd_midi_console(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    match ctx.playback.use_backend(Box::new(ConsoleBackend::new())) {
        Ok(()) => CommandResult::Message("🎹 Printing notes to the console".to_string()),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{context, message};

    #[test]
    fn test_render_ports() {
        colored::control::set_override(false);
        let ports = vec!["IAC Driver Bus 1".to_string(), "FluidSynth".to_string()];
        let output = render_ports(&ports);
        assert!(output.contains("1. IAC Driver Bus 1"));
        assert!(output.contains("2. FluidSynth"));
        assert!(render_ports(&[]).contains("No MIDI output ports"));
    }

    #[test]
    fn test_channel() {
        let mut ctx = context();
        assert!(message(cmd_midi_channel("", &mut ctx)).contains("1"));
        message(cmd_midi_channel("10", &mut ctx));
        assert_eq!(ctx.midi.channel, 9);

        assert!(matches!(cmd_midi_channel("0", &mut ctx), CommandResult::Error(_)));
        assert!(matches!(cmd_midi_channel("17", &mut ctx), CommandResult::Error(_)));
        assert!(matches!(cmd_midi_channel("drums", &mut ctx), CommandResult::Error(_)));
        assert_eq!(ctx.midi.channel, 9);
    }

    #[test]
    fn test_connect_requires_port() {
        let mut ctx = context();
        assert!(matches!(cmd_midi_connect("", &mut ctx), CommandResult::Error(_)));
    }

    #[test]
    fn test_console_fallback() {
        let mut ctx = context();
        message(cmd_midi_console("", &mut ctx));
    }
}
