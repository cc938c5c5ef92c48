//! MIDI output backend
//!
//! Sends note-on/note-off to an external synthesizer through midir. The
//! connection lives on its own thread and is driven by a command channel;
//! note-offs are sent by a short-lived timer thread once the note value has
//! elapsed at the shared tempo. Sounding notes are tracked with the generation
//! of their latest note-on, so a timer never releases a note that was struck
//! again after it started.

use crate::audio::SharedTempo;
use anyhow::{anyhow, bail, Result};
use comping_core::types::note::{note_name_to_pitch, Pitch};
use comping_core::types::NoteValue;
use comping_core::AudioBackend;
use log::{info, warn};
use midir::{MidiOutput, MidiOutputConnection};
use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const CLIENT_NAME: &str = "comping";

pub const DEFAULT_VELOCITY: u8 = 90;

/// Clamp a pitch into the MIDI note range (0-127)
pub fn pitch_to_midi(pitch: Pitch) -> u8 {
    pitch.clamp(0, 127) as u8
}

/// Which port to use and how to play on it
#[derive(Clone, Debug, PartialEq)]
pub struct MidiConfig {
    /// Substring of the port name; `None` picks the first port
    pub port_filter: Option<String>,
    /// Channel, 0-indexed (0-15)
    pub channel: u8,
    pub velocity: u8,
}

impl MidiConfig {
    pub fn new() -> Self {
        Self {
            port_filter: None,
            channel: 0,
            velocity: DEFAULT_VELOCITY,
        }
    }

    pub fn with_port(mut self, filter: &str) -> Self {
        let filter = filter.trim();
        self.port_filter = (!filter.is_empty()).then(|| filter.to_string());
        self
    }

    /// Set the channel from its 1-16 display number
    pub fn with_channel(mut self, channel: u8) -> Result<Self> {
        if !(1..=16).contains(&channel) {
            bail!("Channel must be 1-16");
        }
        self.channel = channel - 1;
        Ok(self)
    }

    pub fn with_velocity(mut self, velocity: u8) -> Self {
        self.velocity = velocity.clamp(1, 127);
        self
    }
}

impl Default for MidiConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Commands that can be sent to the MIDI output thread
#[derive(Debug)]
enum MidiCommand {
    Connect {
        port_name: String,
        reply: Sender<Result<()>>,
    },
    NoteOn { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8, note: u8 },
    AllNotesOff { channel: u8 },
    Shutdown,
}

/// Owns the connection on the MIDI thread
struct MidiOutputInternal {
    connection: Option<MidiOutputConnection>,
    command_rx: Receiver<MidiCommand>,
}

impl MidiOutputInternal {
    fn new(command_rx: Receiver<MidiCommand>) -> Self {
        Self {
            connection: None,
            command_rx,
        }
    }

    fn connect(&mut self, port_name: &str) -> Result<()> {
        let midi_out = MidiOutput::new(CLIENT_NAME)?;
        let ports = midi_out.ports();
        let port = ports
            .iter()
            .find(|p| midi_out.port_name(p).is_ok_and(|name| name == port_name))
            .ok_or_else(|| anyhow!("MIDI port '{}' not found", port_name))?;

        let connection = midi_out
            .connect(port, "comping-out")
            .map_err(|e| anyhow!("Failed to connect to '{}': {}", port_name, e))?;
        self.connection = Some(connection);
        info!("MIDI connected to {}", port_name);
        Ok(())
    }

    fn send(&mut self, message: &[u8]) {
        if let Some(conn) = &mut self.connection {
            if let Err(e) = conn.send(message) {
                warn!("MIDI send failed: {}", e);
            }
        }
    }

    fn run(&mut self) {
        while let Ok(cmd) = self.command_rx.recv() {
            match cmd {
                MidiCommand::Connect { port_name, reply } => {
                    let _ = reply.send(self.connect(&port_name));
                }
                MidiCommand::NoteOn {
                    channel,
                    note,
                    velocity,
                } => self.send(&[0x90 | (channel & 0x0F), note & 0x7F, velocity & 0x7F]),
                MidiCommand::NoteOff { channel, note } => {
                    self.send(&[0x80 | (channel & 0x0F), note & 0x7F, 0])
                }
                // All Notes Off: CC 123
                MidiCommand::AllNotesOff { channel } => self.send(&[0xB0 | (channel & 0x0F), 123, 0]),
                MidiCommand::Shutdown => {
                    for ch in 0..16u8 {
                        self.send(&[0xB0 | ch, 123, 0]);
                    }
                    break;
                }
            }
        }
    }
}

/// Generation of the latest note-on for each sounding `(channel, note)`
#[derive(Debug, Default)]
struct ActiveNotes {
    generations: HashMap<(u8, u8), u64>,
    next_generation: u64,
}

/// Audio backend that plays on an external MIDI synthesizer
pub struct MidiBackend {
    command_tx: Sender<MidiCommand>,
    _thread: Option<JoinHandle<()>>,
    /// Held while a note-on or a note-off is sent, so the two never interleave
    active_notes: Arc<Mutex<ActiveNotes>>,
    port_name: String,
    config: MidiConfig,
    tempo: SharedTempo,
}

impl MidiBackend {
    /// Backend for `port_name`; the port is opened by [`AudioBackend::start`]
    pub fn new(port_name: String, config: MidiConfig, tempo: SharedTempo) -> Self {
        let (tx, rx) = channel();
        let thread = thread::spawn(move || MidiOutputInternal::new(rx).run());
        Self::with_sender(tx, Some(thread), port_name, config, tempo)
    }

    fn with_sender(
        command_tx: Sender<MidiCommand>,
        thread: Option<JoinHandle<()>>,
        port_name: String,
        config: MidiConfig,
        tempo: SharedTempo,
    ) -> Self {
        Self {
            command_tx,
            _thread: thread,
            active_notes: Arc::new(Mutex::new(ActiveNotes::default())),
            port_name,
            config,
            tempo,
        }
    }

    /// List available MIDI output ports.
    /// Creating the client can fail transiently on macOS, so retry a few times.
    pub fn list_ports() -> Result<Vec<String>> {
        let mut last_err = None;
        for attempt in 0..3 {
            if attempt > 0 {
                thread::sleep(Duration::from_millis(100));
            }
            match MidiOutput::new(CLIENT_NAME) {
                Ok(midi_out) => {
                    return Ok(midi_out
                        .ports()
                        .iter()
                        .filter_map(|p| midi_out.port_name(p).ok())
                        .collect());
                }
                Err(e) => last_err = Some(e),
            }
        }
        Err(anyhow!(
            "MIDI initialization failed after 3 attempts: {:?}",
            last_err
        ))
    }

    /// Name of the first port matching the config filter
    pub fn find_port(config: &MidiConfig) -> Result<String> {
        let ports = Self::list_ports()?;
        select_port(&ports, config.port_filter.as_deref())
            .map(str::to_string)
            .ok_or_else(|| match &config.port_filter {
                Some(filter) => anyhow!("No MIDI output port matching '{}'", filter),
                None => anyhow!("No MIDI output ports found"),
            })
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    fn send(&self, cmd: MidiCommand) -> Result<()> {
        self.command_tx
            .send(cmd)
            .map_err(|e| anyhow!("MIDI thread is gone: {}", e))
    }

    fn midi_notes(names: &[String]) -> Result<Vec<u8>> {
        names
            .iter()
            .map(|name| {
                note_name_to_pitch(name)
                    .map(pitch_to_midi)
                    .ok_or_else(|| anyhow!("Not a note name: {}", name))
            })
            .collect()
    }

    fn sound(&self, notes: Vec<u8>, value: NoteValue) -> Result<()> {
        let channel = self.config.channel;
        let generation = {
            let mut active = self
                .active_notes
                .lock()
                .map_err(|_| anyhow!("MIDI note table poisoned"))?;
            active.next_generation += 1;
            let generation = active.next_generation;
            for &note in &notes {
                active.generations.insert((channel, note), generation);
                self.send(MidiCommand::NoteOn {
                    channel,
                    note,
                    velocity: self.config.velocity,
                })?;
            }
            generation
        };

        let hold = Duration::from_millis(value.millis(self.tempo.get()));
        let tx = self.command_tx.clone();
        let active_notes = Arc::clone(&self.active_notes);
        thread::spawn(move || {
            thread::sleep(hold);
            let Ok(mut active) = active_notes.lock() else {
                return;
            };
            for note in notes {
                // Struck again since: the newer note-on owns the release
                if active.generations.get(&(channel, note)) != Some(&generation) {
                    continue;
                }
                active.generations.remove(&(channel, note));
                let _ = tx.send(MidiCommand::NoteOff { channel, note });
            }
        });
        Ok(())
    }
}

/// First port containing `filter`, or the first port when there is no filter
pub fn select_port<'a>(ports: &'a [String], filter: Option<&str>) -> Option<&'a str> {
    let port = match filter {
        Some(filter) => ports.iter().find(|p| p.contains(filter)),
        None => ports.first(),
    };
    port.map(String::as_str)
}

impl AudioBackend for MidiBackend {
    /// Opens the port on the MIDI thread and waits for the outcome
    fn start(&mut self) -> Result<()> {
        let (reply_tx, reply_rx) = channel();
        self.send(MidiCommand::Connect {
            port_name: self.port_name.clone(),
            reply: reply_tx,
        })?;
        reply_rx
            .recv()
            .map_err(|_| anyhow!("MIDI thread stopped before connecting"))?
    }

    fn play_note(&mut self, note: &str, value: NoteValue) -> Result<()> {
        let notes = Self::midi_notes(&[note.to_string()])?;
        self.sound(notes, value)
    }

    fn play_chord(&mut self, notes: &[String], value: NoteValue) -> Result<()> {
        let notes = Self::midi_notes(notes)?;
        self.sound(notes, value)
    }

    fn silence(&mut self) -> Result<()> {
        let channel = self.config.channel;
        let mut active = self
            .active_notes
            .lock()
            .map_err(|_| anyhow!("MIDI note table poisoned"))?;
        active.generations.retain(|(ch, _), _| *ch != channel);
        self.send(MidiCommand::AllNotesOff { channel })
    }
}

impl Drop for MidiBackend {
    fn drop(&mut self) {
        let _ = self.command_tx.send(MidiCommand::Shutdown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comping_core::audio::AudioEngine;

    #[test]
    fn test_pitch_to_midi() {
        assert_eq!(pitch_to_midi(60), 60);
        assert_eq!(pitch_to_midi(-3), 0);
        assert_eq!(pitch_to_midi(140), 127);
    }

    #[test]
    fn test_midi_notes_from_names() {
        let names = vec!["A3".to_string(), "D4".to_string(), "Bb4".to_string()];
        assert_eq!(MidiBackend::midi_notes(&names).unwrap(), vec![57, 62, 70]);
        assert!(MidiBackend::midi_notes(&["X9".to_string()]).is_err());
    }

    #[test]
    fn test_select_port() {
        let ports = vec!["IAC Driver Bus 1".to_string(), "FluidSynth".to_string()];
        assert_eq!(select_port(&ports, None), Some("IAC Driver Bus 1"));
        assert_eq!(select_port(&ports, Some("Fluid")), Some("FluidSynth"));
        assert_eq!(select_port(&ports, Some("Yamaha")), None);
        assert_eq!(select_port(&[], None), None);
    }

    #[test]
    fn test_config_channel_and_velocity() {
        let config = MidiConfig::new()
            .with_port("  ")
            .with_channel(10)
            .unwrap()
            .with_velocity(200);
        assert_eq!(config.port_filter, None);
        assert_eq!(config.channel, 9);
        assert_eq!(config.velocity, 127);
        assert!(MidiConfig::new().with_channel(0).is_err());
        assert!(MidiConfig::new().with_channel(17).is_err());
    }

    fn backend_over_channel() -> (MidiBackend, Receiver<MidiCommand>) {
        let (tx, rx) = channel();
        let backend = MidiBackend::with_sender(
            tx,
            None,
            "test".into(),
            MidiConfig::new(),
            SharedTempo::new(400.0),
        );
        (backend, rx)
    }

    /// `(is_note_on, note)` for every note message received so far
    fn note_events(rx: &Receiver<MidiCommand>) -> Vec<(bool, u8)> {
        rx.try_iter()
            .filter_map(|cmd| match cmd {
                MidiCommand::NoteOn { note, .. } => Some((true, note)),
                MidiCommand::NoteOff { note, .. } => Some((false, note)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_note_off_after_value() {
        let (mut backend, rx) = backend_over_channel();
        // A sixteenth at 400 BPM lasts 38ms
        backend.play_note("E4", NoteValue::Sixteenth).unwrap();
        thread::sleep(Duration::from_millis(150));
        assert_eq!(note_events(&rx), vec![(true, 64), (false, 64)]);
    }

    #[test]
    fn test_restruck_note_is_not_cut_short() {
        let (mut backend, rx) = backend_over_channel();
        backend.play_note("G4", NoteValue::Sixteenth).unwrap();
        // Half note at 400 BPM: 300ms
        backend
            .play_chord(&["C4".to_string(), "G4".to_string()], NoteValue::Half)
            .unwrap();

        thread::sleep(Duration::from_millis(150));
        let mut events = note_events(&rx);
        assert_eq!(events, vec![(true, 67), (true, 60), (true, 67)]);

        thread::sleep(Duration::from_millis(350));
        events.extend(note_events(&rx));
        let g4_offs: Vec<usize> = events
            .iter()
            .enumerate()
            .filter(|(_, e)| **e == (false, 67))
            .map(|(i, _)| i)
            .collect();
        let last_g4_on = events.iter().rposition(|e| *e == (true, 67)).unwrap();
        assert_eq!(g4_offs.len(), 1);
        assert!(g4_offs[0] > last_g4_on);
        assert!(events.contains(&(false, 60)));
    }

    #[test]
    fn test_silence_cancels_pending_note_offs() {
        let (mut backend, rx) = backend_over_channel();
        backend.play_note("C4", NoteValue::Sixteenth).unwrap();
        backend.silence().unwrap();
        thread::sleep(Duration::from_millis(150));

        let commands: Vec<MidiCommand> = rx.try_iter().collect();
        assert!(commands
            .iter()
            .any(|c| matches!(c, MidiCommand::AllNotesOff { channel: 0 })));
        assert!(!commands
            .iter()
            .any(|c| matches!(c, MidiCommand::NoteOff { .. })));
    }

    /// A MIDI thread stand-in that answers every connect with `outcome`
    fn answering_backend(ok: bool) -> (MidiBackend, JoinHandle<()>) {
        let (tx, rx) = channel::<MidiCommand>();
        let responder = thread::spawn(move || {
            for cmd in rx {
                if let MidiCommand::Connect { reply, .. } = cmd {
                    let outcome = if ok { Ok(()) } else { Err(anyhow!("port vanished")) };
                    let _ = reply.send(outcome);
                }
            }
        });
        let backend =
            MidiBackend::with_sender(tx, None, "gone".into(), MidiConfig::new(), SharedTempo::new(120.0));
        (backend, responder)
    }

    #[test]
    fn test_failed_connect_leaves_engine_stopped() {
        let (backend, responder) = answering_backend(false);
        let mut engine = AudioEngine::new(backend);
        let err = engine.start().unwrap_err();
        assert!(err.to_string().contains("port vanished"));
        assert!(!engine.is_started());
        assert!(!engine.play_note("C4", NoteValue::Quarter).unwrap());

        drop(engine);
        responder.join().unwrap();
    }

    #[test]
    fn test_connect_starts_engine() {
        let (backend, responder) = answering_backend(true);
        let mut engine = AudioEngine::new(backend);
        engine.start().unwrap();
        assert!(engine.is_started());

        drop(engine);
        responder.join().unwrap();
    }

    #[test]
    fn test_backend_sends_without_port() {
        // No connection yet: messages are accepted and dropped by the MIDI thread
        let mut backend = MidiBackend::new("none".into(), MidiConfig::new(), SharedTempo::new(400.0));
        backend
            .play_chord(&["C4".to_string(), "E4".to_string()], NoteValue::Sixteenth)
            .unwrap();
        backend.silence().unwrap();
        assert_eq!(backend.port_name(), "none");
    }
}
