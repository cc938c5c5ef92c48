//! Audio capability seam
//!
//! The core never produces sound. It hands pitch names and a relative duration
//! to an [`AudioBackend`]; hosts plug in MIDI, a browser synthesizer or a
//! recorder.

pub mod sequencer;

pub use sequencer::{progression_steps, SequenceStep, Sequencer};

use crate::types::audio_config::NoteValue;
use crate::types::note::{pitch_to_note_name, Pitch};
use anyhow::Result;
use log::{debug, info};

/// Something that can sound notes given by name (`"C4"`)
pub trait AudioBackend {
    /// Prepare the output. Called once before the first trigger.
    fn start(&mut self) -> Result<()>;

    fn play_note(&mut self, note: &str, value: NoteValue) -> Result<()>;

    fn play_chord(&mut self, notes: &[String], value: NoteValue) -> Result<()>;

    /// Silence anything still sounding
    fn silence(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<B: AudioBackend + ?Sized> AudioBackend for Box<B> {
    fn start(&mut self) -> Result<()> {
        (**self).start()
    }

    fn play_note(&mut self, note: &str, value: NoteValue) -> Result<()> {
        (**self).play_note(note, value)
    }

    fn play_chord(&mut self, notes: &[String], value: NoteValue) -> Result<()> {
        (**self).play_chord(notes, value)
    }

    fn silence(&mut self) -> Result<()> {
        (**self).silence()
    }
}

/// Owns a backend and gates triggers on an explicit start.
///
/// Triggers issued before [`AudioEngine::start`] are dropped, not queued.
pub struct AudioEngine<B: AudioBackend> {
    backend: B,
    started: bool,
}

impl<B: AudioBackend> AudioEngine<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            started: false,
        }
    }

    /// Start the backend. Safe to call repeatedly.
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            return Ok(());
        }
        self.backend.start()?;
        self.started = true;
        info!("audio engine started");
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Returns whether the note was actually sent to the backend
    pub fn play_note(&mut self, note: &str, value: NoteValue) -> Result<bool> {
        if !self.started {
            debug!("engine not started, dropping note {}", note);
            return Ok(false);
        }
        self.backend.play_note(note, value)?;
        Ok(true)
    }

    pub fn play_chord(&mut self, notes: &[String], value: NoteValue) -> Result<bool> {
        if !self.started {
            debug!("engine not started, dropping chord {:?}", notes);
            return Ok(false);
        }
        self.backend.play_chord(notes, value)?;
        Ok(true)
    }

    /// Play MIDI pitches as a chord
    pub fn play_pitches(&mut self, pitches: &[Pitch], value: NoteValue) -> Result<bool> {
        let names: Vec<String> = pitches.iter().map(|p| pitch_to_note_name(*p)).collect();
        self.play_chord(&names, value)
    }

    /// Trigger a sequencer step
    pub fn play_step(&mut self, step: &SequenceStep) -> Result<bool> {
        match step.notes.as_slice() {
            [single] => self.play_note(single, step.value),
            notes => self.play_chord(notes, step.value),
        }
    }

    pub fn silence(&mut self) -> Result<()> {
        if self.started {
            self.backend.silence()?;
        }
        Ok(())
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

/// A trigger captured by [`RecordingBackend`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    Note(String, NoteValue),
    Chord(Vec<String>, NoteValue),
    Silence,
}

/// Backend that records triggers instead of sounding them
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub starts: usize,
    pub triggers: Vec<Trigger>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioBackend for RecordingBackend {
    fn start(&mut self) -> Result<()> {
        self.starts += 1;
        Ok(())
    }

    fn play_note(&mut self, note: &str, value: NoteValue) -> Result<()> {
        self.triggers.push(Trigger::Note(note.to_string(), value));
        Ok(())
    }

    fn play_chord(&mut self, notes: &[String], value: NoteValue) -> Result<()> {
        self.triggers.push(Trigger::Chord(notes.to_vec(), value));
        Ok(())
    }

    fn silence(&mut self) -> Result<()> {
        self.triggers.push(Trigger::Silence);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triggers_before_start_are_dropped() {
        let mut engine = AudioEngine::new(RecordingBackend::new());
        assert!(!engine.play_note("C4", NoteValue::Quarter).unwrap());
        assert!(!engine.play_pitches(&[60, 64, 67], NoteValue::Half).unwrap());
        engine.silence().unwrap();
        assert!(engine.backend().triggers.is_empty());
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut engine = AudioEngine::new(RecordingBackend::new());
        engine.start().unwrap();
        engine.start().unwrap();
        assert!(engine.is_started());
        assert_eq!(engine.backend().starts, 1);
    }

    #[test]
    fn test_pitches_sent_by_name() {
        let mut engine = AudioEngine::new(RecordingBackend::new());
        engine.start().unwrap();
        assert!(engine.play_pitches(&[60, 64, 67, 71], NoteValue::Half).unwrap());
        assert_eq!(
            engine.backend().triggers,
            vec![Trigger::Chord(
                vec!["C4".into(), "E4".into(), "G4".into(), "B4".into()],
                NoteValue::Half
            )]
        );
    }

    #[test]
    fn test_single_note_step_plays_note() {
        let mut engine = AudioEngine::new(RecordingBackend::new());
        engine.start().unwrap();
        engine
            .play_step(&SequenceStep::new(0, &[69], NoteValue::Eighth))
            .unwrap();
        assert_eq!(
            engine.backend().triggers,
            vec![Trigger::Note("A4".into(), NoteValue::Eighth)]
        );
    }
}
