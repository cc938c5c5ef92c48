pub mod console;
pub mod midi;
pub mod playback_engine;

pub use console::ConsoleBackend;
pub use midi::{MidiBackend, MidiConfig};
pub use playback_engine::PlaybackEngine;

use comping_core::AudioBackend;
use log::warn;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Tempo shared between the REPL and backends that time their own note-offs
#[derive(Clone, Debug)]
pub struct SharedTempo(Arc<AtomicU32>);

impl SharedTempo {
    pub fn new(bpm: f32) -> Self {
        SharedTempo(Arc::new(AtomicU32::new(bpm.to_bits())))
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub fn set(&self, bpm: f32) {
        self.0.store(bpm.to_bits(), Ordering::Relaxed);
    }
}

/// A backend that can move to the playback thread
pub type BoxedBackend = Box<dyn AudioBackend + Send>;

/// MIDI when an output port matches `config`, the console otherwise
pub fn open_backend(config: &MidiConfig, tempo: &SharedTempo) -> BoxedBackend {
    match MidiBackend::find_port(config) {
        Ok(port) => Box::new(MidiBackend::new(port, config.clone(), tempo.clone())),
        Err(e) => {
            warn!("{}; printing notes to the console instead", e);
            Box::new(ConsoleBackend::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_tempo() {
        let tempo = SharedTempo::new(90.0);
        let other = tempo.clone();
        other.set(132.5);
        assert_eq!(tempo.get(), 132.5);
    }
}
