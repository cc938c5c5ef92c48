//! Chord sequence playback on a dedicated thread
//!
//! The REPL sends commands over a channel; the playback thread owns the audio
//! engine and a [`Sequencer`], sleeping until the next step is due. A new
//! `Play` replaces whatever was still pending.

use crate::audio::BoxedBackend;
use anyhow::{anyhow, Result};
use comping_core::audio::{AudioEngine, SequenceStep, Sequencer};
use comping_core::types::{NoteValue, Pitch};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use log::{debug, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// How long the thread waits for commands when nothing is scheduled
const IDLE_WAIT: Duration = Duration::from_millis(250);

/// Commands that can be sent to the playback engine
pub enum PlaybackCommand {
    /// Play a sequence, cancelling anything pending
    Play(Vec<SequenceStep>),
    /// Cancel pending steps and silence the output
    Stop,
    /// Switch output; the new backend is started on the next play
    UseBackend(BoxedBackend),
    /// Shutdown the playback thread
    Shutdown,
}

enum LoopAction {
    Continue,
    Shutdown,
}

/// Handle to the playback thread
pub struct PlaybackEngine {
    command_tx: Sender<PlaybackCommand>,
    is_playing: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl PlaybackEngine {
    pub fn new(backend: BoxedBackend) -> Self {
        let (tx, rx) = unbounded();
        let is_playing = Arc::new(AtomicBool::new(false));
        let is_playing_clone = is_playing.clone();

        let thread = thread::spawn(move || {
            PlaybackLoop::new(backend, rx, is_playing_clone).run();
        });

        PlaybackEngine {
            command_tx: tx,
            is_playing,
            thread: Some(thread),
        }
    }

    fn send(&self, cmd: PlaybackCommand) -> Result<()> {
        self.command_tx
            .send(cmd)
            .map_err(|_| anyhow!("Failed to send command: playback thread stopped"))
    }

    /// Play a sequence immediately (interrupts any current playback)
    pub fn play(&self, steps: Vec<SequenceStep>) -> Result<()> {
        self.send(PlaybackCommand::Play(steps))
    }

    /// Play a single chord now
    pub fn play_chord(&self, pitches: &[Pitch], value: NoteValue) -> Result<()> {
        self.play(vec![SequenceStep::new(0, pitches, value)])
    }

    pub fn stop(&self) -> Result<()> {
        self.send(PlaybackCommand::Stop)
    }

    pub fn use_backend(&self, backend: BoxedBackend) -> Result<()> {
        self.send(PlaybackCommand::UseBackend(backend))
    }

    /// Whether steps are still pending
    pub fn is_playing(&self) -> bool {
        self.is_playing.load(Ordering::Relaxed)
    }
}

impl Drop for PlaybackEngine {
    fn drop(&mut self) {
        let _ = self.command_tx.send(PlaybackCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Internal playback loop that runs in a dedicated thread
struct PlaybackLoop {
    engine: AudioEngine<BoxedBackend>,
    sequencer: Sequencer,
    command_rx: Receiver<PlaybackCommand>,
    is_playing: Arc<AtomicBool>,
    origin: Instant,
}

impl PlaybackLoop {
    fn new(
        backend: BoxedBackend,
        command_rx: Receiver<PlaybackCommand>,
        is_playing: Arc<AtomicBool>,
    ) -> Self {
        Self {
            engine: AudioEngine::new(backend),
            sequencer: Sequencer::new(),
            command_rx,
            is_playing,
            origin: Instant::now(),
        }
    }

    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn wait_time(&self) -> Duration {
        match self.sequencer.next_due_ms() {
            Some(due) => Duration::from_millis(due.saturating_sub(self.now_ms())),
            None => IDLE_WAIT,
        }
    }

    fn run(&mut self) {
        loop {
            match self.command_rx.recv_timeout(self.wait_time()) {
                Ok(cmd) => {
                    if let LoopAction::Shutdown = self.handle_command(cmd) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            self.fire_due();
        }

        // Clean up
        self.sequencer.cancel();
        let _ = self.engine.silence();
        self.is_playing.store(false, Ordering::Relaxed);
    }

    fn handle_command(&mut self, cmd: PlaybackCommand) -> LoopAction {
        match cmd {
            PlaybackCommand::Play(steps) => {
                // Audio starts on the first play, not when the thread spawns
                if let Err(e) = self.engine.start() {
                    warn!("Could not start audio output: {}", e);
                    return LoopAction::Continue;
                }
                let now = self.now_ms();
                if self.sequencer.play(steps, now) > 0 {
                    let _ = self.engine.silence();
                }
                self.is_playing.store(!self.sequencer.is_idle(), Ordering::Relaxed);
            }
            PlaybackCommand::Stop => {
                self.sequencer.cancel();
                if let Err(e) = self.engine.silence() {
                    warn!("Failed to silence output: {}", e);
                }
                self.is_playing.store(false, Ordering::Relaxed);
            }
            PlaybackCommand::UseBackend(backend) => {
                self.sequencer.cancel();
                let _ = self.engine.silence();
                self.engine = AudioEngine::new(backend);
                self.is_playing.store(false, Ordering::Relaxed);
                debug!("playback backend replaced");
            }
            PlaybackCommand::Shutdown => return LoopAction::Shutdown,
        }
        LoopAction::Continue
    }

    fn fire_due(&mut self) {
        for step in self.sequencer.due(self.now_ms()) {
            if let Err(e) = self.engine.play_step(&step) {
                warn!("Playback error: {}", e);
            }
        }
        if self.sequencer.is_idle() {
            self.is_playing.store(false, Ordering::Relaxed);
        }
    }
}
