//! Cancelable chord sequencing on a caller-supplied clock
//!
//! The sequencer never reads a clock itself. Callers pass the current time in
//! milliseconds, so the same schedule drives a native thread, a browser timer
//! or a test.

use crate::types::audio_config::{NoteValue, PlaybackConfig};
use crate::types::note::{pitch_to_note_name, Pitch};
use log::debug;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// One chord trigger, relative to the start of its sequence
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SequenceStep {
    pub offset_ms: u64,
    pub notes: Vec<String>,
    pub value: NoteValue,
}

impl SequenceStep {
    pub fn new(offset_ms: u64, pitches: &[Pitch], value: NoteValue) -> Self {
        Self {
            offset_ms,
            notes: pitches.iter().map(|p| pitch_to_note_name(*p)).collect(),
            value,
        }
    }
}

/// Lay chords out back to back at the configured tempo, repeated `config.repeats` times
pub fn progression_steps(chords: &[Vec<Pitch>], config: &PlaybackConfig) -> Vec<SequenceStep> {
    let step = config.step_millis();
    chords
        .iter()
        .cycle()
        .take(chords.len() * config.repeats)
        .enumerate()
        .map(|(i, pitches)| SequenceStep::new(i as u64 * step, pitches, config.chord_value))
        .collect()
}

/// A step with its absolute due time
#[derive(Debug, Clone, PartialEq, Eq)]
struct Scheduled {
    due_ms: u64,
    order: usize,
    step: SequenceStep,
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behavior (earliest first, then insertion order)
        other
            .due_ms
            .cmp(&self.due_ms)
            .then_with(|| other.order.cmp(&self.order))
    }
}

/// Pending chord triggers. Starting a new sequence cancels the old one, so
/// two sequences never overlap.
#[derive(Debug, Default)]
pub struct Sequencer {
    pending: BinaryHeap<Scheduled>,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever is pending with `steps`, starting at `now_ms`.
    /// Returns how many old steps were cancelled.
    pub fn play(&mut self, steps: Vec<SequenceStep>, now_ms: u64) -> usize {
        let cancelled = self.cancel();
        self.pending = steps
            .into_iter()
            .enumerate()
            .map(|(order, step)| Scheduled {
                due_ms: now_ms + step.offset_ms,
                order,
                step,
            })
            .collect();
        cancelled
    }

    /// Drop every pending step
    pub fn cancel(&mut self) -> usize {
        let cancelled = self.pending.len();
        if cancelled > 0 {
            debug!("cancelling {} pending steps", cancelled);
        }
        self.pending.clear();
        cancelled
    }

    /// Pop every step due at or before `now_ms`, earliest first
    pub fn due(&mut self, now_ms: u64) -> Vec<SequenceStep> {
        let mut ready = Vec::new();
        while self.pending.peek().is_some_and(|s| s.due_ms <= now_ms) {
            if let Some(scheduled) = self.pending.pop() {
                ready.push(scheduled.step);
            }
        }
        ready
    }

    /// When the next step is due, if any
    pub fn next_due_ms(&self) -> Option<u64> {
        self.pending.peek().map(|s| s.due_ms)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PlaybackConfig {
        PlaybackConfig::new()
            .with_tempo(120.0)
            .unwrap()
            .with_chord_value(NoteValue::Half)
    }

    #[test]
    fn test_progression_steps_timing() {
        let chords = vec![vec![62, 65, 69, 72], vec![67, 71, 74, 77]];
        let steps = progression_steps(&chords, &config().with_repeats(2));

        let offsets: Vec<u64> = steps.iter().map(|s| s.offset_ms).collect();
        assert_eq!(offsets, vec![0, 1000, 2000, 3000]);
        assert_eq!(steps[0].notes, vec!["D4", "F4", "A4", "C5"]);
        assert_eq!(steps[2].notes, steps[0].notes);
        assert_eq!(steps[1].value, NoteValue::Half);
    }

    #[test]
    fn test_due_pops_in_order() {
        let chords = vec![vec![60], vec![62], vec![64]];
        let mut seq = Sequencer::new();
        seq.play(progression_steps(&chords, &config()), 500);

        assert_eq!(seq.next_due_ms(), Some(500));
        assert!(seq.due(499).is_empty());

        let first = seq.due(500);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].notes, vec!["C4"]);

        let rest = seq.due(10_000);
        let names: Vec<&str> = rest.iter().map(|s| s.notes[0].as_str()).collect();
        assert_eq!(names, vec!["D4", "E4"]);
        assert!(seq.is_idle());
    }

    #[test]
    fn test_play_cancels_previous_sequence() {
        let mut seq = Sequencer::new();
        let first = progression_steps(&[vec![60], vec![62], vec![64]], &config());
        let second = progression_steps(&[vec![72], vec![74]], &config());

        seq.play(first, 0);
        assert_eq!(seq.due(0).len(), 1);

        let cancelled = seq.play(second, 100);
        assert_eq!(cancelled, 2);
        assert_eq!(seq.pending(), 2);

        let all = seq.due(u64::MAX);
        assert!(all.iter().all(|s| s.notes[0].ends_with('5')));
    }

    #[test]
    fn test_cancel_clears_everything() {
        let mut seq = Sequencer::new();
        seq.play(progression_steps(&[vec![60], vec![62]], &config()), 0);
        assert_eq!(seq.cancel(), 2);
        assert!(seq.due(u64::MAX).is_empty());
        assert_eq!(seq.next_due_ms(), None);
    }

    #[test]
    fn test_simultaneous_steps_keep_order() {
        let steps = vec![
            SequenceStep::new(0, &[60], NoteValue::Quarter),
            SequenceStep::new(0, &[64], NoteValue::Quarter),
            SequenceStep::new(0, &[67], NoteValue::Quarter),
        ];
        let mut seq = Sequencer::new();
        seq.play(steps, 0);
        let names: Vec<String> = seq.due(0).into_iter().map(|s| s.notes[0].clone()).collect();
        assert_eq!(names, vec!["C4", "E4", "G4"]);
    }
}
