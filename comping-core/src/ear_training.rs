//! Ear-training questions and scoring
//!
//! Interval questions play two notes and ask for the interval name; chord
//! questions play a seventh chord and ask for its quality. Each question can be
//! answered once. The scoreboard counts every submission as an attempt.

use crate::types::chord::chord_tones;
use crate::types::interval::INTERVALS;
use crate::types::note::{pitch_to_note_name, NoteName, Pitch, REFERENCE_OCTAVE};
use crate::types::quality::PRACTICE_QUALITIES;
use anyhow::{bail, Result};
use num_rational::Ratio;
use num_traits::Zero;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QuestionKind {
    Interval,
    Chord,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QuestionState {
    Unanswered,
    Answered { choice: String, correct: bool },
}

/// A single quiz question. Terminal once answered.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Question {
    pub kind: QuestionKind,
    pub root: NoteName,
    /// Pitches to play, lowest first
    pub pitches: Vec<Pitch>,
    pub answer: String,
    pub options: Vec<String>,
    state: QuestionState,
}

impl Question {
    fn new(kind: QuestionKind, root: NoteName, pitches: Vec<Pitch>, answer: &str, options: Vec<String>) -> Self {
        Question {
            kind,
            root,
            pitches,
            answer: answer.to_string(),
            options,
            state: QuestionState::Unanswered,
        }
    }

    pub fn state(&self) -> &QuestionState {
        &self.state
    }

    pub fn is_answered(&self) -> bool {
        matches!(self.state, QuestionState::Answered { .. })
    }

    pub fn note_names(&self) -> Vec<String> {
        self.pitches.iter().map(|p| pitch_to_note_name(*p)).collect()
    }

    /// Answer the question. Only exact matches count; a second answer is rejected.
    pub fn answer_with(&mut self, choice: &str) -> Result<bool> {
        if let QuestionState::Answered { choice: previous, .. } = &self.state {
            bail!("Question already answered with '{}'", previous);
        }

        let correct = choice == self.answer;
        self.state = QuestionState::Answered {
            choice: choice.to_string(),
            correct,
        };
        Ok(correct)
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prompt = match self.kind {
            QuestionKind::Interval => "Which interval?",
            QuestionKind::Chord => "Which chord quality?",
        };
        write!(f, "{} [{}]", prompt, self.note_names().join(", "))
    }
}

/// Running tally of quiz answers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scoreboard {
    correct: u32,
    attempted: u32,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, correct: bool) {
        self.attempted += 1;
        if correct {
            self.correct += 1;
        }
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }

    pub fn attempted(&self) -> u32 {
        self.attempted
    }

    /// Exact `correct / attempted`, zero before the first answer
    pub fn accuracy(&self) -> Ratio<u32> {
        if self.attempted == 0 {
            return Ratio::zero();
        }
        Ratio::new(self.correct, self.attempted)
    }

    /// Accuracy as a whole percentage, rounded half up
    pub fn accuracy_percent(&self) -> u32 {
        (self.accuracy() * Ratio::from_integer(100)).round().to_integer()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for Scoreboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} correct ({}%)",
            self.correct,
            self.attempted,
            self.accuracy_percent()
        )
    }
}

/// Draws uniformly random questions from the fixed tables
pub struct QuestionGenerator<R: Rng = StdRng> {
    rng: R,
}

impl QuestionGenerator<StdRng> {
    /// Deterministic generator for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> QuestionGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn random_root(&mut self) -> NoteName {
        NoteName::ALL[self.rng.gen_range(0..NoteName::ALL.len())]
    }

    /// Random interval over a random root; options are all 13 interval names
    pub fn interval_question(&mut self) -> Question {
        let interval = INTERVALS[self.rng.gen_range(0..INTERVALS.len())];
        let root = self.random_root();
        let bottom = root.pitch(REFERENCE_OCTAVE);
        let top = bottom + interval.semitones;

        let options = INTERVALS.iter().map(|i| i.name.to_string()).collect();
        Question::new(QuestionKind::Interval, root, vec![bottom, top], interval.name, options)
    }

    /// Random practice quality over a random root; options are the 5 practice qualities
    pub fn chord_question(&mut self) -> Question {
        let quality = &PRACTICE_QUALITIES[self.rng.gen_range(0..PRACTICE_QUALITIES.len())];
        let root = self.random_root();
        let pitches = chord_tones(root, quality);

        let options = PRACTICE_QUALITIES
            .iter()
            .map(|q| q.identifier().to_string())
            .collect();
        Question::new(QuestionKind::Chord, root, pitches, quality.identifier(), options)
    }
}

/// Result of submitting an answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub expected: String,
}

/// Question generator, current question and scoreboard together
pub struct Quiz<R: Rng = StdRng> {
    generator: QuestionGenerator<R>,
    current: Option<Question>,
    score: Scoreboard,
}

impl<R: Rng> Quiz<R> {
    pub fn new(generator: QuestionGenerator<R>) -> Self {
        Self {
            generator,
            current: None,
            score: Scoreboard::new(),
        }
    }

    pub fn next_interval(&mut self) -> &Question {
        self.current.insert(self.generator.interval_question())
    }

    pub fn next_chord(&mut self) -> &Question {
        self.current.insert(self.generator.chord_question())
    }

    pub fn current(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    /// Answer the current question and update the score
    pub fn submit(&mut self, choice: &str) -> Result<AnswerOutcome> {
        let question = match self.current.as_mut() {
            Some(q) => q,
            None => bail!("No question to answer yet"),
        };

        let correct = question.answer_with(choice)?;
        self.score.record(correct);

        Ok(AnswerOutcome {
            correct,
            expected: question.answer.clone(),
        })
    }

    pub fn score(&self) -> &Scoreboard {
        &self.score
    }

    pub fn reset_score(&mut self) {
        self.score.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::interval::Interval;
    use crate::types::note::pitch_class_of;
    use crate::types::quality::ChordQuality;

    #[test]
    fn test_accuracy_starts_at_zero() {
        let score = Scoreboard::new();
        assert_eq!(score.accuracy_percent(), 0);
        assert!(score.accuracy().is_zero());
    }

    #[test]
    fn test_accuracy_half() {
        let mut score = Scoreboard::new();
        score.record(true);
        score.record(false);
        assert_eq!(score.accuracy(), Ratio::new(1, 2));
        assert_eq!(score.accuracy_percent(), 50);
        assert_eq!(score.to_string(), "1/2 correct (50%)");
    }

    #[test]
    fn test_accuracy_rounding() {
        let mut score = Scoreboard::new();
        score.record(true);
        score.record(true);
        score.record(false);
        assert_eq!(score.accuracy_percent(), 67);
    }

    #[test]
    fn test_interval_question_shape() {
        let mut generator = QuestionGenerator::seeded(7);
        for _ in 0..50 {
            let q = generator.interval_question();
            assert_eq!(q.kind, QuestionKind::Interval);
            assert_eq!(q.options.len(), 13);
            assert_eq!(q.options[0], "Perfect Unison");
            assert_eq!(q.pitches.len(), 2);

            let interval = Interval::from_name(&q.answer).unwrap();
            assert_eq!(q.pitches[1] - q.pitches[0], interval.semitones);
            assert_eq!(pitch_class_of(q.pitches[0]), q.root.pitch_class());
            assert!(!q.is_answered());
        }
    }

    #[test]
    fn test_chord_question_shape() {
        let mut generator = QuestionGenerator::seeded(11);
        for _ in 0..50 {
            let q = generator.chord_question();
            assert_eq!(q.options, vec!["maj7", "min7", "7", "min7b5", "dim7"]);
            assert!(q.options.contains(&q.answer));
            assert_eq!(q.pitches, chord_tones(q.root, &ChordQuality::from_suffix(&q.answer)));
        }
    }

    #[test]
    fn test_seeded_generators_agree() {
        let mut a = QuestionGenerator::seeded(42);
        let mut b = QuestionGenerator::seeded(42);
        for _ in 0..10 {
            assert_eq!(a.interval_question(), b.interval_question());
            assert_eq!(a.chord_question(), b.chord_question());
        }
    }

    #[test]
    fn test_question_answers_once() {
        let mut q = QuestionGenerator::seeded(1).interval_question();
        let answer = q.answer.clone();
        assert!(q.answer_with(&answer).unwrap());
        assert!(q.is_answered());
        assert!(q.answer_with(&answer).is_err());
    }

    #[test]
    fn test_quiz_scoring() {
        let mut quiz = Quiz::new(QuestionGenerator::seeded(3));
        assert!(quiz.submit("Octave").is_err());
        assert_eq!(quiz.score().attempted(), 0);

        let answer = quiz.next_chord().answer.clone();
        let outcome = quiz.submit(&answer).unwrap();
        assert!(outcome.correct);

        // Second submission is rejected and not scored
        assert!(quiz.submit(&answer).is_err());
        assert_eq!(quiz.score().attempted(), 1);

        quiz.next_interval();
        let outcome = quiz.submit("not an interval").unwrap();
        assert!(!outcome.correct);
        assert_eq!(quiz.score().accuracy_percent(), 50);
    }
}
