//! Ear-training commands

use crate::commands::{CommandContext, CommandResult};
use anyhow::{anyhow, Result};
use colored::*;
use comping_core::audio::SequenceStep;
use comping_core::ear_training::{Question, QuestionKind};
use comping_core::types::{NoteValue, PlaybackConfig};

/// Interval questions play the two notes in turn, then together
pub fn question_steps(question: &Question, config: &PlaybackConfig) -> Vec<SequenceStep> {
    match question.kind {
        QuestionKind::Interval => {
            let beat = NoteValue::Quarter.millis(config.bpm);
            let mut steps: Vec<SequenceStep> = question
                .pitches
                .iter()
                .enumerate()
                .map(|(i, p)| SequenceStep::new(i as u64 * beat, &[*p], NoteValue::Quarter))
                .collect();
            steps.push(SequenceStep::new(
                question.pitches.len() as u64 * beat,
                &question.pitches,
                NoteValue::Half,
            ));
            steps
        }
        QuestionKind::Chord => vec![SequenceStep::new(0, &question.pitches, NoteValue::Half)],
    }
}

/// Prompt and numbered options, without giving the notes away
pub fn render_question(question: &Question) -> String {
    let prompt = match question.kind {
        QuestionKind::Interval => "🎧 Which interval did you hear?",
        QuestionKind::Chord => "🎧 Which chord quality did you hear?",
    };
    let mut output = format!("{}\n", prompt.bold());
    for (i, option) in question.options.iter().enumerate() {
        output.push_str(&format!("  {:>2}. {}\n", i + 1, option.cyan()));
    }
    output.push_str(&format!("{} {}", "Use".dimmed(), "answer <number or name>".green()));
    output
}

/// Map an option number or a case-insensitive option name to the option text
pub fn resolve_choice<'a>(question: &'a Question, input: &'a str) -> &'a str {
    if let Ok(n) = input.parse::<usize>() {
        if let Some(option) = n.checked_sub(1).and_then(|i| question.options.get(i)) {
            return option;
        }
    }
    question
        .options
        .iter()
        .find(|o| o.eq_ignore_ascii_case(input))
        .map(String::as_str)
        .unwrap_or(input)
}

fn ask(ctx: &mut CommandContext, kind: QuestionKind) -> Result<String> {
    let question = match kind {
        QuestionKind::Interval => ctx.quiz.next_interval(),
        QuestionKind::Chord => ctx.quiz.next_chord(),
    };
    ctx.playback.play(question_steps(question, &ctx.config))?;
    Ok(render_question(question))
}

/// Handle `quiz interval` command
pub fn cmd_quiz_interval(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    ask(ctx, QuestionKind::Interval).into()
}

/// Handle `quiz chord` command
pub fn cmd_quiz_chord(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    ask(ctx, QuestionKind::Chord).into()
}

fn replay(ctx: &CommandContext) -> Result<String> {
    let question = ctx
        .quiz
        .current()
        .ok_or_else(|| anyhow!("No question yet. Try 'quiz interval' or 'quiz chord'"))?;
    ctx.playback.play(question_steps(question, &ctx.config))?;
    Ok("🔁 Replaying".dimmed().to_string())
}

/// Handle `quiz replay` command
pub fn cmd_quiz_replay(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    replay(ctx).into()
}

fn answer(args: &str, ctx: &mut CommandContext) -> Result<String> {
    let question = ctx
        .quiz
        .current()
        .ok_or_else(|| anyhow!("No question to answer. Try 'quiz interval' or 'quiz chord'"))?;
    let choice = resolve_choice(question, args).to_string();
    let notes = question.note_names().join(" ");

    let outcome = ctx.quiz.submit(&choice)?;
    let verdict = if outcome.correct {
        format!("✓ Correct! {}", outcome.expected).bright_green()
    } else {
        format!("✗ It was {}", outcome.expected).bright_red()
    };
    Ok(format!(
        "{} {}\n{}",
        verdict,
        format!("({})", notes).dimmed(),
        ctx.quiz.score()
    ))
}

/// Handle `answer <choice>` command
pub fn cmd_answer(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: answer <number or name>".to_string());
    }
    answer(args, ctx).into()
}

/// Handle `score` command
pub fn cmd_score(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Message(format!("🏆 {}", ctx.quiz.score()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{context, message};
    use comping_core::ear_training::QuestionGenerator;

    #[test]
    fn test_resolve_choice() {
        let q = QuestionGenerator::seeded(5).interval_question();
        assert_eq!(resolve_choice(&q, "8"), "Perfect 5th");
        assert_eq!(resolve_choice(&q, "perfect 5TH"), "Perfect 5th");
        assert_eq!(resolve_choice(&q, "0"), "0");
        assert_eq!(resolve_choice(&q, "99"), "99");
        assert_eq!(resolve_choice(&q, "sharp 11"), "sharp 11");
    }

    #[test]
    fn test_interval_steps() {
        let q = QuestionGenerator::seeded(5).interval_question();
        let config = PlaybackConfig::new().with_tempo(120.0).unwrap();
        let steps = question_steps(&q, &config);
        let offsets: Vec<u64> = steps.iter().map(|s| s.offset_ms).collect();
        assert_eq!(offsets, vec![0, 500, 1000]);
        assert_eq!(steps[2].notes.len(), 2);
    }

    #[test]
    fn test_render_hides_notes() {
        let q = QuestionGenerator::seeded(2).chord_question();
        let text = render_question(&q);
        assert!(text.contains("min7b5"));
        for name in q.note_names() {
            assert!(!text.contains(&name));
        }
    }

    #[test]
    fn test_answer_flow() {
        let mut ctx = context();
        assert!(matches!(cmd_answer("1", &mut ctx), CommandResult::Error(_)));
        assert!(matches!(cmd_quiz_replay("", &mut ctx), CommandResult::Error(_)));

        message(cmd_quiz_chord("", &mut ctx));
        let expected = ctx.quiz.current().unwrap().answer.clone();
        let reply = message(cmd_answer(&expected, &mut ctx));
        assert!(reply.contains("Correct"));

        // Already answered
        assert!(matches!(cmd_answer(&expected, &mut ctx), CommandResult::Error(_)));

        message(cmd_quiz_interval("", &mut ctx));
        message(cmd_quiz_replay("", &mut ctx));
        let reply = message(cmd_answer("not an interval", &mut ctx));
        assert!(reply.contains("It was"));

        assert!(message(cmd_score("", &mut ctx)).contains("1/2 correct (50%)"));
    }
}
