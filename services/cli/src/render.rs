use crate::infra::option_label;
use safety_quiz::assessment::{
    CategoryScore, Difficulty, ExamOutcome, InlineFeedback, Question, QuestionReview,
    ReviewFilter,
};
use safety_quiz::content::ContentLibrary;
use safety_quiz::error::AppError;
use serde::Serialize;
use std::io::{self, Write};

/// JSON shape printed by `exam --json`.
#[derive(Debug, Serialize)]
pub(crate) struct ExamReport<'a> {
    #[serde(flatten)]
    pub(crate) outcome: &'a ExamOutcome,
    pub(crate) categories: Vec<CategoryScore>,
}

pub(crate) fn render_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<(), AppError> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

pub(crate) fn render_banks<W: Write>(out: &mut W, library: &ContentLibrary) -> io::Result<()> {
    writeln!(out, "Question banks")?;
    for entry in library.entries() {
        writeln!(
            out,
            "- {} | {} | {} questions | exam {} of {} in {} min, pass {}% | {} inline checks",
            entry.key,
            entry.title,
            entry.bank.len(),
            entry.exam.total_questions,
            entry.bank.len(),
            entry.exam.time_limit_secs / 60,
            entry.exam.pass_threshold,
            entry.inline_check_count()
        )?;
    }
    Ok(())
}

pub(crate) fn render_question<W: Write>(
    out: &mut W,
    heading: &str,
    question: &Question,
) -> io::Result<()> {
    let tags: Vec<&str> = question
        .category()
        .into_iter()
        .chain(question.difficulty().map(Difficulty::label))
        .collect();
    if tags.is_empty() {
        writeln!(out, "\n{heading}")?;
    } else {
        writeln!(out, "\n{heading} [{}]", tags.join(" | "))?;
    }
    writeln!(out, "{}", question.prompt())?;
    for (index, option) in question.options().iter().enumerate() {
        writeln!(out, "  {}) {}", option_label(index), option)?;
    }
    Ok(())
}

pub(crate) fn render_feedback<W: Write>(out: &mut W, feedback: &InlineFeedback) -> io::Result<()> {
    if feedback.was_correct {
        writeln!(out, "Correct.")?;
    } else {
        writeln!(
            out,
            "Not quite. The answer is {}.",
            option_label(feedback.correct_index)
        )?;
    }
    writeln!(out, "{}", feedback.explanation)
}

pub(crate) fn render_outcome<W: Write>(
    out: &mut W,
    outcome: &ExamOutcome,
    filter: ReviewFilter,
) -> io::Result<()> {
    let result = &outcome.result;
    writeln!(out, "\n{} results", outcome.exam_title)?;
    writeln!(
        out,
        "Score: {}/{} ({}%) | pass mark {}% | {}",
        result.correct_count,
        result.total_questions,
        outcome.score_percent,
        outcome.pass_threshold,
        if outcome.passed { "PASSED" } else { "NOT PASSED" }
    )?;
    writeln!(
        out,
        "Answered {} | incorrect {} | unanswered {}",
        result.answered_count,
        result.incorrect_count(),
        result.unanswered_count()
    )?;
    writeln!(
        out,
        "Time: {}m {:02}s{}",
        outcome.elapsed_secs / 60,
        outcome.elapsed_secs % 60,
        if outcome.within_time_limit {
            ""
        } else {
            " (over the time limit)"
        }
    )?;

    writeln!(out, "\nBy category")?;
    for score in result.category_breakdown() {
        writeln!(
            out,
            "- {}: {}/{} ({}%)",
            score.category,
            score.correct,
            score.total,
            score.percent()
        )?;
    }

    let reviews = result.filtered(filter);
    writeln!(out, "\nReview ({} shown)", reviews.len())?;
    for review in reviews {
        render_review(out, review)?;
    }
    Ok(())
}

fn render_review<W: Write>(out: &mut W, review: &QuestionReview) -> io::Result<()> {
    let flag = if review.flagged { " [flagged]" } else { "" };
    writeln!(
        out,
        "- Q{} {}{}: {}",
        review.question_id,
        review.status().label(),
        flag,
        review.prompt
    )?;
    if let Some(selected) = review.selected {
        if !review.was_correct {
            writeln!(out, "    your answer: {}", option_text(review, selected))?;
        }
    }
    writeln!(
        out,
        "    correct answer: {}",
        option_text(review, review.correct_index)
    )?;
    if !review.explanation.is_empty() {
        writeln!(out, "    {}", review.explanation)?;
    }
    Ok(())
}

fn option_text(review: &QuestionReview, index: usize) -> String {
    match review.options.get(index) {
        Some(text) => format!("{}) {}", option_label(index), text),
        None => option_label(index).to_string(),
    }
}
