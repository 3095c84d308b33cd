use crate::infra::{option_label, parse_choice, AnswerScript};
use crate::render::{render_feedback, render_question};
use chrono::{DateTime, Utc};
use safety_quiz::assessment::{
    ExamOutcome, ExamSession, InlineCheck, InlineFeedback, QuestionBank, SelectionState,
    UnansweredPolicy, UsageError,
};
use safety_quiz::error::AppError;
use std::io::{BufRead, Write};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reply {
    Choice(usize),
    Skip,
    Flag,
    Submit,
    Invalid,
}

impl Reply {
    fn parse(line: &str, options: usize) -> Self {
        match line.trim().to_ascii_lowercase().as_str() {
            "" | "-" => Self::Skip,
            "!" => Self::Flag,
            "q" => Self::Submit,
            token => match parse_choice(token) {
                Some(index) if index < options => Self::Choice(index),
                _ => Self::Invalid,
            },
        }
    }
}

fn prompt_hint(options: usize) -> String {
    let last = option_label(options.saturating_sub(1));
    format!("Answer A-{last}, - to skip, ! to flag, q to submit: ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoundEnd {
    Finished,
    Submit,
    EndOfInput,
}

fn unanswered_positions(session: &ExamSession, paper: &QuestionBank) -> Vec<usize> {
    paper
        .questions()
        .iter()
        .enumerate()
        .filter(|(_, question)| {
            matches!(
                session.quiz().selection(question.id()),
                Ok(SelectionState::Unanswered)
            )
        })
        .map(|(position, _)| position)
        .collect()
}

/// Walks the paper question by question, reading answers from `input`.
///
/// Stops early on `q` or end of input. When the quiz requires every answer,
/// `q` and skips lead back round the unanswered questions instead; only end
/// of input leaves gaps, which [`submit_exam`] then reports.
pub(crate) fn run_interactive<R: BufRead, W: Write>(
    session: &mut ExamSession,
    input: &mut R,
    output: &mut W,
) -> Result<(), AppError> {
    let paper = Arc::clone(session.quiz().bank());
    let require_all = session.quiz().policy().unanswered == UnansweredPolicy::RequireAll;
    writeln!(
        output,
        "{}: {} questions, {} minutes, pass mark {}%",
        session.config().exam_title,
        paper.len(),
        session.config().time_limit_secs / 60,
        session.config().pass_threshold
    )?;
    if require_all {
        writeln!(output, "Every question needs an answer before the exam is scored.")?;
    }

    let mut pending: Vec<usize> = (0..paper.len()).collect();
    loop {
        let end = ask_round(session, &paper, &pending, input, output)?;
        pending = unanswered_positions(session, &paper);

        let done = match end {
            RoundEnd::EndOfInput => true,
            RoundEnd::Submit | RoundEnd::Finished => !require_all || pending.is_empty(),
        };
        if done {
            break;
        }
        writeln!(
            output,
            "\n{} question(s) still need an answer before submitting.",
            pending.len()
        )?;
    }

    let summary = session.quiz().summary();
    writeln!(
        output,
        "\nSubmitting: {} answered, {} unanswered, {} flagged",
        summary.answered, summary.unanswered, summary.flagged
    )?;
    Ok(())
}

fn ask_round<R: BufRead, W: Write>(
    session: &mut ExamSession,
    paper: &QuestionBank,
    positions: &[usize],
    input: &mut R,
    output: &mut W,
) -> Result<RoundEnd, AppError> {
    let total = paper.len();
    for position in positions {
        let question = &paper.questions()[*position];
        render_question(
            output,
            &format!("Question {} of {}", position + 1, total),
            question,
        )?;

        loop {
            write!(output, "{}", prompt_hint(question.options().len()))?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                return Ok(RoundEnd::EndOfInput);
            }

            match Reply::parse(&line, question.options().len()) {
                Reply::Choice(index) => {
                    session.select(question.id(), index)?;
                    break;
                }
                Reply::Skip => break,
                Reply::Flag => {
                    let flagged = session.toggle_flag(question.id())?;
                    let note = if flagged {
                        "Flagged for review."
                    } else {
                        "Flag removed."
                    };
                    writeln!(output, "{note}")?;
                }
                Reply::Submit => return Ok(RoundEnd::Submit),
                Reply::Invalid => writeln!(output, "Not an option for this question.")?,
            }
        }
    }
    Ok(RoundEnd::Finished)
}

/// Applies scripted answers in paper order. Returns the number of selections made.
///
/// Nothing is selected when the script cannot satisfy the quiz policy.
pub(crate) fn apply_script(
    session: &mut ExamSession,
    script: &AnswerScript,
) -> Result<usize, AppError> {
    let paper = Arc::clone(session.quiz().bank());
    if script.0.len() > paper.len() {
        return Err(AppError::Input(format!(
            "{} answers supplied for a {}-question paper",
            script.0.len(),
            paper.len()
        )));
    }

    if session.quiz().policy().unanswered == UnansweredPolicy::RequireAll {
        let missing: Vec<String> = (0..paper.len())
            .filter(|position| !matches!(script.0.get(*position), Some(Some(_))))
            .map(|position| (position + 1).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(AppError::Input(format!(
                "every question needs an answer; the script leaves question(s) {} of {} blank",
                missing.join(", "),
                paper.len()
            )));
        }
    }

    let mut selected = 0;
    for (question, answer) in paper.questions().iter().zip(&script.0) {
        if let Some(index) = answer {
            session.select(question.id(), *index)?;
            selected += 1;
        }
    }
    Ok(selected)
}

/// Scores the session. An incomplete paper is reported by paper position so
/// the learner can see which questions were left.
pub(crate) fn submit_exam(
    session: &mut ExamSession,
    now: DateTime<Utc>,
) -> Result<ExamOutcome, AppError> {
    match session.submit_at(now) {
        Ok(outcome) => Ok(outcome),
        Err(UsageError::Incomplete { unanswered }) => {
            let paper = session.quiz().bank();
            let numbers: Vec<String> = unanswered
                .iter()
                .filter_map(|id| paper.position(id))
                .map(|position| (position + 1).to_string())
                .collect();
            Err(AppError::Input(format!(
                "input ended before every question was answered; unanswered: question(s) {} of {}",
                numbers.join(", "),
                paper.len()
            )))
        }
        Err(err) => Err(err.into()),
    }
}

/// Asks the inline check until a valid option is chosen or input runs out.
pub(crate) fn run_inline_check<R: BufRead, W: Write>(
    check: &mut InlineCheck,
    input: &mut R,
    output: &mut W,
) -> Result<Option<InlineFeedback>, AppError> {
    render_question(output, "Knowledge check", check.question())?;
    let options = check.question().options().len();

    loop {
        write!(output, "Answer A-{}: ", option_label(options.saturating_sub(1)))?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(None);
        }

        match Reply::parse(&line, options) {
            Reply::Choice(index) => {
                let feedback = check.select(index)?;
                render_feedback(output, &feedback)?;
                return Ok(Some(feedback));
            }
            _ => writeln!(output, "Choose one of the listed options.")?,
        }
    }
}
