use crate::infra::{
    load_library, parse_answers, parse_choice, parse_review_filter, AnswerScript,
};
use crate::render::{render_banks, render_feedback, render_json, render_outcome, ExamReport};
use crate::runner::{apply_script, run_inline_check, run_interactive, submit_exam};
use chrono::Utc;
use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;
use safety_quiz::assessment::{ExamSession, ReviewFilter};
use safety_quiz::config::AppConfig;
use safety_quiz::content::{ContentLibrary, LibraryEntry, QuestionBankImporter};
use safety_quiz::error::AppError;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// JSON bank document to validate
    #[arg(long)]
    pub(crate) json: Option<PathBuf>,
    /// Spreadsheet export to validate
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Directory of JSON bank documents to validate
    #[arg(long)]
    pub(crate) dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ExamArgs {
    /// Course bank key, e.g. coshh-awareness
    pub(crate) bank: String,
    /// Override the number of questions drawn
    #[arg(long)]
    pub(crate) questions: Option<usize>,
    /// Seed for a repeatable draw
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Comma-separated answers in paper order (letters or 1-based numbers, `-` skips)
    #[arg(long, value_parser = parse_answers, allow_hyphen_values = true)]
    pub(crate) answers: Option<AnswerScript>,
    /// Which questions to list in the review
    #[arg(long, value_parser = parse_review_filter, default_value = "all")]
    pub(crate) review: ReviewFilter,
    /// Print the outcome as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Course bank key
    pub(crate) bank: String,
    /// Inline check number within the course (1-based)
    pub(crate) number: usize,
    /// Answer without prompting (letter or 1-based number)
    #[arg(long)]
    pub(crate) answer: Option<String>,
}

pub(crate) fn run_banks(config: &AppConfig) -> Result<(), AppError> {
    let library = load_library(&config.content)?;
    let mut out = io::stdout().lock();
    render_banks(&mut out, &library)?;
    Ok(())
}

pub(crate) fn run_validate(config: &AppConfig, args: ValidateArgs) -> Result<(), AppError> {
    let ValidateArgs { json, csv, dir } = args;
    let mut out = io::stdout().lock();

    if json.is_none() && csv.is_none() && dir.is_none() {
        let library = load_library(&config.content)?;
        writeln!(out, "ok: {} banks in the active library", library.entries().len())?;
        return Ok(());
    }

    if let Some(path) = json {
        let text = std::fs::read_to_string(&path)?;
        let name = path.display().to_string();
        let library = ContentLibrary::from_documents([(name.as_str(), text.as_str())])?;
        writeln!(out, "ok: {} ({})", name, library.keys().join(", "))?;
    }

    if let Some(path) = csv {
        let bank = QuestionBankImporter::from_path(&path)?;
        writeln!(out, "ok: {} ({} questions)", path.display(), bank.len())?;
    }

    if let Some(path) = dir {
        let library = ContentLibrary::from_dir(&path)?;
        writeln!(
            out,
            "ok: {} ({} banks)",
            path.display(),
            library.entries().len()
        )?;
    }

    Ok(())
}

pub(crate) fn run_exam(config: &AppConfig, args: ExamArgs) -> Result<(), AppError> {
    let ExamArgs {
        bank,
        questions,
        seed,
        answers,
        review,
        json,
    } = args;

    let library = load_library(&config.content)?;
    let entry = find_entry(&library, &bank)?;

    let mut exam = entry.exam.clone();
    exam.pass_threshold = config.quiz.pass_threshold(exam.pass_threshold);
    if let Some(count) = questions {
        exam.total_questions = count;
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session =
        ExamSession::start(&entry.bank, exam, config.quiz.policy, Utc::now(), &mut rng)?;

    match answers {
        Some(script) => {
            let selected = apply_script(&mut session, &script)?;
            debug!(selected, "scripted answers applied");
        }
        None => {
            let mut input = io::stdin().lock();
            let mut prompts = io::stderr().lock();
            run_interactive(&mut session, &mut input, &mut prompts)?;
        }
    }

    let outcome = submit_exam(&mut session, Utc::now())?;
    let mut out = io::stdout().lock();
    if json {
        let report = ExamReport {
            categories: outcome.result.category_breakdown(),
            outcome: &outcome,
        };
        render_json(&mut out, &report)?;
    } else {
        render_outcome(&mut out, &outcome, review)?;
    }
    Ok(())
}

pub(crate) fn run_check(config: &AppConfig, args: CheckArgs) -> Result<(), AppError> {
    let CheckArgs {
        bank,
        number,
        answer,
    } = args;

    let library = load_library(&config.content)?;
    let entry = find_entry(&library, &bank)?;
    let mut check = number
        .checked_sub(1)
        .and_then(|index| entry.inline_check(index))
        .ok_or_else(|| {
            AppError::Input(format!(
                "{} has {} inline checks, no check {}",
                entry.key,
                entry.inline_check_count(),
                number
            ))
        })?;

    let mut out = io::stdout().lock();
    match answer {
        Some(raw) => {
            let index = parse_choice(&raw).ok_or_else(|| {
                AppError::Input(format!("'{raw}' is not an option letter or number"))
            })?;
            let feedback = check.select(index)?;
            render_feedback(&mut out, &feedback)?;
        }
        None => {
            let mut input = io::stdin().lock();
            run_inline_check(&mut check, &mut input, &mut out)?;
        }
    }
    Ok(())
}

fn find_entry<'a>(library: &'a ContentLibrary, key: &str) -> Result<&'a LibraryEntry, AppError> {
    library.get(key).ok_or_else(|| {
        AppError::Input(format!(
            "unknown bank '{}', expected one of: {}",
            key,
            library.keys().join(", ")
        ))
    })
}
