use crate::commands::{
    run_banks, run_check, run_exam, run_validate, CheckArgs, ExamArgs, ValidateArgs,
};
use clap::{Parser, Subcommand};
use safety_quiz::config::AppConfig;
use safety_quiz::error::AppError;
use safety_quiz::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "safety-quiz",
    about = "Practise construction health-and-safety course quizzes from the terminal",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the course question banks (default command)
    Banks,
    /// Validate question content without starting a quiz
    Validate(ValidateArgs),
    /// Sit a timed mock exam drawn from a course bank
    Exam(ExamArgs),
    /// Answer one of a course's inline knowledge checks
    Check(CheckArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command.unwrap_or(Command::Banks) {
        Command::Banks => run_banks(&config),
        Command::Validate(args) => run_validate(&config, args),
        Command::Exam(args) => run_exam(&config, args),
        Command::Check(args) => run_check(&config, args),
    }
}
