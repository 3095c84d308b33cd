mod cli;
mod commands;
mod infra;
mod render;
mod runner;

use safety_quiz::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
