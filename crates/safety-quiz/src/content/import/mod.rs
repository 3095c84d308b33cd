mod normalizer;
mod parser;

pub use parser::RowProblem;

use crate::assessment::{ConfigurationError, QuestionBank};
use parser::ParseFailure;
use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Row(RowProblem),
    Bank(ConfigurationError),
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read question export: {}", err),
            ImportError::Csv(err) => write!(f, "invalid question CSV data: {}", err),
            ImportError::Row(problem) => {
                write!(f, "line {}: {}", problem.line, problem.reason)
            }
            ImportError::Bank(err) => write!(f, "imported questions are not a valid bank: {}", err),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::Row(_) => None,
            ImportError::Bank(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<ConfigurationError> for ImportError {
    fn from(err: ConfigurationError) -> Self {
        Self::Bank(err)
    }
}

impl ImportError {
    fn from_parse(failure: ParseFailure) -> Self {
        match failure {
            ParseFailure::Csv(err) => Self::Csv(err),
            ParseFailure::Row(problem) => Self::Row(problem),
        }
    }
}

/// Builds question banks from spreadsheet exports.
///
/// Expected headers: `ID, Question, Option A`..`Option F, Correct,
/// Explanation, Category, Difficulty`. Blank option cells are skipped.
pub struct QuestionBankImporter;

impl QuestionBankImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<QuestionBank, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<QuestionBank, ImportError> {
        let records = parser::parse_records(reader).map_err(ImportError::from_parse)?;
        let bank = QuestionBank::new(records)?;
        info!(questions = bank.len(), "question export imported");
        Ok(bank)
    }
}
