use super::normalizer::{normalize_cell, parse_correct};
use crate::assessment::{Difficulty, QuestionId, QuestionRecord};
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// Row-level problem in a spreadsheet export, reported with its data line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowProblem {
    pub line: u64,
    pub reason: String,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<QuestionRecord>, ParseFailure> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (offset, row) in csv_reader.deserialize::<QuestionRow>().enumerate() {
        // Header is line 1.
        let line = offset as u64 + 2;
        let row = row.map_err(ParseFailure::Csv)?;
        records.push(row.into_record(line).map_err(ParseFailure::Row)?);
    }

    Ok(records)
}

#[derive(Debug)]
pub(crate) enum ParseFailure {
    Csv(csv::Error),
    Row(RowProblem),
}

#[derive(Debug, Deserialize)]
struct QuestionRow {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Question")]
    question: String,
    #[serde(rename = "Option A", default, deserialize_with = "empty_string_as_none")]
    option_a: Option<String>,
    #[serde(rename = "Option B", default, deserialize_with = "empty_string_as_none")]
    option_b: Option<String>,
    #[serde(rename = "Option C", default, deserialize_with = "empty_string_as_none")]
    option_c: Option<String>,
    #[serde(rename = "Option D", default, deserialize_with = "empty_string_as_none")]
    option_d: Option<String>,
    #[serde(rename = "Option E", default, deserialize_with = "empty_string_as_none")]
    option_e: Option<String>,
    #[serde(rename = "Option F", default, deserialize_with = "empty_string_as_none")]
    option_f: Option<String>,
    #[serde(rename = "Correct")]
    correct: String,
    #[serde(rename = "Explanation", default)]
    explanation: String,
    #[serde(rename = "Category", default, deserialize_with = "empty_string_as_none")]
    category: Option<String>,
    #[serde(rename = "Difficulty", default, deserialize_with = "empty_string_as_none")]
    difficulty: Option<String>,
}

impl QuestionRow {
    fn into_record(self, line: u64) -> Result<QuestionRecord, RowProblem> {
        let problem = |reason: String| RowProblem { line, reason };

        let id = normalize_cell(&self.id);
        if id.is_empty() {
            return Err(problem("missing ID".to_string()));
        }

        let correct_index = parse_correct(&self.correct).ok_or_else(|| {
            problem(format!(
                "Correct must be an option letter or index, got '{}'",
                self.correct
            ))
        })?;

        let difficulty = match self.difficulty.as_deref() {
            Some(raw) => Some(
                Difficulty::parse(raw)
                    .ok_or_else(|| problem(format!("unknown difficulty '{raw}'")))?,
            ),
            None => None,
        };

        let columns = [
            self.option_a,
            self.option_b,
            self.option_c,
            self.option_d,
            self.option_e,
            self.option_f,
        ];
        // `Correct` is keyed to column letters, so options must be contiguous.
        let filled = columns.iter().take_while(|column| column.is_some()).count();
        if let Some(offset) = columns[filled..].iter().position(Option::is_some) {
            return Err(problem(format!(
                "Option {} is filled but Option {} before it is blank",
                char::from(b'A' + (filled + offset) as u8),
                char::from(b'A' + filled as u8)
            )));
        }

        let options = columns
            .into_iter()
            .flatten()
            .map(|option| normalize_cell(&option))
            .collect();

        Ok(QuestionRecord {
            id: QuestionId(id),
            prompt: normalize_cell(&self.question),
            options,
            correct_index,
            explanation: normalize_cell(&self.explanation),
            category: self.category.map(|category| normalize_cell(&category)),
            difficulty,
            topic: None,
            section: None,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
