use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Stable identifier for a question within one bank.
///
/// Course content uses both numeric ids (`1`, `2`, ...) and slugs
/// (`"coshh-stands-for"`); both are normalised to their string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct QuestionId(pub String);

impl QuestionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for QuestionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u32> for QuestionId {
    fn from(value: u32) -> Self {
        Self(value.to_string())
    }
}

impl From<i32> for QuestionId {
    fn from(value: i32) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for QuestionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(value) => Self(value.to_string()),
            RawId::Text(value) => Self(value.trim().to_string()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Basic,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const fn ordered() -> [Self; 3] {
        [Self::Basic, Self::Intermediate, Self::Advanced]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "basic" => Some(Self::Basic),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

/// Question exactly as supplied by course content, before validation.
///
/// Accepts both spellings found in the course data: `question`/`prompt` and
/// `correctIndex`/`correctAnswer`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: QuestionId,
    #[serde(alias = "question")]
    pub prompt: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(alias = "correctAnswer")]
    pub correct_index: i64,
    #[serde(default)]
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

impl QuestionRecord {
    pub fn new(
        id: impl Into<QuestionId>,
        prompt: impl Into<String>,
        options: &[&str],
        correct_index: i64,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            options: options.iter().map(|option| option.to_string()).collect(),
            correct_index,
            explanation: explanation.into(),
            category: None,
            difficulty: None,
            topic: None,
            section: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }
}

/// Descriptive tags carried alongside a question. Never affects scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuestionMetadata {
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub topic: Option<String>,
    pub section: Option<String>,
}

/// A validated assessment item. Only obtainable through [`super::QuestionBank`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    correct_index: usize,
    explanation: String,
    metadata: QuestionMetadata,
}

impl Question {
    pub(crate) fn validate(record: QuestionRecord) -> Result<Self, ConfigurationError> {
        let QuestionRecord {
            id,
            prompt,
            options,
            correct_index,
            explanation,
            category,
            difficulty,
            topic,
            section,
        } = record;

        match options.len() {
            0 => return Err(ConfigurationError::EmptyOptions { id }),
            1 => return Err(ConfigurationError::TooFewOptions { id, found: 1 }),
            _ => {}
        }

        let correct_index = usize::try_from(correct_index)
            .ok()
            .filter(|index| *index < options.len())
            .ok_or_else(|| ConfigurationError::CorrectIndexOutOfRange {
                id: id.clone(),
                index: correct_index,
                options: options.len(),
            })?;

        Ok(Self {
            id,
            prompt,
            options,
            correct_index,
            explanation,
            metadata: QuestionMetadata {
                category,
                difficulty,
                topic,
                section,
            },
        })
    }

    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn metadata(&self) -> &QuestionMetadata {
        &self.metadata
    }

    pub fn category(&self) -> Option<&str> {
        self.metadata.category.as_deref()
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.metadata.difficulty
    }

    pub fn is_correct(&self, option_index: usize) -> bool {
        option_index == self.correct_index
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "option", rename_all = "snake_case")]
pub enum SelectionState {
    #[default]
    Unanswered,
    Selected(usize),
}

impl SelectionState {
    pub const fn selected(self) -> Option<usize> {
        match self {
            Self::Unanswered => None,
            Self::Selected(index) => Some(index),
        }
    }

    pub const fn is_answered(self) -> bool {
        matches!(self, Self::Selected(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizPhase {
    InProgress,
    Submitted,
}

/// How `submit` treats questions the learner skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnansweredPolicy {
    /// Skipped questions contribute zero points.
    #[default]
    ScoreAsIncorrect,
    /// Submission is rejected until every question has a selection.
    RequireAll,
}

impl UnansweredPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "score_as_incorrect" | "incorrect" | "partial" => Some(Self::ScoreAsIncorrect),
            "require_all" | "complete" => Some(Self::RequireAll),
            _ => None,
        }
    }
}

/// Whether a selection may be replaced before submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReselectionPolicy {
    #[default]
    Overwrite,
    LockFirst,
}

impl ReselectionPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Some(Self::Overwrite),
            "lock_first" | "lock" => Some(Self::LockFirst),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizPolicy {
    pub unanswered: UnansweredPolicy,
    pub reselection: ReselectionPolicy,
}

/// Malformed content. Raised while binding a bank, never mid-quiz.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("question bank contains no questions")]
    EmptyBank,
    #[error("question {id} has no options")]
    EmptyOptions { id: QuestionId },
    #[error("question {id} needs at least two options, found {found}")]
    TooFewOptions { id: QuestionId, found: usize },
    #[error("question {id} marks option {index} correct but only has {options} options")]
    CorrectIndexOutOfRange {
        id: QuestionId,
        index: i64,
        options: usize,
    },
    #[error("question id {id} appears more than once")]
    DuplicateId { id: QuestionId },
    #[error("exam {exam_id}: {reason}")]
    InvalidExam {
        exam_id: String,
        reason: &'static str,
    },
}

impl ConfigurationError {
    /// The question the error points at, when there is one.
    pub fn question_id(&self) -> Option<&QuestionId> {
        match self {
            Self::EmptyOptions { id }
            | Self::TooFewOptions { id, .. }
            | Self::CorrectIndexOutOfRange { id, .. }
            | Self::DuplicateId { id } => Some(id),
            Self::EmptyBank | Self::InvalidExam { .. } => None,
        }
    }
}

/// Caller misuse of a quiz instance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error("quiz has already been submitted")]
    AlreadySubmitted,
    #[error("question {0} is not part of this quiz")]
    UnknownQuestion(QuestionId),
    #[error("option {index} is out of range for question {id} ({options} options)")]
    OptionOutOfRange {
        id: QuestionId,
        index: usize,
        options: usize,
    },
    #[error("question {0} already has an answer and re-selection is locked")]
    SelectionLocked(QuestionId),
    #[error("{} question(s) still unanswered", .unanswered.len())]
    Incomplete { unanswered: Vec<QuestionId> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_id_accepts_numbers_and_strings() {
        let numeric: QuestionId = serde_json::from_str("7").expect("numeric id parses");
        let slug: QuestionId = serde_json::from_str("\" coshh-stands-for \"").expect("slug parses");
        assert_eq!(numeric, QuestionId::from(7));
        assert_eq!(slug.as_str(), "coshh-stands-for");
    }

    #[test]
    fn record_accepts_course_field_spellings() {
        let raw = r#"{
            "id": 3,
            "question": "Which parent Act provides the legal authority for CDM 2015?",
            "options": ["The Building Act 1984", "The Health and Safety at Work etc. Act 1974"],
            "correctAnswer": 1,
            "difficulty": "basic"
        }"#;
        let record: QuestionRecord = serde_json::from_str(raw).expect("record parses");
        assert_eq!(record.correct_index, 1);
        assert_eq!(record.difficulty, Some(Difficulty::Basic));
        assert!(record.explanation.is_empty());
    }

    #[test]
    fn negative_correct_index_is_rejected() {
        let record = QuestionRecord::new(1, "Prompt", &["A", "B"], -1, "");
        match Question::validate(record) {
            Err(ConfigurationError::CorrectIndexOutOfRange { index, options, .. }) => {
                assert_eq!(index, -1);
                assert_eq!(options, 2);
            }
            other => panic!("expected range error, got {other:?}"),
        }
    }

    #[test]
    fn policies_parse_from_config_values() {
        assert_eq!(
            UnansweredPolicy::parse("REQUIRE_ALL"),
            Some(UnansweredPolicy::RequireAll)
        );
        assert_eq!(
            ReselectionPolicy::parse("lock_first"),
            Some(ReselectionPolicy::LockFirst)
        );
        assert_eq!(ReselectionPolicy::parse("sometimes"), None);
    }

    #[test]
    fn incomplete_error_counts_unanswered() {
        let error = UsageError::Incomplete {
            unanswered: vec![QuestionId::from(1), QuestionId::from(2)],
        };
        assert_eq!(error.to_string(), "2 question(s) still unanswered");
    }
}
