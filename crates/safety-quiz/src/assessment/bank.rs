use super::domain::{ConfigurationError, Difficulty, Question, QuestionId, QuestionRecord};
use std::collections::HashMap;

/// Ordered, validated set of questions backing one quiz or inline check.
///
/// Banks are immutable once built and are shared between quiz instances
/// behind an `Arc`.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
    positions: HashMap<QuestionId, usize>,
}

impl QuestionBank {
    /// Validates every record eagerly; the first violation wins and names the
    /// offending question.
    pub fn new(records: Vec<QuestionRecord>) -> Result<Self, ConfigurationError> {
        let questions = records
            .into_iter()
            .map(Question::validate)
            .collect::<Result<Vec<_>, _>>()?;

        Self::assemble(questions)
    }

    pub(crate) fn assemble(questions: Vec<Question>) -> Result<Self, ConfigurationError> {
        if questions.is_empty() {
            return Err(ConfigurationError::EmptyBank);
        }

        let mut positions = HashMap::with_capacity(questions.len());
        for (position, question) in questions.iter().enumerate() {
            if positions.insert(question.id().clone(), position).is_some() {
                return Err(ConfigurationError::DuplicateId {
                    id: question.id().clone(),
                });
            }
        }

        Ok(Self {
            questions,
            positions,
        })
    }

    /// Builds a bank from a selection of positions in this one, in the order given.
    pub(crate) fn subset(&self, positions: &[usize]) -> Result<Self, ConfigurationError> {
        let questions = positions
            .iter()
            .filter_map(|position| self.questions.get(*position).cloned())
            .collect();
        Self::assemble(questions)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, id: &QuestionId) -> Option<&Question> {
        self.position(id).map(|position| &self.questions[position])
    }

    pub fn position(&self, id: &QuestionId) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for category in self.questions.iter().filter_map(Question::category) {
            if !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }

    pub fn count_by_difficulty(&self, difficulty: Difficulty) -> usize {
        self.questions
            .iter()
            .filter(|question| question.difficulty() == Some(difficulty))
            .count()
    }
}
