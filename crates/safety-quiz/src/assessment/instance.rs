use super::bank::QuestionBank;
use super::domain::{
    QuestionId, QuizPhase, QuizPolicy, ReselectionPolicy, SelectionState, UnansweredPolicy,
    UsageError,
};
use super::report::{Feedback, QuestionReview, QuestionView, QuizResult, QuizSummary};
use std::sync::Arc;
use tracing::{debug, info};

/// One learner's pass through a question bank.
///
/// `InProgress` accepts selections and flags; `submit` moves the instance to
/// `Submitted` exactly once. A retake is a new instance.
#[derive(Debug, Clone)]
pub struct QuizInstance {
    bank: Arc<QuestionBank>,
    policy: QuizPolicy,
    selections: Vec<SelectionState>,
    flags: Vec<bool>,
    phase: QuizPhase,
    result: Option<QuizResult>,
}

impl QuizInstance {
    pub fn new(bank: Arc<QuestionBank>, policy: QuizPolicy) -> Self {
        let size = bank.len();
        Self {
            bank,
            policy,
            selections: vec![SelectionState::Unanswered; size],
            flags: vec![false; size],
            phase: QuizPhase::InProgress,
            result: None,
        }
    }

    pub fn bank(&self) -> &Arc<QuestionBank> {
        &self.bank
    }

    pub fn policy(&self) -> QuizPolicy {
        self.policy
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    pub fn select(
        &mut self,
        question_id: &QuestionId,
        option_index: usize,
    ) -> Result<(), UsageError> {
        self.ensure_in_progress()?;
        let position = self.position_of(question_id)?;
        let question = &self.bank.questions()[position];

        let options = question.options().len();
        if option_index >= options {
            return Err(UsageError::OptionOutOfRange {
                id: question_id.clone(),
                index: option_index,
                options,
            });
        }

        if self.policy.reselection == ReselectionPolicy::LockFirst
            && self.selections[position].is_answered()
        {
            return Err(UsageError::SelectionLocked(question_id.clone()));
        }

        self.selections[position] = SelectionState::Selected(option_index);
        debug!(question = %question_id, option = option_index, "selection recorded");
        Ok(())
    }

    pub fn selection(&self, question_id: &QuestionId) -> Result<SelectionState, UsageError> {
        let position = self.position_of(question_id)?;
        Ok(self.selections[position])
    }

    /// Flips the review flag on a question and returns the new value.
    pub fn toggle_flag(&mut self, question_id: &QuestionId) -> Result<bool, UsageError> {
        self.ensure_in_progress()?;
        let position = self.position_of(question_id)?;
        self.flags[position] = !self.flags[position];
        Ok(self.flags[position])
    }

    pub fn is_flagged(&self, question_id: &QuestionId) -> Result<bool, UsageError> {
        let position = self.position_of(question_id)?;
        Ok(self.flags[position])
    }

    /// Next flagged question after `after` in bank order, wrapping to the first.
    pub fn next_flagged(&self, after: Option<&QuestionId>) -> Option<&QuestionId> {
        let start = after
            .and_then(|id| self.bank.position(id))
            .map_or(0, |position| position + 1);
        let size = self.flags.len();

        (0..size)
            .map(|offset| (start + offset) % size)
            .find(|position| self.flags[*position])
            .map(|position| self.bank.questions()[position].id())
    }

    pub fn summary(&self) -> QuizSummary {
        let answered = self
            .selections
            .iter()
            .filter(|selection| selection.is_answered())
            .count();
        QuizSummary {
            total: self.selections.len(),
            answered,
            unanswered: self.selections.len() - answered,
            flagged: self.flags.iter().filter(|flag| **flag).count(),
        }
    }

    /// Renderer view. Correctness stays hidden until the instance is submitted.
    pub fn view(&self) -> Vec<QuestionView> {
        self.bank
            .questions()
            .iter()
            .enumerate()
            .map(|(position, question)| {
                let selected = self.selections[position].selected();
                let feedback = match self.phase {
                    QuizPhase::InProgress => None,
                    QuizPhase::Submitted => Some(Feedback {
                        was_correct: selected.is_some_and(|index| question.is_correct(index)),
                        correct_index: question.correct_index(),
                        explanation: question.explanation().to_string(),
                    }),
                };

                QuestionView {
                    id: question.id().clone(),
                    prompt: question.prompt().to_string(),
                    options: question.options().to_vec(),
                    selected,
                    flagged: self.flags[position],
                    feedback,
                }
            })
            .collect()
    }

    /// Scores the quiz and freezes it. A second call fails and leaves the
    /// stored result untouched.
    pub fn submit(&mut self) -> Result<QuizResult, UsageError> {
        self.ensure_in_progress()?;

        if self.policy.unanswered == UnansweredPolicy::RequireAll {
            let unanswered: Vec<QuestionId> = self
                .bank
                .questions()
                .iter()
                .zip(&self.selections)
                .filter(|(_, selection)| !selection.is_answered())
                .map(|(question, _)| question.id().clone())
                .collect();
            if !unanswered.is_empty() {
                return Err(UsageError::Incomplete { unanswered });
            }
        }

        let reviews = self
            .bank
            .questions()
            .iter()
            .zip(self.selections.iter().zip(&self.flags))
            .map(|(question, (selection, flagged))| {
                let selected = selection.selected();
                QuestionReview {
                    question_id: question.id().clone(),
                    prompt: question.prompt().to_string(),
                    options: question.options().to_vec(),
                    selected,
                    correct_index: question.correct_index(),
                    was_correct: selected.is_some_and(|index| question.is_correct(index)),
                    flagged: *flagged,
                    explanation: question.explanation().to_string(),
                    category: question.category().map(str::to_string),
                }
            })
            .collect();

        let result = QuizResult::from_reviews(reviews);
        info!(
            correct = result.correct_count,
            answered = result.answered_count,
            total = result.total_questions,
            "quiz submitted"
        );

        self.phase = QuizPhase::Submitted;
        self.result = Some(result.clone());
        Ok(result)
    }

    fn ensure_in_progress(&self) -> Result<(), UsageError> {
        match self.phase {
            QuizPhase::InProgress => Ok(()),
            QuizPhase::Submitted => Err(UsageError::AlreadySubmitted),
        }
    }

    fn position_of(&self, question_id: &QuestionId) -> Result<usize, UsageError> {
        self.bank
            .position(question_id)
            .ok_or_else(|| UsageError::UnknownQuestion(question_id.clone()))
    }
}
