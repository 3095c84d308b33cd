use super::bank::QuestionBank;
use super::domain::{
    ConfigurationError, Question, QuestionRecord, QuizPolicy, ReselectionPolicy,
    UnansweredPolicy, UsageError,
};
use super::instance::QuizInstance;
use super::report::QuestionReview;
use serde::Serialize;
use std::sync::Arc;

/// Feedback shown as soon as an inline check is answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineFeedback {
    pub selected: usize,
    pub was_correct: bool,
    pub correct_index: usize,
    pub explanation: String,
}

impl InlineFeedback {
    fn from_review(review: &QuestionReview) -> Option<Self> {
        review.selected.map(|selected| Self {
            selected,
            was_correct: review.was_correct,
            correct_index: review.correct_index,
            explanation: review.explanation.clone(),
        })
    }
}

/// Single-question knowledge check embedded in a course page.
///
/// Backed by a [`QuizInstance`] over a one-question bank: answering selects
/// and submits in one step, so the first accepted answer is final.
#[derive(Debug, Clone)]
pub struct InlineCheck {
    quiz: QuizInstance,
}

impl InlineCheck {
    const POLICY: QuizPolicy = QuizPolicy {
        unanswered: UnansweredPolicy::RequireAll,
        reselection: ReselectionPolicy::Overwrite,
    };

    pub fn new(record: QuestionRecord) -> Result<Self, ConfigurationError> {
        let bank = QuestionBank::new(vec![record])?;
        Ok(Self {
            quiz: QuizInstance::new(Arc::new(bank), Self::POLICY),
        })
    }

    /// Binds to an already validated single-question bank.
    pub(crate) fn from_bank(bank: Arc<QuestionBank>) -> Self {
        debug_assert_eq!(bank.len(), 1);
        Self {
            quiz: QuizInstance::new(bank, Self::POLICY),
        }
    }

    pub fn question(&self) -> &Question {
        &self.quiz.bank().questions()[0]
    }

    pub fn is_answered(&self) -> bool {
        self.quiz.result().is_some()
    }

    /// Records the answer and reveals correctness. Any later call fails with
    /// [`UsageError::AlreadySubmitted`].
    pub fn select(&mut self, option_index: usize) -> Result<InlineFeedback, UsageError> {
        let id = self.question().id().clone();
        self.quiz.select(&id, option_index)?;
        let result = self.quiz.submit()?;

        result
            .reviews
            .first()
            .and_then(InlineFeedback::from_review)
            .ok_or(UsageError::Incomplete {
                unanswered: vec![id],
            })
    }

    pub fn feedback(&self) -> Option<InlineFeedback> {
        self.quiz
            .result()
            .and_then(|result| result.reviews.first())
            .and_then(InlineFeedback::from_review)
    }
}
