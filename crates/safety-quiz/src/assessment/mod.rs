//! Quiz self-assessment: validated question banks, the select/submit state
//! machine, inline knowledge checks, and timed mock exams.

mod bank;
pub mod domain;
pub mod exam;
mod inline;
mod instance;
pub mod report;

pub use bank::QuestionBank;
pub use domain::{
    ConfigurationError, Difficulty, Question, QuestionId, QuestionRecord, QuizPhase, QuizPolicy,
    ReselectionPolicy, SelectionState, UnansweredPolicy, UsageError,
};
pub use exam::{DifficultyMix, ExamOutcome, ExamSession, MockExamConfig};
pub use inline::{InlineCheck, InlineFeedback};
pub use instance::QuizInstance;
pub use report::{
    CategoryScore, Feedback, QuestionReview, QuestionView, QuizResult, QuizSummary, ReviewFilter,
    ReviewStatus,
};
