mod draw;

use super::bank::QuestionBank;
use super::domain::{ConfigurationError, QuestionId, QuizPolicy, UsageError};
use super::instance::QuizInstance;
use super::report::QuizResult;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Relative weighting of basic/intermediate/advanced questions in a draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyMix {
    pub basic: f32,
    pub intermediate: f32,
    pub advanced: f32,
}

impl DifficultyMix {
    /// Per-difficulty question counts summing to `count`, or `None` when the
    /// weights cannot be used.
    pub fn quotas(&self, count: usize) -> Option<[usize; 3]> {
        let weights = [self.basic, self.intermediate, self.advanced];
        if weights.iter().any(|weight| !weight.is_finite() || *weight < 0.0) {
            return None;
        }
        let total: f32 = weights.iter().sum();
        if total <= 0.0 {
            return None;
        }

        let share = |weight: f32| ((count as f32 * weight) / total).round() as usize;
        let basic = share(self.basic).min(count);
        let intermediate = share(self.intermediate).min(count - basic);
        Some([basic, intermediate, count - basic - intermediate])
    }
}

/// Timed, thresholded mock examination drawn from a course bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockExamConfig {
    pub exam_id: String,
    pub exam_title: String,
    pub total_questions: usize,
    #[serde(rename = "timeLimit")]
    pub time_limit_secs: u32,
    pub pass_threshold: u8,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty_mix: Option<DifficultyMix>,
}

impl MockExamConfig {
    pub fn validate(&self, bank: &QuestionBank) -> Result<(), ConfigurationError> {
        let invalid = |reason| ConfigurationError::InvalidExam {
            exam_id: self.exam_id.clone(),
            reason,
        };

        if self.total_questions == 0 {
            return Err(invalid("total questions must be at least one"));
        }
        if self.total_questions > bank.len() {
            return Err(invalid("total questions exceeds the question bank"));
        }
        if self.pass_threshold > 100 {
            return Err(invalid("pass threshold must be a percentage"));
        }
        if self.time_limit_secs == 0 {
            return Err(invalid("time limit must be positive"));
        }
        Ok(())
    }
}

/// Draws a balanced exam paper from `bank`.
pub fn draw_questions<R: Rng + ?Sized>(
    bank: &QuestionBank,
    count: usize,
    categories: &[String],
    mix: Option<&DifficultyMix>,
    rng: &mut R,
) -> Result<QuestionBank, ConfigurationError> {
    let positions = draw::balanced_positions(bank, count, categories, mix, rng);
    bank.subset(&positions)
}

/// Terminal record of a sat exam.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExamOutcome {
    pub exam_id: String,
    pub exam_title: String,
    pub result: QuizResult,
    pub score_percent: u8,
    pub pass_threshold: u8,
    pub passed: bool,
    pub started_at: DateTime<Utc>,
    pub submitted_at: DateTime<Utc>,
    pub elapsed_secs: i64,
    pub within_time_limit: bool,
}

/// A quiz instance over a freshly drawn paper plus its timing.
///
/// The session never runs a clock of its own; callers pass `now`.
#[derive(Debug, Clone)]
pub struct ExamSession {
    config: MockExamConfig,
    quiz: QuizInstance,
    started_at: DateTime<Utc>,
}

impl ExamSession {
    pub fn start<R: Rng + ?Sized>(
        bank: &QuestionBank,
        config: MockExamConfig,
        policy: QuizPolicy,
        started_at: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Self, ConfigurationError> {
        config.validate(bank)?;
        let paper = draw_questions(
            bank,
            config.total_questions,
            &config.categories,
            config.difficulty_mix.as_ref(),
            rng,
        )?;

        debug!(
            exam = %config.exam_id,
            questions = paper.len(),
            "mock exam started"
        );

        Ok(Self {
            quiz: QuizInstance::new(Arc::new(paper), policy),
            config,
            started_at,
        })
    }

    pub fn config(&self) -> &MockExamConfig {
        &self.config
    }

    pub fn quiz(&self) -> &QuizInstance {
        &self.quiz
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn select(
        &mut self,
        question_id: &QuestionId,
        option_index: usize,
    ) -> Result<(), UsageError> {
        self.quiz.select(question_id, option_index)
    }

    pub fn toggle_flag(&mut self, question_id: &QuestionId) -> Result<bool, UsageError> {
        self.quiz.toggle_flag(question_id)
    }

    /// Seconds left on the clock at `now`, floored at zero.
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> i64 {
        let elapsed = (now - self.started_at).num_seconds().max(0);
        (i64::from(self.config.time_limit_secs) - elapsed).max(0)
    }

    pub fn submit_at(&mut self, now: DateTime<Utc>) -> Result<ExamOutcome, UsageError> {
        let result = self.quiz.submit()?;
        let elapsed_secs = (now - self.started_at).num_seconds().max(0);
        let score_percent = result.score_percent();
        let passed = result.passed(self.config.pass_threshold);

        info!(
            exam = %self.config.exam_id,
            score = score_percent,
            passed,
            elapsed_secs,
            "mock exam submitted"
        );

        Ok(ExamOutcome {
            exam_id: self.config.exam_id.clone(),
            exam_title: self.config.exam_title.clone(),
            result,
            score_percent,
            pass_threshold: self.config.pass_threshold,
            passed,
            started_at: self.started_at,
            submitted_at: now,
            elapsed_secs,
            within_time_limit: elapsed_secs <= i64::from(self.config.time_limit_secs),
        })
    }
}
