use super::domain::QuestionId;
use serde::Serialize;

const UNCATEGORISED: &str = "General";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Correct,
    Incorrect,
    Unanswered,
}

impl ReviewStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Correct => "Correct",
            Self::Incorrect => "Incorrect",
            Self::Unanswered => "Unanswered",
        }
    }
}

/// Review screen filters offered after a mock exam.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewFilter {
    #[default]
    All,
    Correct,
    Incorrect,
    Unanswered,
    Flagged,
}

impl ReviewFilter {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "correct" => Some(Self::Correct),
            "incorrect" | "wrong" => Some(Self::Incorrect),
            "unanswered" | "skipped" => Some(Self::Unanswered),
            "flagged" => Some(Self::Flagged),
            _ => None,
        }
    }

    fn matches(self, review: &QuestionReview) -> bool {
        match self {
            Self::All => true,
            Self::Correct => review.status() == ReviewStatus::Correct,
            Self::Incorrect => review.status() == ReviewStatus::Incorrect,
            Self::Unanswered => review.status() == ReviewStatus::Unanswered,
            Self::Flagged => review.flagged,
        }
    }
}

/// Per-question outcome captured at submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionReview {
    pub question_id: QuestionId,
    pub prompt: String,
    pub options: Vec<String>,
    pub selected: Option<usize>,
    pub correct_index: usize,
    pub was_correct: bool,
    pub flagged: bool,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl QuestionReview {
    pub fn status(&self) -> ReviewStatus {
        match self.selected {
            None => ReviewStatus::Unanswered,
            Some(_) if self.was_correct => ReviewStatus::Correct,
            Some(_) => ReviewStatus::Incorrect,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryScore {
    pub category: String,
    pub correct: usize,
    pub total: usize,
}

impl CategoryScore {
    pub fn percent(&self) -> u8 {
        rounded_percent(self.correct, self.total)
    }
}

/// Immutable scoring snapshot produced by a single `submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizResult {
    pub total_questions: usize,
    pub correct_count: usize,
    pub answered_count: usize,
    pub reviews: Vec<QuestionReview>,
}

impl QuizResult {
    pub(crate) fn from_reviews(reviews: Vec<QuestionReview>) -> Self {
        let correct_count = reviews.iter().filter(|review| review.was_correct).count();
        let answered_count = reviews
            .iter()
            .filter(|review| review.selected.is_some())
            .count();

        Self {
            total_questions: reviews.len(),
            correct_count,
            answered_count,
            reviews,
        }
    }

    /// Fraction of questions answered correctly, `0.0..=1.0`.
    pub fn percentage(&self) -> f32 {
        if self.total_questions == 0 {
            return 0.0;
        }
        self.correct_count as f32 / self.total_questions as f32
    }

    pub fn score_percent(&self) -> u8 {
        rounded_percent(self.correct_count, self.total_questions)
    }

    pub fn passed(&self, threshold_percent: u8) -> bool {
        self.score_percent() >= threshold_percent
    }

    pub fn correctness(&self) -> Vec<bool> {
        self.reviews.iter().map(|review| review.was_correct).collect()
    }

    pub fn incorrect_count(&self) -> usize {
        self.answered_count - self.correct_count
    }

    pub fn unanswered_count(&self) -> usize {
        self.total_questions - self.answered_count
    }

    pub fn filtered(&self, filter: ReviewFilter) -> Vec<&QuestionReview> {
        self.reviews
            .iter()
            .filter(|review| filter.matches(review))
            .collect()
    }

    /// Correct/total per category, in the order categories first appear.
    pub fn category_breakdown(&self) -> Vec<CategoryScore> {
        let mut scores: Vec<CategoryScore> = Vec::new();
        for review in &self.reviews {
            let category = review.category.as_deref().unwrap_or(UNCATEGORISED);
            let index = match scores.iter().position(|entry| entry.category == category) {
                Some(index) => index,
                None => {
                    scores.push(CategoryScore {
                        category: category.to_string(),
                        correct: 0,
                        total: 0,
                    });
                    scores.len() - 1
                }
            };

            let entry = &mut scores[index];
            entry.total += 1;
            if review.was_correct {
                entry.correct += 1;
            }
        }
        scores
    }
}

/// Running counts shown while a quiz is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizSummary {
    pub total: usize,
    pub answered: usize,
    pub unanswered: usize,
    pub flagged: usize,
}

/// Correctness revealed for a question once its quiz is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub was_correct: bool,
    pub correct_index: usize,
    pub explanation: String,
}

/// Live, renderer-facing view of one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub id: QuestionId,
    pub prompt: String,
    pub options: Vec<String>,
    pub selected: Option<usize>,
    pub flagged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
}

fn rounded_percent(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(id: i32, selected: Option<usize>, category: Option<&str>) -> QuestionReview {
        QuestionReview {
            question_id: QuestionId::from(id),
            prompt: format!("Question {id}"),
            options: vec!["A".to_string(), "B".to_string()],
            selected,
            correct_index: 0,
            was_correct: selected == Some(0),
            flagged: id % 2 == 0,
            explanation: String::new(),
            category: category.map(str::to_string),
        }
    }

    #[test]
    fn rounds_score_to_whole_percent() {
        let result = QuizResult::from_reviews(vec![
            review(1, Some(0), None),
            review(2, Some(0), None),
            review(3, Some(1), None),
        ]);
        assert_eq!(result.score_percent(), 67);
        assert!(result.passed(67));
        assert!(!result.passed(80));
        assert!((result.percentage() - 2.0 / 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn filters_by_review_status() {
        let result = QuizResult::from_reviews(vec![
            review(1, Some(0), None),
            review(2, Some(1), None),
            review(3, None, None),
            review(4, None, None),
        ]);

        let ids = |filter| {
            result
                .filtered(filter)
                .iter()
                .map(|r| r.question_id.as_str().to_string())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(ReviewFilter::Correct), vec!["1"]);
        assert_eq!(ids(ReviewFilter::Incorrect), vec!["2"]);
        assert_eq!(ids(ReviewFilter::Unanswered), vec!["3", "4"]);
        assert_eq!(ids(ReviewFilter::Flagged), vec!["2", "4"]);
        assert_eq!(result.incorrect_count(), 1);
        assert_eq!(result.unanswered_count(), 2);
    }

    #[test]
    fn breakdown_groups_uncategorised_under_general() {
        let result = QuizResult::from_reviews(vec![
            review(1, Some(0), Some("Control Measures & PPE")),
            review(2, Some(1), None),
            review(3, Some(0), Some("Control Measures & PPE")),
        ]);

        let breakdown = result.category_breakdown();
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].category, "Control Measures & PPE");
        assert_eq!((breakdown[0].correct, breakdown[0].total), (2, 2));
        assert_eq!(breakdown[1].category, "General");
        assert_eq!(breakdown[1].percent(), 0);
    }
}
