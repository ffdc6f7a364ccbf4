use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::SupervisorFeedback;

pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FeedbackError {
    #[error("Please provide feedback before submitting.")]
    MissingFeedback,
    #[error("Please provide a rating before submitting.")]
    MissingRating,
}

/// Feedback the student sends about their placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentFeedback {
    pub feedback: String,
    pub rating: u8,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackForm {
    pub text: String,
    rating: u8, // 0 = no star selected
}

impl FeedbackForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    /// Select a star rating; values above the maximum are clamped
    pub fn set_rating(&mut self, rating: u8) {
        self.rating = rating.min(MAX_RATING);
    }

    pub fn increase_rating(&mut self) {
        self.set_rating(self.rating.saturating_add(1));
    }

    pub fn decrease_rating(&mut self) {
        self.rating = self.rating.saturating_sub(1);
    }

    /// Validate and turn the form into a submission. The form is left as is;
    /// callers clear it once the submission has been accepted.
    pub fn prepare(&self, now: DateTime<Utc>) -> Result<StudentFeedback, FeedbackError> {
        if self.text.trim().is_empty() {
            return Err(FeedbackError::MissingFeedback);
        }
        if self.rating == 0 {
            return Err(FeedbackError::MissingRating);
        }
        Ok(StudentFeedback {
            feedback: self.text.trim().to_string(),
            rating: self.rating,
            submitted_at: now,
        })
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.rating = 0;
    }
}

/// Summary cards on the feedback tab
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FeedbackStats {
    pub total_feedback: usize,
    pub average_rating: f64, // One decimal place
    pub response_rate: u8,   // Percent
}

impl FeedbackStats {
    pub fn from_items(items: &[SupervisorFeedback]) -> Self {
        let total_feedback = items.len();
        let ratings: Vec<u32> = items
            .iter()
            .filter_map(|item| item.rating.map(u32::from))
            .collect();

        let average_rating = if ratings.is_empty() {
            0.0
        } else {
            let sum: u32 = ratings.iter().sum();
            round_tenths_half_up(sum, ratings.len() as u32)
        };

        Self {
            total_feedback,
            average_rating,
            response_rate: if total_feedback > 0 { 100 } else { 0 },
        }
    }
}

/// `sum / count` rounded to one decimal place, halves rounding up.
/// Integer arithmetic so that e.g. 4.25 does not drift to 4.2.
fn round_tenths_half_up(sum: u32, count: u32) -> f64 {
    let tenths = (sum as u64 * 20 + count as u64) / (count as u64 * 2);
    tenths as f64 / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn item(rating: Option<u8>) -> SupervisorFeedback {
        SupervisorFeedback {
            id: "1".to_string(),
            supervisor: "Dr. Lawrence Nderu".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 14).unwrap(),
            feedback: "Good progress".to_string(),
            rating,
            week_number: Some(2),
        }
    }

    #[test]
    fn test_feedback_requires_text_before_rating() {
        let form = FeedbackForm::new();
        assert_eq!(form.prepare(Utc::now()), Err(FeedbackError::MissingFeedback));

        let mut form = FeedbackForm::new();
        form.text = "Great team".to_string();
        assert_eq!(form.prepare(Utc::now()), Err(FeedbackError::MissingRating));

        form.set_rating(4);
        let submission = form.prepare(Utc::now()).unwrap();
        assert_eq!(submission.rating, 4);
        assert_eq!(submission.feedback, "Great team");
    }

    #[test]
    fn test_rating_is_clamped() {
        let mut form = FeedbackForm::new();
        form.set_rating(9);
        assert_eq!(form.rating(), MAX_RATING);
        form.increase_rating();
        assert_eq!(form.rating(), MAX_RATING);
        form.set_rating(0);
        form.decrease_rating();
        assert_eq!(form.rating(), 0);
    }

    #[test]
    fn test_stats_ignore_missing_ratings() {
        let stats = FeedbackStats::from_items(&[item(Some(4)), item(None), item(Some(5))]);
        assert_eq!(stats.total_feedback, 3);
        assert_eq!(stats.average_rating, 4.5);
        assert_eq!(stats.response_rate, 100);
    }

    #[test]
    fn test_average_rounds_half_up() {
        // 17 / 4 = 4.25 -> 4.3
        let stats = FeedbackStats::from_items(&[item(Some(4)), item(Some(4)), item(Some(4)), item(Some(5))]);
        assert_eq!(stats.average_rating, 4.3);
    }

    #[test]
    fn test_empty_stats() {
        assert_eq!(FeedbackStats::from_items(&[]), FeedbackStats::default());
    }
}
