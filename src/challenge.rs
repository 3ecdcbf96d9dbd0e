//! Sequential goal tracking for challenge-mode demonstrations
//!
//! A `ChallengeSet` walks an ordered list of numeric targets. The cursor only
//! moves forward; a miss changes nothing and the caller decides how to tell
//! the user.

use serde::{Deserialize, Serialize};

/// Score added for each solved challenge
pub const SCORE_PER_CHALLENGE: u32 = 100;

/// One numeric target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: String,
    pub question: String,
    pub target_value: f64,
    pub tolerance: f64,
    pub units: String,
    #[serde(default)]
    pub hint: String,
}

impl Challenge {
    pub fn new(
        id: impl Into<String>,
        question: impl Into<String>,
        target_value: f64,
        tolerance: f64,
        units: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            target_value,
            tolerance,
            units: units.into(),
            hint: String::new(),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    /// Inclusive tolerance check
    pub fn is_hit(&self, value: f64) -> bool {
        (value - self.target_value).abs() <= self.tolerance
    }
}

/// Result of a successful answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeOutcome {
    /// Moved on to another challenge
    Next { message: String },
    /// That was the last one
    Complete { message: String },
}

impl ChallengeOutcome {
    pub fn message(&self) -> &str {
        match self {
            ChallengeOutcome::Next { message } | ChallengeOutcome::Complete { message } => message,
        }
    }
}

/// Ordered challenges with a cursor and a score
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChallengeSet {
    challenges: Vec<Challenge>,
    index: usize,
    score: u32,
}

impl ChallengeSet {
    pub fn new(challenges: Vec<Challenge>) -> Self {
        Self {
            challenges,
            index: 0,
            score: 0,
        }
    }

    pub fn current(&self) -> Option<&Challenge> {
        self.challenges.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.index >= self.challenges.len()
    }

    /// Test `value` against the current challenge
    ///
    /// On a hit the cursor advances, the score grows by
    /// [`SCORE_PER_CHALLENGE`], and the outcome carries the text to show.
    /// Misses and calls after completion return `None`.
    pub fn check_answer(&mut self, value: f64) -> Option<ChallengeOutcome> {
        let challenge = self.current()?;
        if !challenge.is_hit(value) {
            return None;
        }

        self.score += SCORE_PER_CHALLENGE;
        self.index += 1;

        let outcome = match self.current() {
            Some(next) => ChallengeOutcome::Next {
                message: format!("Correct! Next Challenge: {}", next.question),
            },
            None => ChallengeOutcome::Complete {
                message: format!("All Challenges Complete! Final Score: {}", self.score),
            },
        };
        log::info!("Challenge solved ({}/{})", self.index, self.challenges.len());
        Some(outcome)
    }

    /// `"Challenge n/len | Score: s"`
    pub fn progress(&self) -> String {
        format!(
            "Challenge {}/{} | Score: {}",
            (self.index + 1).min(self.challenges.len()),
            self.challenges.len(),
            self.score
        )
    }
}
