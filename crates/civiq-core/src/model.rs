//! Core data model types for civiq.
//!
//! These are the records produced by the question-bank parser and the
//! results produced by the grading engine. Field names serialize in
//! camelCase so the JSON bank stays compatible with existing consumers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single question from the civics question bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    /// Question number from the source document.
    pub id: u32,
    /// Question text with the trailing star marker removed.
    pub question: String,
    /// Most recent section header preceding the question.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Most recent subsection header within the current section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subsection: Option<String>,
    /// Canonical answers from the official key, in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub acceptable_answers: Vec<String>,
    /// Number of distinct items the user must name (always >= 2 when set).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_answers_required: Option<u32>,
    /// "Answers will vary": any non-empty response is accepted.
    #[serde(default, skip_serializing_if = "is_false")]
    pub variable: bool,
    /// The answer depends on who currently holds an office.
    #[serde(default, skip_serializing_if = "is_false")]
    pub requires_current_info: bool,
    /// Marked with `*` in the source. Not used for grading.
    #[serde(default, skip_serializing_if = "is_false")]
    pub starred: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl QuestionRecord {
    /// Create a bare record with no answer key or flags.
    pub fn new(id: u32, question: impl Into<String>) -> Self {
        Self {
            id,
            question: question.into(),
            section: None,
            subsection: None,
            acceptable_answers: Vec::new(),
            min_answers_required: None,
            variable: false,
            requires_current_info: false,
            starred: false,
        }
    }

    /// The grading policy that applies to this question.
    pub fn policy(&self) -> GradingPolicy {
        GradingPolicy::from(self)
    }
}

/// How a question is graded, derived once from its record.
///
/// Variant precedence mirrors the grading dispatch order: a variable
/// question is never treated as current-info, and so on down the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradingPolicy {
    /// Any non-empty answer is accepted.
    Variable,
    /// Correctness cannot be decided from the static key.
    CurrentInfo,
    /// No acceptable answers were recorded.
    NoKey,
    /// The user must name at least this many distinct acceptable answers.
    Multi(u32),
    /// The whole answer is matched against the key.
    Single,
}

impl From<&QuestionRecord> for GradingPolicy {
    fn from(q: &QuestionRecord) -> Self {
        if q.variable {
            GradingPolicy::Variable
        } else if q.requires_current_info {
            GradingPolicy::CurrentInfo
        } else if q.acceptable_answers.is_empty() {
            GradingPolicy::NoKey
        } else {
            match q.min_answers_required {
                Some(min) if min > 1 => GradingPolicy::Multi(min),
                _ => GradingPolicy::Single,
            }
        }
    }
}

/// The outcome of grading one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeResult {
    /// `Some(true)` correct, `Some(false)` incorrect, `None` undecidable.
    pub correct: Option<bool>,
    /// The user's answer as submitted.
    #[serde(default)]
    pub input: String,
    /// Human-readable explanation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    /// Set exactly when `correct` is `None`.
    #[serde(default, skip_serializing_if = "is_false")]
    pub requires_manual_review: bool,
    /// Acceptable answers the input matched.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matched_answers: Vec<String>,
    /// Distinct matches on a failed multi-answer attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_count: Option<usize>,
    /// Required matches on a failed multi-answer attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<usize>,
}

impl GradeResult {
    pub fn correct(input: impl Into<String>) -> Self {
        Self::with_verdict(Some(true), input)
    }

    pub fn incorrect(input: impl Into<String>) -> Self {
        Self::with_verdict(Some(false), input)
    }

    pub fn needs_review(input: impl Into<String>) -> Self {
        Self::with_verdict(None, input)
    }

    fn with_verdict(correct: Option<bool>, input: impl Into<String>) -> Self {
        Self {
            correct,
            input: input.into(),
            feedback: None,
            requires_manual_review: correct.is_none(),
            matched_answers: Vec::new(),
            matched_count: None,
            required: None,
        }
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }

    pub fn with_matches(mut self, matched: Vec<String>) -> Self {
        self.matched_answers = matched;
        self
    }

    /// Typed view of `correct`.
    pub fn verdict(&self) -> Verdict {
        match self.correct {
            Some(true) => Verdict::Correct,
            Some(false) => Verdict::Incorrect,
            None => Verdict::NeedsReview,
        }
    }
}

/// Three-way grading outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    Correct,
    Incorrect,
    NeedsReview,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Correct => write!(f, "correct"),
            Verdict::Incorrect => write!(f, "incorrect"),
            Verdict::NeedsReview => write!(f, "needs review"),
        }
    }
}

/// Which answers a batch run sends to the external judge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewMode {
    /// Never call the judge.
    #[default]
    Local,
    /// Call the judge only for answers the local grader cannot decide.
    Fallback,
    /// Call the judge for every non-empty answer.
    Judge,
}

impl fmt::Display for ReviewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewMode::Local => write!(f, "local"),
            ReviewMode::Fallback => write!(f, "fallback"),
            ReviewMode::Judge => write!(f, "judge"),
        }
    }
}

impl FromStr for ReviewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(ReviewMode::Local),
            "fallback" | "review" => Ok(ReviewMode::Fallback),
            "judge" | "remote" => Ok(ReviewMode::Judge),
            other => Err(format!("unknown review mode: {other}")),
        }
    }
}
