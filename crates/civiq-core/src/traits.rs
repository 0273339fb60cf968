//! The external answer-judge seam.
//!
//! A judge is an alternative grading strategy with its own contract: it
//! receives the answer, the question text and the answer key, and returns a
//! boolean-or-null verdict. Implementations live in `civiq-judge`; the local
//! grader never calls one.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::{GradeResult, QuestionRecord};

// ---------------------------------------------------------------------------
// Judge trait
// ---------------------------------------------------------------------------

/// Trait for external services that judge free-text answers.
#[async_trait]
pub trait AnswerJudge: Send + Sync {
    /// Human-readable judge name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Ask for a verdict on one answer.
    async fn judge(&self, request: &JudgeRequest) -> anyhow::Result<JudgeVerdict>;
}

/// A single answer to judge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeRequest {
    /// The user's answer.
    pub answer: String,
    /// The question text.
    pub question: String,
    /// Canonical answers from the key (may be empty).
    #[serde(default)]
    pub acceptable_answers: Vec<String>,
}

impl JudgeRequest {
    pub fn new(answer: impl Into<String>, question: &QuestionRecord) -> Self {
        Self {
            answer: answer.into(),
            question: question.question.clone(),
            acceptable_answers: question.acceptable_answers.clone(),
        }
    }

    /// The user prompt sent alongside [`JUDGE_INSTRUCTION`].
    pub fn prompt(&self) -> String {
        format!(
            "Question: {}\nActual answers: {}\nUser's answer: {}",
            self.question,
            self.acceptable_answers.join(", "),
            self.answer
        )
    }
}

/// A judge's decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeVerdict {
    /// `None` when the reply could not be read as a verdict.
    pub correct: Option<bool>,
    /// The raw reply text.
    pub raw: String,
    /// Round-trip latency in milliseconds.
    pub latency_ms: u64,
}

impl JudgeVerdict {
    pub fn from_reply(raw: impl Into<String>, latency_ms: u64) -> Self {
        let raw = raw.into();
        Self {
            correct: parse_verdict(&raw),
            raw,
            latency_ms,
        }
    }

    /// Express the verdict in the local grader's result shape.
    pub fn into_grade_result(self, answer: &str) -> GradeResult {
        match self.correct {
            Some(true) => GradeResult::correct(answer),
            Some(false) => GradeResult::incorrect(answer),
            None => GradeResult::needs_review(answer)
                .with_feedback(format!("Judge reply was not a verdict: {}", self.raw.trim())),
        }
    }
}

// ---------------------------------------------------------------------------
// Judge instruction
// ---------------------------------------------------------------------------

/// System instruction for LLM-backed judges.
pub const JUDGE_INSTRUCTION: &str = "You are an evaluator for U.S. civics test answers. You will be given a question, the correct answers, and a user's answer. You must determine if the user's answer is correct.

Guidelines:
- The user's answer must not contain any incorrect information. If the user provides a list of items, all items in that list must be correct.
- The answer doesn't need to match exactly - understand what the user means from context
- For names of people: accept minor misspellings, different name orders (FirstName LastName vs LastName FirstName), and partial matches if the person is clearly identifiable
- For questions about representatives/senators/governors: if the user names a correct person for ANY state/district, mark it correct (since the question asks about \"your\" state)
- Be lenient with spelling variations but strict about the actual content being correct
- The answer can't be too vague or generic
- You should only compare the users answer to the Actual answers
- You should judge in what cases the user provided enough information for the answer to be considered correct, and when it's not enough
- You should judge the answer the same way an average officer on the naturalization interview would judge it

Reply only with the word \"Correct\" for a correct user's answer or the word \"Incorrect\" for an incorrect user's answer.";

/// Read a judge reply as a verdict.
///
/// Accepts "Correct" / "Incorrect" in any case, with surrounding whitespace
/// and an optional trailing period. Anything else is `None`.
pub fn parse_verdict(reply: &str) -> Option<bool> {
    let word = reply.trim().trim_end_matches('.').trim().to_lowercase();
    match word.as_str() {
        "correct" => Some(true),
        "incorrect" => Some(false),
        _ => None,
    }
}
