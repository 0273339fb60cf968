//! Answer-grading engine.
//!
//! Grading is a pure function of the user's answer and the question record.
//! The question's [`GradingPolicy`] selects the strategy; every input,
//! however malformed, produces a [`GradeResult`].

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{GradeResult, GradingPolicy, QuestionRecord};

/// Minimum normalized length for a user answer to match as a fragment of a
/// longer acceptable answer.
pub const MIN_PARTIAL_MATCH_LEN: usize = 5;

pub const FEEDBACK_EMPTY: &str = "No answer provided.";
pub const FEEDBACK_VARIABLE: &str = "Answers may vary. Your response is acceptable.";
pub const FEEDBACK_CURRENT_INFO: &str = "This question requires current information.";
pub const FEEDBACK_NO_KEY: &str = "No grading data available.";
pub const FEEDBACK_NO_MATCH: &str = "That answer does not match an accepted response.";

static LIST_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i),| and |\n").expect("list separator pattern is valid"));

/// Grade `user_answer` against `question`.
pub fn grade(user_answer: &str, question: &QuestionRecord) -> GradeResult {
    if user_answer.trim().is_empty() {
        return GradeResult::incorrect("").with_feedback(FEEDBACK_EMPTY);
    }

    match question.policy() {
        GradingPolicy::Variable => GradeResult::correct("").with_feedback(FEEDBACK_VARIABLE),
        GradingPolicy::CurrentInfo => {
            GradeResult::needs_review(user_answer).with_feedback(FEEDBACK_CURRENT_INFO)
        }
        GradingPolicy::NoKey => GradeResult::incorrect(user_answer).with_feedback(FEEDBACK_NO_KEY),
        GradingPolicy::Multi(min) => grade_multi(user_answer, &question.acceptable_answers, min),
        GradingPolicy::Single => grade_single(user_answer, &question.acceptable_answers),
    }
}

fn grade_multi(user_answer: &str, acceptable: &[String], min: u32) -> GradeResult {
    let fragments = split_answer_list(user_answer);

    // Each distinct acceptable answer counts once, even if the key repeats it
    // or several fragments hit it.
    let mut matched: Vec<String> = Vec::new();
    for answer in acceptable {
        if !matched.contains(answer) && fragments.iter().any(|f| matches(f, answer)) {
            matched.push(answer.clone());
        }
    }

    let required = min.max(1) as usize;
    if matched.len() >= required {
        return GradeResult::correct(user_answer).with_matches(matched);
    }

    let count = matched.len();
    GradeResult {
        matched_count: Some(count),
        required: Some(required),
        ..GradeResult::incorrect(user_answer)
            .with_feedback(format!("You named {count}, but {required} are required."))
    }
}

fn grade_single(user_answer: &str, acceptable: &[String]) -> GradeResult {
    let answer = user_answer.trim();
    let matched: Vec<String> = acceptable
        .iter()
        .filter(|a| matches(answer, a))
        .cloned()
        .collect();

    if matched.is_empty() {
        GradeResult::incorrect(user_answer).with_feedback(FEEDBACK_NO_MATCH)
    } else {
        GradeResult::correct(user_answer).with_matches(matched)
    }
}

/// Split a free-text list ("speech, religion and press") into trimmed,
/// non-empty fragments.
pub fn split_answer_list(text: &str) -> Vec<&str> {
    LIST_SEPARATOR
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Lowercase, keep only ASCII word characters and whitespace, collapse
/// whitespace runs and trim.
pub fn normalize(text: &str) -> String {
    let kept: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Fuzzy answer comparison.
///
/// Matches when the normalized strings are equal, when the user's answer
/// contains the acceptable answer, or when the acceptable answer contains a
/// user answer of at least [`MIN_PARTIAL_MATCH_LEN`] characters. Only the
/// second containment direction is length-guarded, so an acceptable answer
/// that normalizes to nothing matches every input.
pub fn matches(user: &str, acceptable: &str) -> bool {
    let u = normalize(user);
    let a = normalize(acceptable);

    u == a || u.contains(&a) || (a.contains(&u) && u.len() >= MIN_PARTIAL_MATCH_LEN)
}
