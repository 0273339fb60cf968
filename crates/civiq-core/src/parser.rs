//! Civics question-bank parser.
//!
//! Turns the printed test layout (section headers, lettered subsections,
//! numbered questions and bulleted answers) into [`QuestionRecord`]s, and
//! validates the resulting bank.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

use crate::bank::QuestionBank;
use crate::grader::normalize;
use crate::model::QuestionRecord;

static SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z\s]+$").expect("section pattern is valid"));
static SUBSECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]:\s+(.*)$").expect("subsection pattern is valid"));
static QUESTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.\s+(.*)$").expect("question pattern is valid"));
static NAME_QUANTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bname (one|two|three|four|five)\b").expect("quantifier pattern is valid")
});
static ANSWERS_VARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)answers will vary").expect("vary pattern is valid"));

/// Bullet glyphs treated as a leading `-`.
const BULLETS: &[char] = &['•', '▪', '◦', '‣', '●', '–', '—'];

/// Classification of one trimmed source line.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Section(&'a str),
    Subsection(&'a str),
    Question { id: u32, text: &'a str },
    Answer(&'a str),
    Other,
}

fn classify(line: &str) -> Line<'_> {
    if line.len() > 3 && SECTION.is_match(line) {
        return Line::Section(line);
    }
    if let Some(caps) = SUBSECTION.captures(line) {
        if let Some(title) = caps.get(1) {
            return Line::Subsection(title.as_str());
        }
    }
    if let Some(caps) = QUESTION.captures(line) {
        // Numbers too large for u32 are not question numbers.
        if let (Some(id), Some(text)) = (caps.get(1), caps.get(2)) {
            if let Ok(id) = id.as_str().parse() {
                return Line::Question {
                    id,
                    text: text.as_str().trim(),
                };
            }
        }
    }
    if let Some(rest) = line.strip_prefix('-') {
        return Line::Answer(rest.trim());
    }
    Line::Other
}

/// Detect a "name two/three/..." quantifier. Returns the count only when
/// the question asks for more than one item.
pub fn detect_min_answers(question: &str) -> Option<u32> {
    let word = NAME_QUANTIFIER.captures(question)?.get(1)?;
    let count = match word.as_str().to_lowercase().as_str() {
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        _ => return None,
    };
    (count > 1).then_some(count)
}

/// Whether the question asks about a current officeholder ("...now?").
pub fn is_current_info_question(question: &str) -> bool {
    question.to_lowercase().ends_with("now?")
}

fn normalize_bullet(line: &str) -> std::borrow::Cow<'_, str> {
    match line.strip_prefix(BULLETS) {
        Some(rest) => format!("-{rest}").into(),
        None => line.into(),
    }
}

fn start_question(
    id: u32,
    text: &str,
    section: &Option<String>,
    subsection: &Option<String>,
) -> QuestionRecord {
    let (text, starred) = match text.strip_suffix('*') {
        Some(rest) => (rest.trim_end(), true),
        None => (text, false),
    };

    let mut record = QuestionRecord::new(id, text);
    record.section = section.clone();
    record.subsection = subsection.clone();
    record.starred = starred;
    record.min_answers_required = detect_min_answers(text);
    record.requires_current_info = is_current_info_question(text);
    record
}

/// Parse question-bank text into records, in source order.
///
/// Lines that are not headers, questions or answers are ignored, so this
/// never fails; a malformed document simply yields fewer records.
pub fn parse_question_bank_str(text: &str) -> Vec<QuestionRecord> {
    let mut records = Vec::new();
    let mut section: Option<String> = None;
    let mut subsection: Option<String> = None;
    let mut current: Option<QuestionRecord> = None;

    for raw in text.lines() {
        let raw = raw.replace('\r', "");
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        let line = normalize_bullet(trimmed);

        match classify(&line) {
            Line::Section(name) => {
                section = Some(name.to_string());
                subsection = None;
            }
            Line::Subsection(title) => {
                subsection = Some(title.to_string());
            }
            Line::Question { id, text } => {
                if let Some(done) = current.take() {
                    records.push(done);
                }
                current = Some(start_question(id, text, &section, &subsection));
            }
            Line::Answer(answer) => {
                let Some(question) = current.as_mut() else {
                    continue;
                };
                if ANSWERS_VARY.is_match(answer) {
                    question.variable = true;
                } else {
                    question.acceptable_answers.push(answer.to_string());
                }
            }
            Line::Other => {}
        }
    }

    if let Some(done) = current {
        records.push(done);
    }

    records
}

/// Read and parse a question-bank text file.
pub fn parse_question_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question source: {}", path.display()))?;

    let questions = parse_question_bank_str(&content);
    tracing::debug!(
        "parsed {} questions from {}",
        questions.len(),
        path.display()
    );

    Ok(QuestionBank::new(questions))
}

/// A warning from question-bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<u32>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn question(id: u32, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(id),
            message: message.into(),
        }
    }
}

/// Validate a parsed bank for common issues.
///
/// Parsing silently drops lines it cannot classify, so `expected_count`
/// lets callers catch a truncated corpus.
pub fn validate_bank(
    questions: &[QuestionRecord],
    expected_count: Option<usize>,
) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if let Some(expected) = expected_count {
        if questions.len() != expected {
            warnings.push(ValidationWarning {
                question_id: None,
                message: format!("expected {expected} questions, found {}", questions.len()),
            });
        }
    }

    let mut seen_ids = HashSet::new();
    for q in questions {
        if !seen_ids.insert(q.id) {
            warnings.push(ValidationWarning::question(
                q.id,
                format!("duplicate question ID: {}", q.id),
            ));
        }
    }

    for q in questions {
        if q.question.trim().is_empty() {
            warnings.push(ValidationWarning::question(q.id, "question text is empty"));
        }

        if q.acceptable_answers.iter().any(|a| normalize(a).is_empty()) {
            warnings.push(ValidationWarning::question(
                q.id,
                "empty acceptable answer; every response will match it",
            ));
        }

        let keyed = !q.acceptable_answers.is_empty();
        if !keyed && !q.variable && !q.requires_current_info {
            warnings.push(ValidationWarning::question(
                q.id,
                "no acceptable answers; every response will be graded incorrect",
            ));
        }
        if keyed && q.variable {
            warnings.push(ValidationWarning::question(
                q.id,
                "variable question also lists acceptable answers; they will be ignored",
            ));
        }
        if keyed && q.requires_current_info {
            warnings.push(ValidationWarning::question(
                q.id,
                "current-info question also lists acceptable answers; they will be ignored",
            ));
        }

        if let Some(min) = q.min_answers_required {
            if min as usize > q.acceptable_answers.len() && !q.variable && !q.requires_current_info
            {
                warnings.push(ValidationWarning::question(
                    q.id,
                    format!(
                        "requires {min} answers but only {} are acceptable",
                        q.acceptable_answers.len()
                    ),
                ));
            }
        }
    }

    warnings
}
