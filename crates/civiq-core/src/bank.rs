//! The parsed question bank with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::QuestionRecord;
use crate::parser::parse_question_bank;

/// An ordered collection of question records.
///
/// Serializes as a bare JSON array, the format written by `civiq parse`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionBank {
    questions: Vec<QuestionRecord>,
}

impl QuestionBank {
    pub fn new(questions: Vec<QuestionRecord>) -> Self {
        Self { questions }
    }

    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Look up a question by its source number.
    pub fn get(&self, id: u32) -> Option<&QuestionRecord> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Questions marked with `*` in the source.
    pub fn starred(&self) -> impl Iterator<Item = &QuestionRecord> {
        self.questions.iter().filter(|q| q.starred)
    }

    /// Questions whose section matches `section`, ignoring case.
    pub fn in_section<'a>(&'a self, section: &'a str) -> impl Iterator<Item = &'a QuestionRecord> {
        self.questions.iter().filter(move |q| {
            q.section
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case(section))
        })
    }

    /// Save the bank as pretty-printed JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize question bank")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write question bank to {}", path.display()))?;
        Ok(())
    }

    /// Load a bank from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read question bank from {}", path.display()))?;
        let bank: QuestionBank = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse question bank JSON: {}", path.display()))?;
        Ok(bank)
    }

    /// Load a bank from JSON, or parse it on the fly from a `.txt` source.
    pub fn load(path: &Path) -> Result<Self> {
        if path.extension().is_some_and(|ext| ext == "txt") {
            parse_question_bank(path)
        } else {
            Self::load_json(path)
        }
    }
}

impl From<Vec<QuestionRecord>> for QuestionBank {
    fn from(questions: Vec<QuestionRecord>) -> Self {
        Self::new(questions)
    }
}

impl<'a> IntoIterator for &'a QuestionBank {
    type Item = &'a QuestionRecord;
    type IntoIter = std::slice::Iter<'a, QuestionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}
