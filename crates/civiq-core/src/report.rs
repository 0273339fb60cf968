//! Grade report types with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{GradeResult, ReviewMode, Verdict};

/// The outcome of grading a batch of answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Which bank the answers were graded against.
    pub bank: BankSummary,
    /// How answers were routed to the judge.
    pub mode: ReviewMode,
    /// One entry per submitted answer, in submission order.
    pub entries: Vec<ReportEntry>,
    /// Counts over `entries`.
    pub summary: ReportSummary,
}

/// Summary of the question bank (without the records).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankSummary {
    pub source: String,
    pub question_count: usize,
}

/// Who produced an entry's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradedBy {
    Local,
    Judge,
}

/// One graded answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEntry {
    pub question_id: u32,
    pub question: String,
    pub result: GradeResult,
    pub graded_by: GradedBy,
    /// Set when the judge was asked but failed; `result` is then local.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub judge_error: Option<String>,
}

/// Aggregate counts for a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub needs_review: usize,
    pub judged: usize,
    pub judge_errors: usize,
}

impl ReportSummary {
    pub fn from_entries(entries: &[ReportEntry]) -> Self {
        let mut summary = ReportSummary {
            total: entries.len(),
            ..Default::default()
        };
        for entry in entries {
            match entry.result.verdict() {
                Verdict::Correct => summary.correct += 1,
                Verdict::Incorrect => summary.incorrect += 1,
                Verdict::NeedsReview => summary.needs_review += 1,
            }
            if entry.graded_by == GradedBy::Judge {
                summary.judged += 1;
            }
            if entry.judge_error.is_some() {
                summary.judge_errors += 1;
            }
        }
        summary
    }

    /// Fraction of decided answers that were correct.
    pub fn score(&self) -> f64 {
        let decided = self.correct + self.incorrect;
        if decided == 0 {
            0.0
        } else {
            self.correct as f64 / decided as f64
        }
    }
}

impl GradeReport {
    /// Build a report, computing the summary from `entries`.
    pub fn new(bank: BankSummary, mode: ReviewMode, entries: Vec<ReportEntry>) -> Self {
        let summary = ReportSummary::from_entries(&entries);
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            bank,
            mode,
            entries,
            summary,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: GradeReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
