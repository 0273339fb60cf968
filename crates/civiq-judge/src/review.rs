//! Batch review runner.
//!
//! Grades submitted answers locally, then routes the answers selected by the
//! [`ReviewMode`] to an external judge with bounded parallelism and retries.
//! A judge failure never fails the batch; the entry keeps its local result.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use civiq_core::bank::QuestionBank;
use civiq_core::error::JudgeError;
use civiq_core::grader::grade;
use civiq_core::model::{GradeResult, QuestionRecord, ReviewMode};
use civiq_core::report::{BankSummary, GradeReport, GradedBy, ReportEntry};
use civiq_core::traits::{AnswerJudge, JudgeRequest, JudgeVerdict};

const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Configuration for the review runner.
#[derive(Debug, Clone)]
pub struct ReviewConfig {
    /// Maximum concurrent judge calls.
    pub parallelism: usize,
    /// Retries on transient judge errors.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further retry.
    pub retry_delay: Duration,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            parallelism: 4,
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// One answer to grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Question number in the bank.
    pub id: u32,
    /// The user's answer.
    #[serde(default)]
    pub answer: String,
}

/// Answers file layout: `[[answers]]` tables with `id` and `answer`.
#[derive(Debug, Deserialize)]
pub struct AnswerSheet {
    #[serde(default)]
    pub answers: Vec<Submission>,
}

impl AnswerSheet {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Grades answers locally and consults a judge according to a review mode.
pub struct ReviewRunner {
    judge: Option<Arc<dyn AnswerJudge>>,
    semaphore: Semaphore,
    config: ReviewConfig,
}

impl ReviewRunner {
    pub fn new(judge: Option<Arc<dyn AnswerJudge>>, config: ReviewConfig) -> Self {
        Self {
            judge,
            semaphore: Semaphore::new(config.parallelism.max(1)),
            config,
        }
    }

    /// A runner that never calls a judge.
    pub fn local() -> Self {
        Self::new(None, ReviewConfig::default())
    }

    /// Grade one answer, consulting the judge if `mode` selects it.
    pub async fn review(
        &self,
        question: &QuestionRecord,
        answer: &str,
        mode: ReviewMode,
    ) -> Result<ReportEntry> {
        let judge = self.judge_for(mode)?;
        Ok(self.review_with(judge, question, answer, mode).await)
    }

    /// Grade a batch of submissions against `bank`.
    pub async fn run(
        &self,
        bank: &QuestionBank,
        source: &str,
        submissions: &[Submission],
        mode: ReviewMode,
    ) -> Result<GradeReport> {
        let judge = self.judge_for(mode)?;

        let questions = submissions
            .iter()
            .map(|s| {
                bank.get(s.id)
                    .ok_or_else(|| anyhow::anyhow!("no question with id {} in {source}", s.id))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut futures = FuturesUnordered::new();
        for (index, (submission, question)) in submissions.iter().zip(questions).enumerate() {
            futures.push(async move {
                let entry = self
                    .review_with(judge, question, &submission.answer, mode)
                    .await;
                (index, entry)
            });
        }

        let mut entries: Vec<Option<ReportEntry>> = vec![None; submissions.len()];
        while let Some((index, entry)) = futures.next().await {
            entries[index] = Some(entry);
        }

        let entries: Vec<ReportEntry> = entries.into_iter().flatten().collect();
        let report = GradeReport::new(
            BankSummary {
                source: source.to_string(),
                question_count: bank.len(),
            },
            mode,
            entries,
        );

        tracing::info!(
            "graded {} answers ({} judged, {} judge errors)",
            report.summary.total,
            report.summary.judged,
            report.summary.judge_errors
        );

        Ok(report)
    }

    fn judge_for(&self, mode: ReviewMode) -> Result<Option<&dyn AnswerJudge>> {
        match (mode, &self.judge) {
            (ReviewMode::Local, _) => Ok(None),
            (_, Some(judge)) => Ok(Some(judge.as_ref())),
            (_, None) => anyhow::bail!("review mode '{mode}' requires a configured judge"),
        }
    }

    async fn review_with(
        &self,
        judge: Option<&dyn AnswerJudge>,
        question: &QuestionRecord,
        answer: &str,
        mode: ReviewMode,
    ) -> ReportEntry {
        let local = grade(answer, question);
        let mut entry = ReportEntry {
            question_id: question.id,
            question: question.question.clone(),
            result: local,
            graded_by: GradedBy::Local,
            judge_error: None,
        };

        let Some(judge) = judge else {
            return entry;
        };
        if !needs_judge(mode, answer, &entry.result) {
            return entry;
        }

        let request = JudgeRequest::new(answer, question);
        match self.judge_with_retry(judge, &request).await {
            Ok(verdict) => {
                entry.result = verdict.into_grade_result(answer);
                entry.graded_by = GradedBy::Judge;
            }
            Err(e) => {
                tracing::warn!(
                    "judge '{}' failed for question {}: {e:#}",
                    judge.name(),
                    question.id
                );
                entry.judge_error = Some(e.to_string());
            }
        }
        entry
    }

    async fn judge_with_retry(
        &self,
        judge: &dyn AnswerJudge,
        request: &JudgeRequest,
    ) -> Result<JudgeVerdict> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| anyhow::anyhow!("semaphore closed"))?;

        let mut last_error = None;
        let mut retry_delay = self.config.retry_delay;
        for retry in 0..=self.config.max_retries {
            if retry > 0 {
                tokio::time::sleep(retry_delay).await;
                retry_delay = (retry_delay * 2).min(MAX_RETRY_DELAY);
            }
            match judge.judge(request).await {
                Ok(verdict) => return Ok(verdict),
                Err(e) => {
                    if let Some(judge_err) = e.downcast_ref::<JudgeError>() {
                        if judge_err.is_permanent() {
                            return Err(e);
                        }
                        if let Some(ms) = judge_err.retry_after_ms() {
                            retry_delay = Duration::from_millis(ms);
                        }
                    }
                    tracing::debug!("judge attempt {} failed: {e}", retry + 1);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("unknown judge error")))
    }
}

/// Whether `mode` routes this answer to the judge.
fn needs_judge(mode: ReviewMode, answer: &str, local: &GradeResult) -> bool {
    match mode {
        ReviewMode::Local => false,
        ReviewMode::Fallback => local.requires_manual_review,
        ReviewMode::Judge => !answer.trim().is_empty(),
    }
}
