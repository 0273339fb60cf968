//! The `civiq grade` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use civiq_core::bank::QuestionBank;
use civiq_core::report::{GradedBy, ReportEntry};

use super::build_runner;

pub async fn execute(
    bank_path: PathBuf,
    id: u32,
    answer: String,
    mode: Option<String>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let bank = QuestionBank::load(&bank_path)?;
    let question = bank
        .get(id)
        .with_context(|| format!("no question with id {id} in {}", bank_path.display()))?;

    let (runner, mode) = build_runner(mode.as_deref(), config_path.as_deref())?;
    let entry = runner.review(question, &answer, mode).await?;

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&entry)?),
        _ => print_entry(&entry),
    }

    Ok(())
}

fn print_entry(entry: &ReportEntry) {
    println!("Q{}: {}", entry.question_id, entry.question);

    let by = match entry.graded_by {
        GradedBy::Local => "local",
        GradedBy::Judge => "judge",
    };
    println!("Verdict: {} ({by})", entry.result.verdict());

    if let Some(feedback) = &entry.result.feedback {
        println!("Feedback: {feedback}");
    }
    if !entry.result.matched_answers.is_empty() {
        println!("Matched: {}", entry.result.matched_answers.join("; "));
    }
    if let Some(err) = &entry.judge_error {
        println!("Judge error: {err}");
    }
}
