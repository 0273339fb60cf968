//! The `civiq check` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use civiq_core::bank::QuestionBank;
use civiq_core::report::{GradeReport, GradedBy};
use civiq_judge::AnswerSheet;

use super::build_runner;

pub async fn execute(
    bank_path: PathBuf,
    answers_path: PathBuf,
    mode: Option<String>,
    output: Option<PathBuf>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let bank = QuestionBank::load(&bank_path)?;

    let content = std::fs::read_to_string(&answers_path)
        .with_context(|| format!("failed to read answers file: {}", answers_path.display()))?;
    let sheet = AnswerSheet::from_toml_str(&content)
        .with_context(|| format!("failed to parse answers file: {}", answers_path.display()))?;
    anyhow::ensure!(
        !sheet.answers.is_empty(),
        "no answers found in {}",
        answers_path.display()
    );

    let (runner, mode) = build_runner(mode.as_deref(), config_path.as_deref())?;
    eprintln!(
        "civiq v{}: grading {} answers against {} questions (mode: {mode})",
        env!("CARGO_PKG_VERSION"),
        sheet.answers.len(),
        bank.len()
    );

    let source = bank_path.display().to_string();
    let report = runner.run(&bank, &source, &sheet.answers, mode).await?;

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print_summary(&report),
    }

    if let Some(dir) = &output {
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
        let path = dir.join(format!("report-{timestamp}.json"));
        report.save_json(&path)?;
        eprintln!("Report saved to: {}", path.display());
    }

    Ok(())
}

fn print_summary(report: &GradeReport) {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Answer", "Verdict", "By", "Feedback"]);

    for entry in &report.entries {
        let by = match entry.graded_by {
            GradedBy::Local => "local",
            GradedBy::Judge => "judge",
        };
        let feedback = entry
            .judge_error
            .as_ref()
            .map(|e| format!("judge error: {e}"))
            .or_else(|| entry.result.feedback.clone())
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(entry.question_id),
            Cell::new(&entry.result.input),
            Cell::new(entry.result.verdict()),
            Cell::new(by),
            Cell::new(feedback),
        ]);
    }

    println!("{table}");

    let s = &report.summary;
    println!(
        "Score: {}/{} correct ({:.1}%), {} need review",
        s.correct,
        s.correct + s.incorrect,
        s.score() * 100.0,
        s.needs_review
    );
    if s.judged > 0 || s.judge_errors > 0 {
        println!("Judge: {} judged, {} errors", s.judged, s.judge_errors);
    }
}
