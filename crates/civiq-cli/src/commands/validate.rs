//! The `civiq validate` command.

use std::path::PathBuf;

use anyhow::Result;

use civiq_core::bank::QuestionBank;
use civiq_core::parser::validate_bank;

pub fn execute(bank_path: PathBuf, expect_count: Option<usize>) -> Result<()> {
    let bank = QuestionBank::load(&bank_path)?;

    println!(
        "Question bank: {} ({} questions, {} starred)",
        bank_path.display(),
        bank.len(),
        bank.starred().count()
    );

    let warnings = validate_bank(bank.questions(), expect_count);
    for w in &warnings {
        let prefix = w
            .question_id
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Question bank valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
