//! The `civiq parse` command.

use std::path::PathBuf;

use anyhow::Result;

use civiq_core::parser::parse_question_bank;

pub fn execute(input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let bank = parse_question_bank(&input)?;

    match &output {
        Some(path) => {
            bank.save_json(path)?;
            eprintln!(
                "Parsed {} questions -> {}",
                bank.len(),
                path.display()
            );
        }
        None => {
            println!("{}", serde_json::to_string_pretty(&bank)?);
            eprintln!("Parsed {} questions", bank.len());
        }
    }

    if bank.is_empty() {
        eprintln!(
            "Warning: no questions found in {}; check the input layout.",
            input.display()
        );
    }

    Ok(())
}
