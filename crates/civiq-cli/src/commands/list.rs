//! The `civiq list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use civiq_core::bank::QuestionBank;
use civiq_core::model::{GradingPolicy, QuestionRecord};

pub fn execute(bank_path: PathBuf, section: Option<String>, starred: bool) -> Result<()> {
    let bank = QuestionBank::load(&bank_path)?;

    let selected: Vec<&QuestionRecord> = match section.as_deref() {
        Some(s) => bank.in_section(s).filter(|q| !starred || q.starred).collect(),
        None if starred => bank.starred().collect(),
        None => bank.questions().iter().collect(),
    };

    let mut table = Table::new();
    table.set_header(vec!["ID", "Question", "Section", "Grading", "Answers"]);

    for q in &selected {
        let id = if q.starred {
            format!("{}*", q.id)
        } else {
            q.id.to_string()
        };
        table.add_row(vec![
            Cell::new(id),
            Cell::new(&q.question),
            Cell::new(q.section.as_deref().unwrap_or("-")),
            Cell::new(describe_policy(q.policy())),
            Cell::new(q.acceptable_answers.len()),
        ]);
    }

    println!("{table}");
    println!("{} of {} questions", selected.len(), bank.len());

    Ok(())
}

fn describe_policy(policy: GradingPolicy) -> String {
    match policy {
        GradingPolicy::Variable => "any answer".to_string(),
        GradingPolicy::CurrentInfo => "current info".to_string(),
        GradingPolicy::NoKey => "no key".to_string(),
        GradingPolicy::Multi(n) => format!("name {n}"),
        GradingPolicy::Single => "single".to_string(),
    }
}
