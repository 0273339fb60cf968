//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SAMPLE_BANK: &str = "../../question-banks/sample.txt";

fn civiq() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("civiq").unwrap();
    cmd.env_remove("CIVIQ_GEMINI_KEY");
    cmd
}

fn write_answers(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("answers.toml");
    std::fs::write(&path, body).unwrap();
    path
}

fn write_mock_config(dir: &Path, reply: &str) -> std::path::PathBuf {
    let path = dir.join("civiq.toml");
    std::fs::write(
        &path,
        format!("review_mode = \"local\"\n\n[judge]\ntype = \"mock\"\nreply = \"{reply}\"\n"),
    )
    .unwrap();
    path
}

#[test]
fn parse_to_stdout() {
    let output = civiq()
        .arg("parse")
        .arg("--input")
        .arg(SAMPLE_BANK)
        .assert()
        .success()
        .stderr(predicate::str::contains("Parsed 19 questions"))
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let questions = json.as_array().unwrap();
    assert_eq!(questions.len(), 19);
    assert_eq!(questions[1]["question"], "What is the supreme law of the land?");
    assert_eq!(questions[1]["starred"], true);
    assert_eq!(questions[8]["minAnswersRequired"], 2);
    assert_eq!(questions[10]["requiresCurrentInfo"], true);
    assert_eq!(questions[7]["variable"], true);
}

#[test]
fn parse_to_file_then_load_json() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("bank.json");

    civiq()
        .arg("parse")
        .arg("--input")
        .arg(SAMPLE_BANK)
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let bank = civiq_core::QuestionBank::load_json(&out).unwrap();
    assert_eq!(bank.len(), 19);
    assert_eq!(bank.get(12).unwrap().acceptable_answers, vec!["(Thomas) Jefferson"]);

    civiq()
        .arg("list")
        .arg("--bank")
        .arg(&out)
        .arg("--starred")
        .assert()
        .success()
        .stdout(predicate::str::contains("5 of 19 questions"));
}

#[test]
fn parse_empty_input_warns() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("empty.txt");
    std::fs::write(&input, "nothing to see here\n").unwrap();

    civiq()
        .arg("parse")
        .arg("--input")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"))
        .stderr(predicate::str::contains("no questions found"));
}

#[test]
fn validate_sample_bank() {
    civiq()
        .arg("validate")
        .arg("--bank")
        .arg(SAMPLE_BANK)
        .assert()
        .success()
        .stdout(predicate::str::contains("19 questions, 5 starred"))
        .stdout(predicate::str::contains("Question bank valid."));
}

#[test]
fn validate_reports_count_mismatch() {
    civiq()
        .arg("validate")
        .arg("--bank")
        .arg(SAMPLE_BANK)
        .arg("--expect-count")
        .arg("128")
        .assert()
        .success()
        .stdout(predicate::str::contains("expected 128 questions, found 19"))
        .stdout(predicate::str::contains("1 warning(s) found."));
}

#[test]
fn validate_nonexistent_file() {
    civiq()
        .arg("validate")
        .arg("--bank")
        .arg("nonexistent.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn list_by_section() {
    civiq()
        .arg("list")
        .arg("--bank")
        .arg(SAMPLE_BANK)
        .arg("--section")
        .arg("AMERICAN HISTORY")
        .assert()
        .success()
        .stdout(predicate::str::contains("Who wrote the Declaration of Independence?"))
        .stdout(predicate::str::contains("name 3"))
        .stdout(predicate::str::contains("5 of 19 questions"));
}

#[test]
fn list_starred_within_section() {
    civiq()
        .arg("list")
        .arg("--bank")
        .arg(SAMPLE_BANK)
        .arg("--section")
        .arg("american history")
        .arg("--starred")
        .assert()
        .success()
        .stdout(predicate::str::contains("12*"))
        .stdout(predicate::str::contains("16*"))
        .stdout(predicate::str::contains("When was the Declaration").not())
        .stdout(predicate::str::contains("2 of 19 questions"));
}

#[test]
fn grade_single_answer_text() {
    civiq()
        .arg("grade")
        .arg("--bank")
        .arg(SAMPLE_BANK)
        .arg("--id")
        .arg("12")
        .arg("--answer")
        .arg("jefferson")
        .assert()
        .success()
        .stdout(predicate::str::contains("Q12: Who wrote the Declaration of Independence?"))
        .stdout(predicate::str::contains("Verdict: correct (local)"))
        .stdout(predicate::str::contains("Matched: (Thomas) Jefferson"));
}

#[test]
fn grade_multi_answer_shortfall() {
    civiq()
        .arg("grade")
        .arg("--bank")
        .arg(SAMPLE_BANK)
        .arg("--id")
        .arg("14")
        .arg("--answer")
        .arg("Virginia and Ohio")
        .assert()
        .success()
        .stdout(predicate::str::contains("Verdict: incorrect"))
        .stdout(predicate::str::contains("You named 1, but 3 are required."));
}

#[test]
fn grade_json_output() {
    let output = civiq()
        .arg("grade")
        .arg("--bank")
        .arg(SAMPLE_BANK)
        .arg("--id")
        .arg("9")
        .arg("--answer")
        .arg("freedom of speech, freedom of the press")
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["questionId"], 9);
    assert_eq!(json["gradedBy"], "local");
    assert_eq!(json["result"]["correct"], true);
    assert_eq!(
        json["result"]["matchedAnswers"],
        serde_json::json!(["Speech", "Press"])
    );
}

#[test]
fn grade_current_info_needs_review_locally() {
    civiq()
        .arg("grade")
        .arg("--bank")
        .arg(SAMPLE_BANK)
        .arg("--id")
        .arg("7")
        .arg("--answer")
        .arg("Someone")
        .arg("--mode")
        .arg("local")
        .assert()
        .success()
        .stdout(predicate::str::contains("Verdict: needs review (local)"))
        .stdout(predicate::str::contains("requires current information"));
}

#[test]
fn grade_fallback_uses_configured_judge() {
    let dir = TempDir::new().unwrap();
    let config = write_mock_config(dir.path(), "Correct");

    civiq()
        .arg("grade")
        .arg("--bank")
        .arg(SAMPLE_BANK)
        .arg("--id")
        .arg("7")
        .arg("--answer")
        .arg("Someone")
        .arg("--mode")
        .arg("fallback")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Verdict: correct (judge)"));
}

#[test]
fn grade_judge_mode_without_judge_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("civiq.toml");
    std::fs::write(&config, "review_mode = \"judge\"\n").unwrap();

    civiq()
        .arg("grade")
        .arg("--bank")
        .arg(SAMPLE_BANK)
        .arg("--id")
        .arg("1")
        .arg("--answer")
        .arg("Republic")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires a configured judge"));
}

#[test]
fn grade_unknown_question() {
    civiq()
        .arg("grade")
        .arg("--bank")
        .arg(SAMPLE_BANK)
        .arg("--id")
        .arg("500")
        .arg("--answer")
        .arg("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no question with id 500"));
}

#[test]
fn grade_rejects_unknown_mode() {
    civiq()
        .arg("grade")
        .arg("--bank")
        .arg(SAMPLE_BANK)
        .arg("--id")
        .arg("1")
        .arg("--answer")
        .arg("Republic")
        .arg("--mode")
        .arg("psychic")
        .assert()
        .failure()
        .stderr(predicate::str::contains("psychic"));
}

#[test]
fn check_answers_file_and_save_report() {
    let dir = TempDir::new().unwrap();
    let answers = write_answers(
        dir.path(),
        r#"
[[answers]]
id = 1
answer = "Republic"

[[answers]]
id = 9
answer = "freedom of speech and freedom of religion"

[[answers]]
id = 11
answer = "Someone"

[[answers]]
id = 16
answer = "Grant"
"#,
    );
    let reports = dir.path().join("reports");

    civiq()
        .arg("check")
        .arg("--bank")
        .arg(SAMPLE_BANK)
        .arg("--answers")
        .arg(&answers)
        .arg("--mode")
        .arg("local")
        .arg("--output")
        .arg(&reports)
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 2/3 correct (66.7%), 1 need review"))
        .stderr(predicate::str::contains("Report saved to:"));

    let saved: Vec<_> = std::fs::read_dir(&reports)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(saved.len(), 1);

    let report = civiq_core::report::GradeReport::load_json(&saved[0]).unwrap();
    assert_eq!(report.summary.total, 4);
    assert_eq!(report.summary.correct, 2);
    assert_eq!(report.summary.incorrect, 1);
    assert_eq!(report.summary.needs_review, 1);
    assert_eq!(report.summary.judged, 0);
}

#[test]
fn check_json_with_mock_judge() {
    let dir = TempDir::new().unwrap();
    let config = write_mock_config(dir.path(), "Correct");
    let answers = write_answers(
        dir.path(),
        "[[answers]]\nid = 11\nanswer = \"Someone\"\n\n[[answers]]\nid = 12\nanswer = \"Jefferson\"\n",
    );

    let output = civiq()
        .arg("check")
        .arg("--bank")
        .arg(SAMPLE_BANK)
        .arg("--answers")
        .arg(&answers)
        .arg("--mode")
        .arg("fallback")
        .arg("--format")
        .arg("json")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["mode"], "fallback");
    assert_eq!(json["summary"]["correct"], 2);
    assert_eq!(json["summary"]["judged"], 1);
}

#[test]
fn check_unknown_question_fails() {
    let dir = TempDir::new().unwrap();
    let answers = write_answers(dir.path(), "[[answers]]\nid = 999\nanswer = \"x\"\n");

    civiq()
        .arg("check")
        .arg("--bank")
        .arg(SAMPLE_BANK)
        .arg("--answers")
        .arg(&answers)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no question with id 999"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    civiq()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created civiq.toml"))
        .stdout(predicate::str::contains("Created answers.toml"));

    assert!(dir.path().join("civiq.toml").exists());
    let config =
        civiq_judge::config::load_config_from(Some(&dir.path().join("civiq.toml"))).unwrap();
    assert_eq!(config.parallelism, 4);
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    civiq().current_dir(dir.path()).arg("init").assert().success();

    civiq()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn help_output() {
    civiq()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("question-bank parser"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn version_output() {
    civiq()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("civiq"));
}
