//! The `civiq init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("civiq.toml").exists() {
        println!("civiq.toml already exists, skipping.");
    } else {
        std::fs::write("civiq.toml", SAMPLE_CONFIG)?;
        println!("Created civiq.toml");
    }

    let answers_path = std::path::Path::new("answers.toml");
    if answers_path.exists() {
        println!("answers.toml already exists, skipping.");
    } else {
        std::fs::write(answers_path, SAMPLE_ANSWERS)?;
        println!("Created answers.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: civiq parse --input civics.txt --output civics.json");
    println!("  2. Run: civiq validate --bank civics.json");
    println!("  3. Run: civiq check --bank civics.json --answers answers.toml");
    println!("  4. Set CIVIQ_GEMINI_KEY and pass --mode fallback to judge current-info answers");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# civiq configuration

# local: grade offline only
# fallback: ask the judge when the local grader cannot decide
# judge: ask the judge for every answer
review_mode = "local"
parallelism = 4
max_retries = 3
retry_delay_ms = 1000

[judge]
type = "gemini"
api_key = "${GEMINI_API_KEY}"
model = "gemini-2.5-flash-lite"
"#;

const SAMPLE_ANSWERS: &str = r#"# One [[answers]] table per question you want graded.

[[answers]]
id = 1
answer = "Republic"

[[answers]]
id = 9
answer = "freedom of speech and freedom of religion"
"#;
