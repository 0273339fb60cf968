//! civiq CLI — parse the civics question bank and grade answers.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "civiq",
    version,
    about = "Civics test question-bank parser and answer grader"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a question-bank text file into JSON
    Parse {
        /// Text source in the printed civics test layout
        #[arg(long)]
        input: PathBuf,

        /// Output JSON path (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate a question bank
    Validate {
        /// Question bank (.json, or .txt to parse on the fly)
        #[arg(long)]
        bank: PathBuf,

        /// Warn unless the bank has exactly this many questions
        #[arg(long)]
        expect_count: Option<usize>,
    },

    /// List questions in a bank
    List {
        /// Question bank (.json or .txt)
        #[arg(long)]
        bank: PathBuf,

        /// Only questions in this section
        #[arg(long)]
        section: Option<String>,

        /// Only starred questions
        #[arg(long)]
        starred: bool,
    },

    /// Grade a single answer
    Grade {
        /// Question bank (.json or .txt)
        #[arg(long)]
        bank: PathBuf,

        /// Question number
        #[arg(long)]
        id: u32,

        /// The answer to grade
        #[arg(long)]
        answer: String,

        /// Review mode: local, fallback, judge (default: from config)
        #[arg(long)]
        mode: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Grade a file of answers
    Check {
        /// Question bank (.json or .txt)
        #[arg(long)]
        bank: PathBuf,

        /// Answers file (TOML with [[answers]] id/answer entries)
        #[arg(long)]
        answers: PathBuf,

        /// Review mode: local, fallback, judge (default: from config)
        #[arg(long)]
        mode: Option<String>,

        /// Directory to save the JSON report in
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and sample answers file
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("civiq=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse { input, output } => commands::parse::execute(input, output),
        Commands::Validate { bank, expect_count } => {
            commands::validate::execute(bank, expect_count)
        }
        Commands::List {
            bank,
            section,
            starred,
        } => commands::list::execute(bank, section, starred),
        Commands::Grade {
            bank,
            id,
            answer,
            mode,
            format,
            config,
        } => commands::grade::execute(bank, id, answer, mode, format, config).await,
        Commands::Check {
            bank,
            answers,
            mode,
            output,
            format,
            config,
        } => commands::check::execute(bank, answers, mode, output, format, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
