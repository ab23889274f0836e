mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "codemode-cli")]
#[command(about = "Codemode CLI - Check answers, compare outputs and inspect the language table", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a submission against a question from a local questions file
    Check {
        /// JSON file mapping question ids to question documents
        #[arg(short, long)]
        questions: PathBuf,

        /// Question id to check against
        #[arg(short = 'i', long)]
        question_id: String,

        /// Submission language (e.g., python, cpp, java)
        #[arg(short, long)]
        language: String,

        /// Source file of the submission
        #[arg(short, long)]
        code: PathBuf,

        /// Language table file (defaults to LANGUAGE_CONFIG_PATH or the built-in table)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Comparison mode (exact, trimmed, ignore_whitespace, json, numeric)
        #[arg(short, long, default_value = "trimmed")]
        mode: String,
    },

    /// Compare two outputs under a comparison mode
    Compare {
        /// File holding the expected output
        #[arg(short, long)]
        expected: PathBuf,

        /// File holding the actual output
        #[arg(short, long)]
        actual: PathBuf,

        /// Comparison mode (exact, trimmed, ignore_whitespace, json, numeric)
        #[arg(short, long, default_value = "trimmed")]
        mode: String,

        /// Numeric tolerance for the numeric mode
        #[arg(short, long, default_value_t = codemode_judge::DEFAULT_TOLERANCE)]
        tolerance: f64,
    },

    /// List the languages the executor mapping supports
    Languages {
        /// Language table file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            questions,
            question_id,
            language,
            code,
            config,
            mode,
        } => {
            let passed = commands::check_answer(
                &questions,
                &question_id,
                &language,
                &code,
                config.as_deref(),
                &mode,
            )
            .await?;
            if !passed {
                std::process::exit(1);
            }
        }
        Commands::Compare {
            expected,
            actual,
            mode,
            tolerance,
        } => {
            if !commands::compare_outputs(&expected, &actual, &mode, tolerance)? {
                std::process::exit(1);
            }
        }
        Commands::Languages { config } => {
            commands::list_languages(config.as_deref())?;
        }
    }

    Ok(())
}
