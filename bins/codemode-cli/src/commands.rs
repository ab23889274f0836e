// CLI commands for checking answers locally
use anyhow::{anyhow, Context, Result};
use codemode_common::types::ComparisonMode;
use codemode_common::Config;
use codemode_judge::{compare, InMemoryCatalog, LanguageTable, RemoteEngine, Verifier};
use std::fs;
use std::path::Path;
use std::sync::Arc;

fn parse_mode(mode: &str) -> Result<ComparisonMode> {
    mode.parse::<ComparisonMode>().map_err(|e| anyhow!(e))
}

fn load_languages(config: Option<&Path>) -> Result<LanguageTable> {
    match config {
        Some(path) => LanguageTable::load(path),
        None => {
            let default = Config::from_env().language_config_path;
            LanguageTable::load_or_builtin(Path::new(&default))
        }
    }
}

/// Run a real verification against the configured executor
///
/// Prints the verification result as JSON and returns whether every test passed.
pub async fn check_answer(
    questions: &Path,
    question_id: &str,
    language: &str,
    code_path: &Path,
    config: Option<&Path>,
    mode: &str,
) -> Result<bool> {
    let mode = parse_mode(mode)?;
    let settings = Config::from_env();
    let languages = load_languages(config)?;

    let catalog = InMemoryCatalog::load(questions)?;
    let code = fs::read_to_string(code_path)
        .with_context(|| format!("Failed to read source file {}", code_path.display()))?;

    eprintln!(
        "Checking {} ({}) against question {} on {}",
        code_path.display(),
        language,
        question_id,
        settings.submit_url()
    );

    let engine = RemoteEngine::from_config(&settings, languages);
    let verifier = Verifier::new(Arc::new(engine), Arc::new(catalog))
        .with_comparison_mode(mode)
        .with_max_parallel_tests(settings.max_parallel_tests);

    let result = verifier.check_answer(&code, language, question_id).await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    eprintln!("{}/{} tests passed", result.passed_count, result.total);

    Ok(result.overall_passed)
}

/// Compare two output files; prints `match` or `mismatch`
pub fn compare_outputs(expected: &Path, actual: &Path, mode: &str, tolerance: f64) -> Result<bool> {
    let mode = parse_mode(mode)?;
    let expected = fs::read_to_string(expected)
        .with_context(|| format!("Failed to read {}", expected.display()))?;
    let actual = fs::read_to_string(actual)
        .with_context(|| format!("Failed to read {}", actual.display()))?;

    let matched = compare(&expected, &actual, mode, tolerance);
    println!("{}", if matched { "match" } else { "mismatch" });
    Ok(matched)
}

pub fn list_languages(config: Option<&Path>) -> Result<()> {
    let table = load_languages(config)?;

    println!("Language table {}", table.version());
    for name in table.languages() {
        let code = table.resolve(name)?;
        println!("  {:<12} {}", name, code);
    }
    Ok(())
}
