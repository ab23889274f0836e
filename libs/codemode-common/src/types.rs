use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Test Case Definition (Immutable Input)
/// Materialized per verification run from the question catalog.
/// `expected_output` is compared, never executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
    #[serde(default)]
    pub hidden: bool,
}

impl TestCase {
    pub fn visible(input: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            expected_output: expected_output.into(),
            hidden: false,
        }
    }

    pub fn hidden(input: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            expected_output: expected_output.into(),
            hidden: true,
        }
    }
}

/// Stored test item as the question catalog keeps it
/// (`output` is the expected output; `hidden` may be absent)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTest {
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Question as read from the catalog
/// Only the fields the judge needs; anything else in the document is ignored
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests: Option<Vec<StoredTest>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<StoredTest>>,
}

/// One (code, language, stdin) triple sent to the remote executor.
/// `language` is the canonical identifier; the executor code is resolved
/// by the client, never by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRequest {
    pub source_code: String,
    pub language: String,
    pub stdin: String,
}

impl ExecutionRequest {
    pub fn new(
        source_code: impl Into<String>,
        language: impl Into<String>,
        stdin: impl Into<String>,
    ) -> Self {
        Self {
            source_code: source_code.into(),
            language: language.into(),
            stdin: stdin.into(),
        }
    }
}

/// Normalized executor response
///
/// Every field is optional: a compile error, a runtime error, a clean run
/// and a sandbox timeout all produce differently shaped bodies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compile_output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_status: Option<serde_json::Value>,
}

impl ExecutionResult {
    /// Compiler diagnostics, if the executor reported any non-blank ones
    pub fn compile_error(&self) -> Option<&str> {
        non_blank(self.compile_output.as_deref())
    }

    /// Runtime diagnostics, if the executor reported any non-blank ones
    pub fn runtime_error(&self) -> Option<&str> {
        non_blank(self.stderr.as_deref())
    }

    /// Program output, empty when the executor produced none
    pub fn output(&self) -> &str {
        self.stdout.as_deref().unwrap_or("")
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Output comparison algorithm
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    Exact,
    #[default]
    #[serde(alias = "trim")]
    Trimmed,
    #[serde(alias = "ignoreWhitespace")]
    IgnoreWhitespace,
    #[serde(alias = "json")]
    JsonStructural,
    #[serde(alias = "numeric")]
    NumericTolerant,
}

impl ComparisonMode {
    pub fn all_variants() -> &'static [ComparisonMode] {
        &[
            ComparisonMode::Exact,
            ComparisonMode::Trimmed,
            ComparisonMode::IgnoreWhitespace,
            ComparisonMode::JsonStructural,
            ComparisonMode::NumericTolerant,
        ]
    }
}

impl fmt::Display for ComparisonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonMode::Exact => write!(f, "exact"),
            ComparisonMode::Trimmed => write!(f, "trimmed"),
            ComparisonMode::IgnoreWhitespace => write!(f, "ignore_whitespace"),
            ComparisonMode::JsonStructural => write!(f, "json_structural"),
            ComparisonMode::NumericTolerant => write!(f, "numeric_tolerant"),
        }
    }
}

impl FromStr for ComparisonMode {
    type Err = String;

    /// Case-insensitive, accepts both the short and the long names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" => Ok(ComparisonMode::Exact),
            "trim" | "trimmed" => Ok(ComparisonMode::Trimmed),
            "ignore_whitespace" | "ignorewhitespace" => Ok(ComparisonMode::IgnoreWhitespace),
            "json" | "json_structural" => Ok(ComparisonMode::JsonStructural),
            "numeric" | "numeric_tolerant" => Ok(ComparisonMode::NumericTolerant),
            other => Err(format!("unknown comparison mode: {}", other)),
        }
    }
}

/// Per-Test Outcome
/// Distinguishes the failure modes behind `passed == false`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestOutcome {
    Passed,
    WrongAnswer,
    CompileError,
    RuntimeError,
    TimedOut,
    ExecutorError,
}

impl TestOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestOutcome::Passed => "passed",
            TestOutcome::WrongAnswer => "wrong_answer",
            TestOutcome::CompileError => "compile_error",
            TestOutcome::RuntimeError => "runtime_error",
            TestOutcome::TimedOut => "timed_out",
            TestOutcome::ExecutorError => "executor_error",
        }
    }
}

/// Per-test verdict
///
/// `input`, `expected`, `actual` and `stderr` are always `None` for hidden
/// test cases, whether the case passed or not.
/// `diagnostic` is set only when the executor call itself failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestVerdict {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    pub passed: bool,
    pub outcome: TestOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compile_output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
}

/// Verification Output
///
/// `overall_passed` is the AND of every verdict's `passed` flag and
/// `verdicts` follows the resolved test-case order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub overall_passed: bool,
    pub passed_count: usize,
    pub total: usize,
    pub verdicts: Vec<TestVerdict>,
}

impl VerificationResult {
    pub fn from_verdicts(verdicts: Vec<TestVerdict>) -> Self {
        let passed_count = verdicts.iter().filter(|v| v.passed).count();
        Self {
            overall_passed: verdicts.iter().all(|v| v.passed),
            passed_count,
            total: verdicts.len(),
            verdicts,
        }
    }
}
