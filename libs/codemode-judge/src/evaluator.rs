/// Output Evaluator - Language-Agnostic Comparison Logic
///
/// **Core Responsibility:**
/// Decide whether an actual output matches an expected output under a
/// named comparison mode, and turn one execution into a test verdict.
///
/// **Critical Properties:**
/// - Knows nothing about HTTP or the executor
/// - Knows nothing about the question catalog
/// - `compare` is total: malformed input degrades to the weakest applicable
///   comparison instead of failing
///
/// **Comparison Modes:**
/// - Exact: byte-for-byte
/// - Trimmed: leading/trailing whitespace ignored (orchestrator default)
/// - IgnoreWhitespace: internal whitespace runs collapse to one space
/// - JsonStructural: JSON values compared structurally, key order ignored
/// - NumericTolerant: numbers anywhere in a JSON value compared within a tolerance

use codemode_common::types::{
    ComparisonMode, ExecutionResult, TestCase, TestOutcome, TestVerdict,
};
use serde_json::Value;

use crate::error::ExecutorError;

pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Compare expected and actual output under `mode`
///
/// `tolerance` only affects `NumericTolerant`; negative or NaN values act as 0.
pub fn compare(expected: &str, actual: &str, mode: ComparisonMode, tolerance: f64) -> bool {
    match mode {
        ComparisonMode::Exact => expected == actual,
        ComparisonMode::Trimmed => trimmed_eq(expected, actual),
        ComparisonMode::IgnoreWhitespace => collapse_whitespace(expected) == collapse_whitespace(actual),
        ComparisonMode::JsonStructural => match parse_both(expected, actual) {
            Some((a, b)) => values_eq(&a, &b, NumberRule::Exact),
            None => trimmed_eq(expected, actual),
        },
        ComparisonMode::NumericTolerant => {
            let tolerance = tolerance.max(0.0);
            if let Some((a, b)) = parse_both(expected, actual) {
                return values_eq(&a, &b, NumberRule::Within(tolerance));
            }
            match (parse_number(expected), parse_number(actual)) {
                (Some(a), Some(b)) => (a - b).abs() <= tolerance,
                _ => trimmed_eq(expected, actual),
            }
        }
    }
}

/// Compare with the default tolerance
pub fn compare_default(expected: &str, actual: &str, mode: ComparisonMode) -> bool {
    compare(expected, actual, mode, DEFAULT_TOLERANCE)
}

fn trimmed_eq(expected: &str, actual: &str) -> bool {
    expected.trim() == actual.trim()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_both(expected: &str, actual: &str) -> Option<(Value, Value)> {
    let a = serde_json::from_str(expected).ok()?;
    let b = serde_json::from_str(actual).ok()?;
    Some((a, b))
}

/// Bare number fallback; non-finite values do not count as numbers
fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

#[derive(Debug, Clone, Copy)]
enum NumberRule {
    Exact,
    Within(f64),
}

fn values_eq(a: &Value, b: &Value, rule: NumberRule) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                if let NumberRule::Exact = rule {
                    return x == y;
                }
            }
            if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                if let NumberRule::Exact = rule {
                    return x == y;
                }
            }
            match (x.as_f64(), y.as_f64(), rule) {
                (Some(x), Some(y), NumberRule::Exact) => x == y,
                (Some(x), Some(y), NumberRule::Within(tolerance)) => (x - y).abs() <= tolerance,
                _ => false,
            }
        }
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_eq(x, y, rule))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, x)| ys.get(key).is_some_and(|y| values_eq(x, y, rule)))
        }
        _ => a == b,
    }
}

/// Evaluate one successful execution against its test case
///
/// A non-blank compile output or stderr is an automatic failure; the
/// comparator is not consulted in that case.
pub fn evaluate_test(
    index: usize,
    test_case: &TestCase,
    execution: &ExecutionResult,
    mode: ComparisonMode,
    tolerance: f64,
) -> TestVerdict {
    let actual = execution.output();

    let outcome = if execution.compile_error().is_some() {
        TestOutcome::CompileError
    } else if execution.runtime_error().is_some() {
        TestOutcome::RuntimeError
    } else if compare(&test_case.expected_output, actual, mode, tolerance) {
        TestOutcome::Passed
    } else {
        TestOutcome::WrongAnswer
    };

    let mut verdict = redacted(index, test_case, outcome);
    if !test_case.hidden {
        verdict.actual = Some(actual.to_string());
        verdict.stderr = execution.stderr.clone();
    }
    if outcome != TestOutcome::Passed {
        verdict.compile_output = execution.compile_output.clone();
        verdict.status_message = execution.status_message.clone();
    }
    verdict
}

/// Verdict for a test case whose execution failed outright
pub fn executor_failure(index: usize, test_case: &TestCase, error: &ExecutorError) -> TestVerdict {
    let outcome = if error.is_timeout() {
        TestOutcome::TimedOut
    } else {
        TestOutcome::ExecutorError
    };
    let mut verdict = redacted(index, test_case, outcome);
    verdict.diagnostic = Some(error.to_string());
    verdict
}

/// Base verdict: everything a hidden test may reveal, plus input/expected for visible ones
fn redacted(index: usize, test_case: &TestCase, outcome: TestOutcome) -> TestVerdict {
    let visible = |value: &str| (!test_case.hidden).then(|| value.to_string());
    TestVerdict {
        index,
        input: visible(&test_case.input),
        expected: visible(&test_case.expected_output),
        actual: None,
        passed: outcome == TestOutcome::Passed,
        outcome,
        diagnostic: None,
        compile_output: None,
        stderr: None,
        status_message: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(stdout: &str) -> ExecutionResult {
        ExecutionResult {
            stdout: Some(stdout.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_every_mode_is_reflexive() {
        let samples = [
            "",
            "   ",
            "hello world",
            "  5\n",
            "{\"a\": [1, 2.5, {\"b\": null}]}",
            "NaN",
            "inf",
            "1e400",
            "[1, 2",
            "line1\r\nline2\n",
        ];
        for mode in ComparisonMode::all_variants() {
            for s in samples {
                assert!(compare_default(s, s, *mode), "mode {} not reflexive on {:?}", mode, s);
            }
        }
    }

    #[test]
    fn test_empty_expected_vs_whitespace() {
        assert!(compare_default("", "   ", ComparisonMode::Trimmed));
        assert!(!compare_default("", "   ", ComparisonMode::Exact));
        for mode in ComparisonMode::all_variants() {
            if *mode != ComparisonMode::Exact {
                assert!(compare_default("", " \n\t", *mode), "mode {}", mode);
                assert!(!compare_default("", "0", *mode), "mode {}", mode);
            }
        }
    }

    #[test]
    fn test_trimmed() {
        assert!(compare_default("hello", "  hello  \n", ComparisonMode::Trimmed));
        assert!(compare_default("line1\nline2", "line1\nline2\n", ComparisonMode::Trimmed));
        assert!(!compare_default("Hello", "hello", ComparisonMode::Trimmed));
        assert!(!compare_default("a  b", "a b", ComparisonMode::Trimmed));
    }

    #[test]
    fn test_ignore_whitespace() {
        assert!(compare_default("1 2 3", "1\n2\t 3\n", ComparisonMode::IgnoreWhitespace));
        assert!(compare_default("  a   b ", "a b", ComparisonMode::IgnoreWhitespace));
        assert!(!compare_default("ab", "a b", ComparisonMode::IgnoreWhitespace));
    }

    #[test]
    fn test_json_key_order_independent() {
        assert!(compare_default(
            r#"{"a":1,"b":2}"#,
            r#"{"b":2,"a":1}"#,
            ComparisonMode::JsonStructural
        ));
        assert!(compare_default(
            r#"{"x": {"b": [1, 2], "a": "s"}}"#,
            "{\"x\":{\"a\":\"s\",\"b\":[1,2]}}\n",
            ComparisonMode::JsonStructural
        ));
    }

    #[test]
    fn test_json_structural_differences() {
        assert!(!compare_default("[1,2]", "[2,1]", ComparisonMode::JsonStructural));
        assert!(!compare_default(r#"{"a":1}"#, r#"{"a":1,"b":2}"#, ComparisonMode::JsonStructural));
        assert!(!compare_default("1", "\"1\"", ComparisonMode::JsonStructural));
        assert!(compare_default("1", "1.0", ComparisonMode::JsonStructural));
    }

    #[test]
    fn test_json_falls_back_to_trimmed() {
        assert!(compare_default("not json", " not json\n", ComparisonMode::JsonStructural));
        assert!(!compare_default("[1, 2]", "[1, 2", ComparisonMode::JsonStructural));
    }

    #[test]
    fn test_numeric_tolerance() {
        assert!(!compare("1.00000001", "1.00000002", ComparisonMode::NumericTolerant, 1e-9));
        assert!(compare("1.00000001", "1.00000002", ComparisonMode::NumericTolerant, 1e-6));
    }

    #[test]
    fn test_numeric_nested_values() {
        assert!(compare(
            r#"{"area": 3.14159, "sides": [1.0, 2.0]}"#,
            r#"{"sides": [1.0000001, 2], "area": 3.1416}"#,
            ComparisonMode::NumericTolerant,
            1e-3
        ));
        assert!(!compare("[1.0, 2.0]", "[1.0]", ComparisonMode::NumericTolerant, 1.0));
        assert!(!compare(r#"{"a": 1}"#, r#"{"b": 1}"#, ComparisonMode::NumericTolerant, 1.0));
        assert!(compare(r#"["x", true, null]"#, r#"["x", true, null]"#, ComparisonMode::NumericTolerant, 0.0));
    }

    #[test]
    fn test_numeric_bare_number_fallback() {
        // "+5" and " .5" are not JSON but are numbers
        assert!(compare_default("+5", "5", ComparisonMode::NumericTolerant));
        assert!(compare("0.5", ".5000001", ComparisonMode::NumericTolerant, 1e-6));
        assert!(!compare_default("NaN", "nan", ComparisonMode::NumericTolerant));
        assert!(compare_default("abc", " abc ", ComparisonMode::NumericTolerant));
    }

    #[test]
    fn test_negative_tolerance_acts_as_zero() {
        assert!(compare("2", "2", ComparisonMode::NumericTolerant, -1.0));
        assert!(!compare("2", "2.5", ComparisonMode::NumericTolerant, -1.0));
        assert!(compare("2", "2", ComparisonMode::NumericTolerant, f64::NAN));
    }

    #[test]
    fn test_evaluate_test_pass_and_mismatch() {
        let tc = TestCase::visible("5", "120");

        let pass = evaluate_test(0, &tc, &run("120\n"), ComparisonMode::Trimmed, DEFAULT_TOLERANCE);
        assert!(pass.passed);
        assert_eq!(pass.outcome, TestOutcome::Passed);
        assert_eq!(pass.expected.as_deref(), Some("120"));
        assert_eq!(pass.actual.as_deref(), Some("120\n"));
        assert_eq!(pass.diagnostic, None);

        let fail = evaluate_test(1, &tc, &run("24"), ComparisonMode::Trimmed, DEFAULT_TOLERANCE);
        assert!(!fail.passed);
        assert_eq!(fail.outcome, TestOutcome::WrongAnswer);
        assert_eq!(fail.index, 1);
        assert_eq!(fail.diagnostic, None);
    }

    #[test]
    fn test_compile_output_is_automatic_fail() {
        let tc = TestCase::visible("", "");
        let execution = ExecutionResult {
            stdout: Some(String::new()),
            compile_output: Some("syntax error".to_string()),
            status_message: Some("Compilation Error".to_string()),
            ..Default::default()
        };

        let verdict = evaluate_test(0, &tc, &execution, ComparisonMode::Trimmed, DEFAULT_TOLERANCE);
        assert!(!verdict.passed);
        assert_eq!(verdict.outcome, TestOutcome::CompileError);
        assert_eq!(verdict.compile_output.as_deref(), Some("syntax error"));
        assert_eq!(verdict.status_message.as_deref(), Some("Compilation Error"));
    }

    #[test]
    fn test_stderr_is_automatic_fail() {
        let tc = TestCase::visible("", "done");
        let execution = ExecutionResult {
            stdout: Some("done".to_string()),
            stderr: Some("Traceback: ZeroDivisionError".to_string()),
            ..Default::default()
        };

        let verdict = evaluate_test(0, &tc, &execution, ComparisonMode::Trimmed, DEFAULT_TOLERANCE);
        assert!(!verdict.passed);
        assert_eq!(verdict.outcome, TestOutcome::RuntimeError);
        assert_eq!(verdict.stderr.as_deref(), Some("Traceback: ZeroDivisionError"));
    }

    #[test]
    fn test_hidden_case_is_redacted_on_pass_and_fail() {
        let tc = TestCase::hidden("secret input", "5\n");

        for stdout in ["5\n", "6\n"] {
            let verdict = evaluate_test(0, &tc, &run(stdout), ComparisonMode::Trimmed, DEFAULT_TOLERANCE);
            assert_eq!(verdict.input, None);
            assert_eq!(verdict.expected, None);
            assert_eq!(verdict.actual, None);
        }

        let err = ExecutorError::Timeout { timeout_ms: 100 };
        let verdict = executor_failure(0, &tc, &err);
        assert_eq!(verdict.input, None);
        assert_eq!(verdict.expected, None);
        assert_eq!(verdict.actual, None);
    }

    #[test]
    fn test_executor_failure_sets_diagnostic() {
        let tc = TestCase::visible("1", "1");

        let timeout = executor_failure(2, &tc, &ExecutorError::Timeout { timeout_ms: 15000 });
        assert!(!timeout.passed);
        assert_eq!(timeout.outcome, TestOutcome::TimedOut);
        assert!(timeout.diagnostic.as_deref().unwrap().contains("timeout"));
        assert_eq!(timeout.expected.as_deref(), Some("1"));
        assert_eq!(timeout.actual, None);

        let malformed = executor_failure(0, &tc, &ExecutorError::MalformedResponse("[]".into()));
        assert_eq!(malformed.outcome, TestOutcome::ExecutorError);
        assert!(malformed.diagnostic.is_some());
    }
}
