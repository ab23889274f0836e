/// Answer Verifier - High-Level Orchestration
///
/// **Responsibility:**
/// Coordinate resolver, engine and evaluator to produce a verdict.
///
/// **Architecture:**
/// 1. Reject unsupported languages before any I/O
/// 2. Resolve test cases from the question catalog (resolver.rs)
/// 3. Run every case on the remote executor (engine.rs)
/// 4. Judge every output (evaluator.rs)
/// 5. Return the aggregated VerificationResult
///
/// This module is the glue layer - it knows nothing about:
/// - How code executes (engine's job)
/// - How outputs are compared (evaluator's job)
///
/// A failing test case never aborts the others. Verdicts come back in
/// test-case order even when cases run concurrently.

use codemode_common::types::{
    ComparisonMode, ExecutionRequest, TestCase, TestVerdict, VerificationResult,
};
use futures_util::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::catalog::QuestionCatalog;
use crate::engine::CodeEngine;
use crate::error::{CheckError, ExecutorError};
use crate::evaluator::{self, DEFAULT_TOLERANCE};
use crate::resolver;

#[derive(Clone)]
pub struct Verifier {
    engine: Arc<dyn CodeEngine>,
    catalog: Arc<dyn QuestionCatalog>,
    mode: ComparisonMode,
    tolerance: f64,
    max_parallel_tests: usize,
}

impl Verifier {
    pub fn new(engine: Arc<dyn CodeEngine>, catalog: Arc<dyn QuestionCatalog>) -> Self {
        Self {
            engine,
            catalog,
            mode: ComparisonMode::Trimmed,
            tolerance: DEFAULT_TOLERANCE,
            max_parallel_tests: 1,
        }
    }

    pub fn with_comparison_mode(mut self, mode: ComparisonMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Run up to `limit` test cases at once (1 keeps execution sequential)
    pub fn with_max_parallel_tests(mut self, limit: usize) -> Self {
        self.max_parallel_tests = limit.max(1);
        self
    }

    /// Check a submission against a question's test cases
    ///
    /// Only an unsupported language, a missing question or an unavailable
    /// catalog fail the call; every per-test failure becomes a verdict.
    #[instrument(skip(self, code), fields(run_id = %Uuid::new_v4(), code_size = code.len()))]
    pub async fn check_answer(
        &self,
        code: &str,
        language: &str,
        question_id: &str,
    ) -> Result<VerificationResult, CheckError> {
        if let Err(e) = self.engine.check_language(language) {
            warn!(error = %e, "Rejecting submission");
            return Err(CheckError::UnsupportedLanguage(language.to_string()));
        }

        let test_cases = resolver::resolve(self.catalog.as_ref(), question_id).await?;

        let start = Instant::now();
        let verdicts = self.run_all(code, language, question_id, &test_cases).await;
        let result = VerificationResult::from_verdicts(verdicts);

        info!(
            overall_passed = result.overall_passed,
            passed = result.passed_count,
            total = result.total,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Verification completed"
        );

        Ok(result)
    }

    async fn run_all(
        &self,
        code: &str,
        language: &str,
        question_id: &str,
        test_cases: &[TestCase],
    ) -> Vec<TestVerdict> {
        // Indices are fixed before dispatch; `buffered` yields in input order
        let pending: Vec<_> = test_cases
            .iter()
            .enumerate()
            .map(|(index, test_case)| self.run_one(index, test_case, code, language, question_id))
            .collect();

        stream::iter(pending)
            .buffered(self.max_parallel_tests)
            .collect()
            .await
    }

    async fn run_one(
        &self,
        index: usize,
        test_case: &TestCase,
        code: &str,
        language: &str,
        question_id: &str,
    ) -> TestVerdict {
        let request = ExecutionRequest::new(code, language, test_case.input.as_str());

        match self.engine.run(&request).await {
            Ok(execution) => {
                let verdict =
                    evaluator::evaluate_test(index, test_case, &execution, self.mode, self.tolerance);
                if !verdict.passed {
                    info!(
                        question_id,
                        test_index = index,
                        outcome = verdict.outcome.as_str(),
                        "Test case failed"
                    );
                }
                verdict
            }
            Err(e) => {
                log_executor_error(question_id, index, &e);
                evaluator::executor_failure(index, test_case, &e)
            }
        }
    }
}

fn log_executor_error(question_id: &str, index: usize, err: &ExecutorError) {
    error!(
        question_id,
        test_index = index,
        kind = err.kind(),
        error = %err,
        "Error running test case"
    );
}
