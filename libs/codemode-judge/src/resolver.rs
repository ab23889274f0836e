// Test case resolution: which cases a submission is checked against
use codemode_common::types::{QuestionRecord, StoredTest, TestCase};
use tracing::debug;

use crate::catalog::QuestionCatalog;
use crate::error::CheckError;

/// Fetch a question and resolve its ordered test cases
///
/// Priority, first non-empty wins:
/// 1. the question's test set
/// 2. its public examples
/// 3. one empty-input smoke test
///
/// A case is hidden only when its document sets `hidden: true`.
pub async fn resolve(
    catalog: &dyn QuestionCatalog,
    question_id: &str,
) -> Result<Vec<TestCase>, CheckError> {
    let question = catalog
        .find_by_id(question_id)
        .await?
        .ok_or_else(|| CheckError::QuestionNotFound(question_id.to_string()))?;

    let cases = select_test_cases(&question);
    debug!(question_id, test_cases = cases.len(), "Resolved test cases");
    Ok(cases)
}

/// Pure selection step of `resolve`
pub fn select_test_cases(question: &QuestionRecord) -> Vec<TestCase> {
    if let Some(tests) = non_empty(&question.tests) {
        return tests.iter().map(to_test_case).collect();
    }
    if let Some(examples) = non_empty(&question.examples) {
        return examples.iter().map(to_test_case).collect();
    }
    vec![TestCase::visible("", "")]
}

fn non_empty(items: &Option<Vec<StoredTest>>) -> Option<&[StoredTest]> {
    items.as_deref().filter(|items| !items.is_empty())
}

fn to_test_case(stored: &StoredTest) -> TestCase {
    TestCase {
        input: stored.input.clone(),
        expected_output: stored.output.clone(),
        hidden: stored.hidden.unwrap_or(false),
    }
}
