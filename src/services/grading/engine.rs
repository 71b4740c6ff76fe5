use serde::Serialize;

use crate::db::models::TestCaseResult;
use crate::services::grading::normalize::{self, ACCEPTED};
use crate::services::grading::{GradingTestCase, RunMode};
use crate::services::judge_client::{CodeExecutor, ExecutionOutcome, ExecutionRequest, JudgeError};

pub(crate) const REDACTED_OUTPUT: &str = "Hidden test case output is not shown";

pub(crate) const STATUS_ACCEPTED: &str = "accepted";
pub(crate) const STATUS_FAILED: &str = "failed";

/// Scored result of one grading run, before any persistence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct Evaluation {
    pub(crate) results: Vec<TestCaseResult>,
    pub(crate) passed: i32,
    pub(crate) total: i32,
    pub(crate) score: f64,
    pub(crate) status: String,
}

/// Executes the selected cases one at a time, in order. The first judge
/// error aborts the run; no partial evaluation is returned.
pub(crate) async fn evaluate<E>(
    executor: &E,
    source_code: &str,
    language_id: i32,
    selected: &[&GradingTestCase],
    mode: &RunMode,
    marks: f64,
) -> Result<Evaluation, JudgeError>
where
    E: CodeExecutor + ?Sized,
{
    let redact = mode.redacts_hidden_output();
    let mut results = Vec::with_capacity(selected.len());
    let mut passed = 0;

    for case in selected {
        let request = ExecutionRequest {
            source_code: source_code.to_string(),
            language_id,
            stdin: case.input.clone(),
            expected_output: Some(case.expected_output.clone()),
            cpu_time_limit: case.time_limit_seconds,
            memory_limit_kb: case.memory_limit_kb,
        };
        let outcome = executor.execute(&request).await?;
        let case_passed = normalize::outputs_match(&outcome.stdout, &case.expected_output, &outcome.status);
        if case_passed {
            passed += 1;
        }
        results.push(build_result(Some(case), outcome, case_passed, redact && case.hidden));
    }

    let total = selected.len() as i32;
    Ok(Evaluation {
        results,
        passed,
        total,
        score: score(passed, total, marks),
        status: overall_status(passed, total).to_string(),
    })
}

/// Single execution on empty stdin with no expectation.
pub(crate) async fn run_once<E>(
    executor: &E,
    source_code: &str,
    language_id: i32,
) -> Result<ExecutionOutcome, JudgeError>
where
    E: CodeExecutor + ?Sized,
{
    let request = ExecutionRequest {
        source_code: source_code.to_string(),
        language_id,
        stdin: String::new(),
        expected_output: None,
        cpu_time_limit: None,
        memory_limit_kb: None,
    };
    executor.execute(&request).await
}

pub(crate) fn build_result(
    case: Option<&GradingTestCase>,
    outcome: ExecutionOutcome,
    passed: bool,
    redact: bool,
) -> TestCaseResult {
    let (stdout, stderr, compile_output) = if redact {
        (REDACTED_OUTPUT.to_string(), REDACTED_OUTPUT.to_string(), REDACTED_OUTPUT.to_string())
    } else {
        (outcome.stdout, outcome.stderr, outcome.compile_output)
    };

    TestCaseResult {
        test_case_id: case.and_then(|case| case.id.clone()),
        stdout,
        stderr,
        compile_output,
        status: result_status(&outcome.status),
        time: outcome.time,
        hidden: case.is_some_and(|case| case.hidden),
        input: case.map(|case| case.input.clone()).unwrap_or_default(),
        expected_output: case.map(|case| case.expected_output.clone()).unwrap_or_default(),
        passed,
    }
}

/// Result of an exploratory run. The judge's status description is kept
/// verbatim.
pub(crate) fn exploratory_result(outcome: ExecutionOutcome) -> TestCaseResult {
    let status = outcome.status.clone();
    TestCaseResult { status, ..build_result(None, outcome, false, false) }
}

/// The judge's verdict, with "Accepted" stored lower-cased.
pub(crate) fn result_status(description: &str) -> String {
    if description == ACCEPTED {
        STATUS_ACCEPTED.to_string()
    } else {
        description.to_string()
    }
}

pub(crate) fn score(passed: i32, total: i32, marks: f64) -> f64 {
    f64::from(passed) / f64::from(total.max(1)) * marks
}

pub(crate) fn overall_status(passed: i32, total: i32) -> &'static str {
    if total > 0 && passed == total {
        STATUS_ACCEPTED
    } else {
        STATUS_FAILED
    }
}
