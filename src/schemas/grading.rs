use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::models::TestCaseResult;
use crate::schemas::submission::SubmissionResponse;
use crate::services::grading::{Evaluation, GradingOutcome, GradingTestCase};

/// Body of `POST /grading/execute`. Accepts camelCase keys with snake_case
/// aliases.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExecuteCodeRequest {
    #[serde(default, alias = "question_id")]
    #[validate(length(max = 128, message = "questionId is too long"))]
    pub(crate) question_id: Option<String>,
    #[serde(default, alias = "code")]
    pub(crate) source: Option<String>,
    #[serde(default = "default_run_type", alias = "run_type")]
    pub(crate) run_type: String,
    #[serde(default)]
    #[validate(length(max = 32, message = "language label is too long"))]
    pub(crate) language: Option<String>,
    #[serde(default, alias = "test_cases")]
    #[validate(length(max = 200, message = "too many test cases"))]
    pub(crate) test_cases: Vec<GradingTestCase>,
    #[serde(default, alias = "main_block")]
    pub(crate) main_block: Option<String>,
    #[serde(default, alias = "exam_id")]
    #[validate(length(max = 128, message = "examId is too long"))]
    pub(crate) exam_id: Option<String>,
}

fn default_run_type() -> String {
    "run".to_string()
}

#[derive(Debug, Serialize)]
pub(crate) struct ExecuteCodeResponse {
    pub(crate) submission: SubmissionPayload,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum SubmissionPayload {
    Exploratory(ExploratoryRunResponse),
    Evaluated(EvaluationResponse),
    Stored(SubmissionResponse),
}

#[derive(Debug, Serialize)]
pub(crate) struct ExploratoryRunResponse {
    pub(crate) results: Vec<TestCaseResult>,
    pub(crate) passed: i32,
    pub(crate) total: i32,
    pub(crate) status: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct EvaluationResponse {
    pub(crate) results: Vec<TestCaseResult>,
    pub(crate) passed: i32,
    pub(crate) total: i32,
    pub(crate) status: String,
    pub(crate) score: f64,
}

impl From<Evaluation> for EvaluationResponse {
    fn from(evaluation: Evaluation) -> Self {
        Self {
            results: evaluation.results,
            passed: evaluation.passed,
            total: evaluation.total,
            status: evaluation.status,
            score: evaluation.score,
        }
    }
}

impl From<GradingOutcome> for ExecuteCodeResponse {
    fn from(outcome: GradingOutcome) -> Self {
        let submission = match outcome {
            GradingOutcome::Exploratory { result, status } => {
                SubmissionPayload::Exploratory(ExploratoryRunResponse {
                    results: vec![result],
                    passed: 0,
                    total: 0,
                    status,
                })
            }
            GradingOutcome::Evaluated(evaluation) => SubmissionPayload::Evaluated(evaluation.into()),
            GradingOutcome::Persisted(submission) => {
                SubmissionPayload::Stored(SubmissionResponse::from(*submission))
            }
        };
        Self { submission }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct LanguageResponse {
    pub(crate) label: &'static str,
    pub(crate) language_id: i32,
}
