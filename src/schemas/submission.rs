use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Submission, TestCaseResult};
use crate::db::types::SubmissionRunType;

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionResponse {
    pub(crate) id: String,
    pub(crate) exam_id: Option<String>,
    pub(crate) question_id: Option<String>,
    pub(crate) user_id: String,
    pub(crate) language: String,
    pub(crate) source: String,
    pub(crate) source_hash: String,
    pub(crate) results: Vec<TestCaseResult>,
    pub(crate) passed: i32,
    pub(crate) total: i32,
    pub(crate) score: f64,
    pub(crate) marks: f64,
    pub(crate) status: String,
    pub(crate) run_type: SubmissionRunType,
    pub(crate) is_manual: bool,
    pub(crate) manual_score: Option<f64>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl From<Submission> for SubmissionResponse {
    fn from(submission: Submission) -> Self {
        Self {
            id: submission.id,
            exam_id: submission.exam_id,
            question_id: submission.question_id,
            user_id: submission.user_id,
            language: submission.language,
            source: submission.source,
            source_hash: submission.source_hash,
            results: submission.results.0,
            passed: submission.passed,
            total: submission.total,
            score: submission.score,
            marks: submission.marks,
            status: submission.status,
            run_type: submission.run_type,
            is_manual: submission.is_manual,
            manual_score: submission.manual_score,
            created_at: format_primitive(submission.created_at),
            updated_at: format_primitive(submission.updated_at),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ScoreOverrideRequest {
    #[validate(range(min = 0.0, message = "score must be non-negative"))]
    pub(crate) score: f64,
}
