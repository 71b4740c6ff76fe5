use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::{SessionStatus, SubmissionRunType};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Question {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) language: Option<String>,
    pub(crate) marks: f64,
    pub(crate) main_block: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct TestCase {
    pub(crate) id: String,
    pub(crate) question_id: String,
    pub(crate) input: String,
    pub(crate) expected_output: String,
    pub(crate) hidden: bool,
    pub(crate) time_limit_seconds: Option<f64>,
    pub(crate) memory_limit_kb: Option<i32>,
    pub(crate) order_index: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct ExamSession {
    pub(crate) id: String,
    pub(crate) exam_id: String,
    pub(crate) student_id: String,
    pub(crate) status: SessionStatus,
    pub(crate) answers: Json<Vec<SessionAnswer>>,
    pub(crate) last_auto_save: Option<PrimitiveDateTime>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// One per-question entry of an exam session's in-progress answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionAnswer {
    pub(crate) question_id: String,
    pub(crate) code: String,
    pub(crate) language: String,
    pub(crate) answered: bool,
    pub(crate) updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Submission {
    pub(crate) id: String,
    pub(crate) exam_id: Option<String>,
    pub(crate) question_id: Option<String>,
    pub(crate) user_id: String,
    pub(crate) language: String,
    pub(crate) source: String,
    pub(crate) source_hash: String,
    pub(crate) results: Json<Vec<TestCaseResult>>,
    pub(crate) passed: i32,
    pub(crate) total: i32,
    pub(crate) score: f64,
    pub(crate) marks: f64,
    pub(crate) status: String,
    pub(crate) run_type: SubmissionRunType,
    pub(crate) is_manual: bool,
    pub(crate) manual_score: Option<f64>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// Outcome of one test case execution, embedded in a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct TestCaseResult {
    #[serde(rename = "testCaseId")]
    pub(crate) test_case_id: Option<String>,
    pub(crate) stdout: String,
    pub(crate) stderr: String,
    pub(crate) compile_output: String,
    pub(crate) status: String,
    pub(crate) time: Option<f64>,
    #[serde(default)]
    pub(crate) hidden: bool,
    #[serde(default)]
    pub(crate) input: String,
    #[serde(rename = "expectedOutput", default)]
    pub(crate) expected_output: String,
    #[serde(default)]
    pub(crate) passed: bool,
}
