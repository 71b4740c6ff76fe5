use time::PrimitiveDateTime;

use crate::db::models::TestCaseResult;
use crate::db::types::SubmissionRunType;

pub(crate) const COLUMNS: &str = "\
    id, exam_id, question_id, user_id, language, source, source_hash, results, \
    passed, total, score, marks, status, run_type, is_manual, manual_score, \
    created_at, updated_at";

/// A fully graded submission ready to be appended.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NewSubmission {
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
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct HistoryFilter<'a> {
    pub(crate) question_id: Option<&'a str>,
    pub(crate) exam_id: Option<&'a str>,
    pub(crate) skip: i64,
    pub(crate) limit: i64,
}
