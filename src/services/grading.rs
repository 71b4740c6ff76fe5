pub(crate) mod composer;
pub(crate) mod engine;
pub(crate) mod language;
pub(crate) mod normalize;
pub(crate) mod persist;
pub(crate) mod pipeline;
pub(crate) mod selector;
pub(crate) mod store;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::models::{Submission, TestCase, TestCaseResult};
use crate::services::judge_client::JudgeError;

pub(crate) use engine::Evaluation;
pub(crate) use pipeline::{GradingPipeline, GradingRequest};
pub(crate) use selector::RunMode;

/// A test case as the engine sees it, whether stored with the question or
/// supplied inline by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GradingTestCase {
    #[serde(default)]
    pub(crate) id: Option<String>,
    #[serde(default)]
    pub(crate) input: String,
    #[serde(default, alias = "expected_output")]
    pub(crate) expected_output: String,
    #[serde(default)]
    pub(crate) hidden: bool,
    #[serde(default, alias = "time_limit_seconds")]
    pub(crate) time_limit_seconds: Option<f64>,
    #[serde(default, alias = "memory_limit_kb")]
    pub(crate) memory_limit_kb: Option<i32>,
}

impl From<TestCase> for GradingTestCase {
    fn from(test_case: TestCase) -> Self {
        Self {
            id: Some(test_case.id),
            input: test_case.input,
            expected_output: test_case.expected_output,
            hidden: test_case.hidden,
            time_limit_seconds: test_case.time_limit_seconds,
            memory_limit_kb: test_case.memory_limit_kb,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum GradingError {
    #[error("source code is required")]
    MissingSource,
    #[error("source code exceeds {limit} bytes")]
    SourceTooLarge { limit: usize },
    #[error(transparent)]
    Judge(#[from] JudgeError),
    #[error("failed to persist submission: {0}")]
    Persistence(#[from] sqlx::Error),
}

/// What a grading call produced.
#[derive(Debug, Clone)]
pub(crate) enum GradingOutcome {
    /// Single ad-hoc execution; `status` is the judge's verdict.
    Exploratory { result: TestCaseResult, status: String },
    /// Scored but not stored (no caller identity, or a non-persisting mode).
    Evaluated(Evaluation),
    Persisted(Box<Submission>),
}
