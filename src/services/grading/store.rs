use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::models::Submission;
use crate::repositories::questions::{self, QuestionWithTestCases};
use crate::repositories::sessions::{self, AnswerUpdate};
use crate::repositories::submissions::{self, NewSubmission};

/// Storage the grading pipeline reads from and writes to.
#[async_trait]
pub(crate) trait GradingStore: Send + Sync {
    async fn find_question(&self, question_id: &str) -> Result<Option<QuestionWithTestCases>, sqlx::Error>;

    /// Returns whether an active session was found and updated.
    async fn auto_save_answer(&self, update: AnswerUpdate<'_>) -> Result<bool, sqlx::Error>;

    async fn insert_submission(&self, submission: &NewSubmission) -> Result<Submission, sqlx::Error>;
}

#[derive(Clone)]
pub(crate) struct PgGradingStore {
    pool: PgPool,
}

impl PgGradingStore {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GradingStore for PgGradingStore {
    async fn find_question(&self, question_id: &str) -> Result<Option<QuestionWithTestCases>, sqlx::Error> {
        questions::find_with_test_cases(&self.pool, question_id).await
    }

    async fn auto_save_answer(&self, update: AnswerUpdate<'_>) -> Result<bool, sqlx::Error> {
        sessions::upsert_answer(&self.pool, update).await
    }

    async fn insert_submission(&self, submission: &NewSubmission) -> Result<Submission, sqlx::Error> {
        submissions::insert(&self.pool, submission).await
    }
}
