use sqlx::types::Json;
use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Submission;

use super::types::{NewSubmission, COLUMNS};

pub(crate) async fn insert(
    executor: impl sqlx::PgExecutor<'_>,
    submission: &NewSubmission,
) -> Result<Submission, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "INSERT INTO submissions (
            id, exam_id, question_id, user_id, language, source, source_hash, results,
            passed, total, score, marks, status, run_type, is_manual, manual_score,
            created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,FALSE,NULL,$15,$15)
        RETURNING {COLUMNS}"
    ))
    .bind(&submission.id)
    .bind(&submission.exam_id)
    .bind(&submission.question_id)
    .bind(&submission.user_id)
    .bind(&submission.language)
    .bind(&submission.source)
    .bind(&submission.source_hash)
    .bind(Json(&submission.results))
    .bind(submission.passed)
    .bind(submission.total)
    .bind(submission.score)
    .bind(submission.marks)
    .bind(&submission.status)
    .bind(submission.run_type)
    .bind(submission.created_at)
    .fetch_one(executor)
    .await
}

/// Records an evaluator's manual score. The graded fields stay untouched.
pub(crate) async fn override_score(
    pool: &PgPool,
    id: &str,
    score: f64,
    now: PrimitiveDateTime,
) -> Result<Option<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "UPDATE submissions
         SET is_manual = TRUE,
             manual_score = $1,
             updated_at = $2
         WHERE id = $3
         RETURNING {COLUMNS}"
    ))
    .bind(score)
    .bind(now)
    .bind(id)
    .fetch_optional(pool)
    .await
}
