use sqlx::types::Json;
use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::core::time::format_primitive;
use crate::db::models::{ExamSession, SessionAnswer};
use crate::db::types::SessionStatus;

pub(crate) const COLUMNS: &str = "\
    id, exam_id, student_id, status, answers, last_auto_save, created_at, updated_at";

/// Latest code for one question, written into the student's active session.
#[derive(Debug, Clone)]
pub(crate) struct AnswerUpdate<'a> {
    pub(crate) exam_id: &'a str,
    pub(crate) student_id: &'a str,
    pub(crate) question_id: &'a str,
    pub(crate) code: &'a str,
    pub(crate) language: &'a str,
    pub(crate) saved_at: PrimitiveDateTime,
}

pub(crate) async fn find_active_for_update(
    executor: impl sqlx::PgExecutor<'_>,
    exam_id: &str,
    student_id: &str,
) -> Result<Option<ExamSession>, sqlx::Error> {
    sqlx::query_as::<_, ExamSession>(&format!(
        "SELECT {COLUMNS} FROM exam_sessions \
         WHERE exam_id = $1 AND student_id = $2 AND status IN ($3, $4) \
         ORDER BY created_at DESC \
         LIMIT 1 \
         FOR UPDATE"
    ))
    .bind(exam_id)
    .bind(student_id)
    .bind(SessionStatus::Pending)
    .bind(SessionStatus::InProgress)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn update_answers(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
    answers: &[SessionAnswer],
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE exam_sessions SET answers = $1, last_auto_save = $2, updated_at = $2 WHERE id = $3",
    )
    .bind(Json(answers))
    .bind(now)
    .bind(id)
    .execute(executor)
    .await?;
    Ok(())
}

/// Upserts the answer under a row lock. Returns `false` when the student has
/// no pending or in-progress session for the exam.
pub(crate) async fn upsert_answer(pool: &PgPool, update: AnswerUpdate<'_>) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let Some(session) = find_active_for_update(&mut *tx, update.exam_id, update.student_id).await?
    else {
        tx.rollback().await?;
        return Ok(false);
    };

    let mut answers = session.answers.0;
    merge_answer(&mut answers, &update);
    update_answers(&mut *tx, &session.id, &answers, update.saved_at).await?;

    tx.commit().await?;
    Ok(true)
}

/// Replaces the entry for the question in place, or appends a new one.
pub(crate) fn merge_answer(answers: &mut Vec<SessionAnswer>, update: &AnswerUpdate<'_>) {
    let entry = SessionAnswer {
        question_id: update.question_id.to_string(),
        code: update.code.to_string(),
        language: update.language.to_string(),
        answered: true,
        updated_at: format_primitive(update.saved_at),
    };

    match answers.iter_mut().find(|answer| answer.question_id == update.question_id) {
        Some(existing) => *existing = entry,
        None => answers.push(entry),
    }
}

#[cfg(test)]
pub(crate) async fn create(
    pool: &PgPool,
    id: &str,
    exam_id: &str,
    student_id: &str,
    status: SessionStatus,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO exam_sessions (id, exam_id, student_id, status, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5,$5)",
    )
    .bind(id)
    .bind(exam_id)
    .bind(student_id)
    .bind(status)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<ExamSession>, sqlx::Error> {
    sqlx::query_as::<_, ExamSession>(&format!("SELECT {COLUMNS} FROM exam_sessions WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}
