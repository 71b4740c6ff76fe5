use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::models::Submission;

use super::types::{HistoryFilter, COLUMNS};

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!("SELECT {COLUMNS} FROM submissions WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// The user's own submissions, newest first.
pub(crate) async fn list_by_user(
    pool: &PgPool,
    user_id: &str,
    filter: HistoryFilter<'_>,
) -> Result<Vec<Submission>, sqlx::Error> {
    let mut builder =
        QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM submissions WHERE user_id = "));
    builder.push_bind(user_id);

    if let Some(question_id) = filter.question_id {
        builder.push(" AND question_id = ");
        builder.push_bind(question_id);
    }
    if let Some(exam_id) = filter.exam_id {
        builder.push(" AND exam_id = ");
        builder.push_bind(exam_id);
    }

    builder.push(" ORDER BY created_at DESC OFFSET ");
    builder.push_bind(filter.skip.max(0));
    builder.push(" LIMIT ");
    builder.push_bind(filter.limit.clamp(1, 1000));

    builder.build_query_as::<Submission>().fetch_all(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::primitive_now_utc;
    use crate::db::types::SubmissionRunType;
    use crate::repositories::submissions::{insert, override_score, NewSubmission};
    use crate::test_support;

    fn new_submission(id: &str, user_id: &str, question_id: &str) -> NewSubmission {
        NewSubmission {
            id: id.to_string(),
            exam_id: Some("exam-1".to_string()),
            question_id: Some(question_id.to_string()),
            user_id: user_id.to_string(),
            language: "python".to_string(),
            source: "print(1)".to_string(),
            source_hash: "hash".to_string(),
            results: Vec::new(),
            passed: 0,
            total: 0,
            score: 0.0,
            marks: 10.0,
            status: "failed".to_string(),
            run_type: SubmissionRunType::All,
            created_at: primitive_now_utc(),
        }
    }

    #[tokio::test]
    #[ignore = "requires postgres"]
    async fn history_is_scoped_to_the_user_and_filterable() {
        let ctx = test_support::setup_test_db().await;
        insert(&ctx.db, &new_submission("s1", "alice", "q1")).await.expect("insert");
        insert(&ctx.db, &new_submission("s2", "alice", "q2")).await.expect("insert");
        insert(&ctx.db, &new_submission("s3", "bob", "q1")).await.expect("insert");

        let all = list_by_user(&ctx.db, "alice", HistoryFilter { limit: 50, ..Default::default() })
            .await
            .expect("list");
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|submission| submission.user_id == "alice"));

        let filtered = list_by_user(
            &ctx.db,
            "alice",
            HistoryFilter { question_id: Some("q1"), limit: 50, ..Default::default() },
        )
        .await
        .expect("list");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "s1");
    }

    #[tokio::test]
    #[ignore = "requires postgres"]
    async fn override_marks_submission_manual() {
        let ctx = test_support::setup_test_db().await;
        insert(&ctx.db, &new_submission("s1", "alice", "q1")).await.expect("insert");

        let updated = override_score(&ctx.db, "s1", 7.5, primitive_now_utc())
            .await
            .expect("override")
            .expect("submission");
        assert!(updated.is_manual);
        assert_eq!(updated.manual_score, Some(7.5));
        assert_eq!(updated.score, 0.0);

        assert!(override_score(&ctx.db, "missing", 1.0, primitive_now_utc())
            .await
            .expect("override")
            .is_none());
    }
}
