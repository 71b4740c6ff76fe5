use sqlx::PgPool;

use crate::db::models::{Question, TestCase};

pub(crate) const COLUMNS: &str = "id, title, language, marks, main_block, created_at, updated_at";

const TEST_CASE_COLUMNS: &str =
    "id, question_id, input, expected_output, hidden, time_limit_seconds, memory_limit_kb, order_index";

/// A question together with its ordered test cases.
#[derive(Debug, Clone)]
pub(crate) struct QuestionWithTestCases {
    pub(crate) question: Question,
    pub(crate) test_cases: Vec<TestCase>,
}

pub(crate) async fn find_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
) -> Result<Option<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!("SELECT {COLUMNS} FROM questions WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub(crate) async fn list_test_cases(
    executor: impl sqlx::PgExecutor<'_>,
    question_id: &str,
) -> Result<Vec<TestCase>, sqlx::Error> {
    sqlx::query_as::<_, TestCase>(&format!(
        "SELECT {TEST_CASE_COLUMNS} FROM test_cases \
         WHERE question_id = $1 ORDER BY order_index, id"
    ))
    .bind(question_id)
    .fetch_all(executor)
    .await
}

pub(crate) async fn find_with_test_cases(
    pool: &PgPool,
    id: &str,
) -> Result<Option<QuestionWithTestCases>, sqlx::Error> {
    let Some(question) = find_by_id(pool, id).await? else {
        return Ok(None);
    };
    let test_cases = list_test_cases(pool, id).await?;
    Ok(Some(QuestionWithTestCases { question, test_cases }))
}

#[cfg(test)]
pub(crate) async fn create(pool: &PgPool, question: &Question) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO questions (id, title, language, marks, main_block, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5,$6,$7)",
    )
    .bind(&question.id)
    .bind(&question.title)
    .bind(&question.language)
    .bind(question.marks)
    .bind(&question.main_block)
    .bind(question.created_at)
    .bind(question.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
pub(crate) async fn create_test_case(pool: &PgPool, test_case: &TestCase) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO test_cases (
            id, question_id, input, expected_output, hidden,
            time_limit_seconds, memory_limit_kb, order_index
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8)",
    )
    .bind(&test_case.id)
    .bind(&test_case.question_id)
    .bind(&test_case.input)
    .bind(&test_case.expected_output)
    .bind(test_case.hidden)
    .bind(test_case.time_limit_seconds)
    .bind(test_case.memory_limit_kb)
    .bind(test_case.order_index)
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::primitive_now_utc;
    use crate::test_support;

    #[tokio::test]
    #[ignore = "requires postgres"]
    async fn test_cases_come_back_in_order() {
        let ctx = test_support::setup_test_db().await;
        let now = primitive_now_utc();
        let question = Question {
            id: "q-1".to_string(),
            title: "Sum".to_string(),
            language: Some("python".to_string()),
            marks: 5.0,
            main_block: None,
            created_at: now,
            updated_at: now,
        };
        create(&ctx.db, &question).await.expect("question");

        for (id, order_index) in [("t-late", 2), ("t-early", 1)] {
            let test_case = TestCase {
                id: id.to_string(),
                question_id: question.id.clone(),
                input: String::new(),
                expected_output: String::new(),
                hidden: false,
                time_limit_seconds: None,
                memory_limit_kb: None,
                order_index,
            };
            create_test_case(&ctx.db, &test_case).await.expect("test case");
        }

        let found = find_with_test_cases(&ctx.db, "q-1").await.expect("query").expect("question");
        assert_eq!(found.question.marks, 5.0);
        let ids: Vec<_> = found.test_cases.iter().map(|case| case.id.as_str()).collect();
        assert_eq!(ids, vec!["t-early", "t-late"]);

        assert!(find_with_test_cases(&ctx.db, "missing").await.expect("query").is_none());
    }
}
