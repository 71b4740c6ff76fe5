use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::Submission;
use crate::db::types::SubmissionRunType;
use crate::repositories::sessions::AnswerUpdate;
use crate::repositories::submissions::NewSubmission;
use crate::services::grading::store::GradingStore;
use crate::services::grading::{Evaluation, GradingError};

/// Identity and provenance of a graded run, joined with its evaluation to
/// form the stored record.
#[derive(Debug, Clone)]
pub(crate) struct SubmissionDraft<'a> {
    pub(crate) user_id: &'a str,
    pub(crate) exam_id: Option<&'a str>,
    pub(crate) question_id: Option<&'a str>,
    pub(crate) language: &'a str,
    pub(crate) source: &'a str,
    pub(crate) composed_source: &'a str,
    pub(crate) marks: f64,
    pub(crate) run_type: SubmissionRunType,
}

pub(crate) fn new_submission(draft: SubmissionDraft<'_>, evaluation: &Evaluation) -> NewSubmission {
    NewSubmission {
        id: Uuid::new_v4().to_string(),
        exam_id: draft.exam_id.map(str::to_string),
        question_id: draft.question_id.map(str::to_string),
        user_id: draft.user_id.to_string(),
        language: draft.language.to_string(),
        source: draft.source.to_string(),
        source_hash: source_hash(draft.composed_source),
        results: evaluation.results.clone(),
        passed: evaluation.passed,
        total: evaluation.total,
        score: evaluation.score,
        marks: draft.marks,
        status: evaluation.status.clone(),
        run_type: draft.run_type,
        created_at: primitive_now_utc(),
    }
}

pub(crate) fn source_hash(composed_source: &str) -> String {
    hex::encode(Sha256::digest(composed_source.as_bytes()))
}

/// Appends the submission. Failure here fails the grading request.
pub(crate) async fn persist<S>(store: &S, submission: &NewSubmission) -> Result<Submission, GradingError>
where
    S: GradingStore + ?Sized,
{
    let stored = store.insert_submission(submission).await?;
    tracing::info!(
        submission_id = %stored.id,
        user_id = %stored.user_id,
        run_type = ?stored.run_type,
        passed = stored.passed,
        total = stored.total,
        "Submission recorded"
    );
    Ok(stored)
}

/// Best-effort write of the latest code into the active exam session.
/// Errors are logged and never reach the caller.
pub(crate) async fn auto_save<S>(store: &S, update: AnswerUpdate<'_>)
where
    S: GradingStore + ?Sized,
{
    let exam_id = update.exam_id.to_string();
    let question_id = update.question_id.to_string();

    match store.auto_save_answer(update).await {
        Ok(true) => {
            tracing::debug!(exam_id = %exam_id, question_id = %question_id, "Answer auto-saved")
        }
        Ok(false) => {
            tracing::debug!(exam_id = %exam_id, "No active exam session; auto-save skipped")
        }
        Err(err) => {
            tracing::warn!(
                error = %err,
                exam_id = %exam_id,
                question_id = %question_id,
                "Auto-save failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryStore;

    fn evaluation() -> Evaluation {
        Evaluation {
            results: Vec::new(),
            passed: 1,
            total: 2,
            score: 5.0,
            status: "failed".to_string(),
        }
    }

    fn draft<'a>(composed: &'a str) -> SubmissionDraft<'a> {
        SubmissionDraft {
            user_id: "student-1",
            exam_id: Some("exam-1"),
            question_id: Some("q1"),
            language: "python",
            source: "print(1)",
            composed_source: composed,
            marks: 10.0,
            run_type: SubmissionRunType::All,
        }
    }

    #[test]
    fn source_hash_is_sha256_hex_of_composed_source() {
        assert_eq!(
            source_hash("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn new_submission_copies_evaluation_and_hashes_composed_code() {
        let submission = new_submission(draft("import sys\n\nprint(1)"), &evaluation());

        assert_eq!(submission.source, "print(1)");
        assert_eq!(submission.source_hash, source_hash("import sys\n\nprint(1)"));
        assert_eq!(submission.passed, 1);
        assert_eq!(submission.total, 2);
        assert_eq!(submission.score, 5.0);
        assert_eq!(submission.status, "failed");
        assert!(Uuid::parse_str(&submission.id).is_ok());
    }

    #[tokio::test]
    async fn persist_failure_is_a_hard_error() {
        let store = MemoryStore::default().failing_inserts();
        let submission = new_submission(draft("print(1)"), &evaluation());

        let error = persist(&store, &submission).await.expect_err("insert fails");
        assert!(matches!(error, GradingError::Persistence(_)));
    }

    #[tokio::test]
    async fn auto_save_failure_is_swallowed() {
        let store = MemoryStore::default().failing_auto_save();
        auto_save(
            &store,
            AnswerUpdate {
                exam_id: "exam-1",
                student_id: "student-1",
                question_id: "q1",
                code: "print(1)",
                language: "python",
                saved_at: primitive_now_utc(),
            },
        )
        .await;

        assert_eq!(store.auto_save_attempts(), 1);
    }
}
