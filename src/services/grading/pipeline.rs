use crate::core::config::GradingSettings;
use crate::core::time::primitive_now_utc;
use crate::repositories::questions::QuestionWithTestCases;
use crate::repositories::sessions::AnswerUpdate;
use crate::services::grading::persist::{self, SubmissionDraft};
use crate::services::grading::store::GradingStore;
use crate::services::grading::{
    composer, engine, language, selector, GradingError, GradingOutcome, GradingTestCase, RunMode,
};
use crate::services::judge_client::CodeExecutor;

/// One inbound grading call, already authenticated.
#[derive(Debug, Clone)]
pub(crate) struct GradingRequest {
    pub(crate) source: String,
    pub(crate) language: Option<String>,
    pub(crate) mode: RunMode,
    pub(crate) question_id: Option<String>,
    pub(crate) exam_id: Option<String>,
    pub(crate) main_block: Option<String>,
    pub(crate) test_cases: Vec<GradingTestCase>,
    pub(crate) user_id: Option<String>,
}

/// Request data merged with the stored question, if any.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResolvedQuestion {
    pub(crate) test_cases: Vec<GradingTestCase>,
    pub(crate) main_block: Option<String>,
    pub(crate) language: Option<String>,
    pub(crate) marks: f64,
}

pub(crate) struct GradingPipeline<E, S> {
    executor: E,
    store: S,
    default_marks: f64,
    max_source_bytes: usize,
}

impl<E, S> GradingPipeline<E, S>
where
    E: CodeExecutor,
    S: GradingStore,
{
    pub(crate) fn new(executor: E, store: S, settings: &GradingSettings) -> Self {
        Self {
            executor,
            store,
            default_marks: settings.default_marks,
            max_source_bytes: settings.max_source_bytes,
        }
    }

    #[tracing::instrument(
        name = "grading.grade",
        skip_all,
        fields(run_type = %request.mode.as_str(), question_id = ?request.question_id)
    )]
    pub(crate) async fn grade(&self, request: GradingRequest) -> Result<GradingOutcome, GradingError> {
        if request.source.trim().is_empty() {
            return Err(GradingError::MissingSource);
        }
        if request.source.len() > self.max_source_bytes {
            return Err(GradingError::SourceTooLarge { limit: self.max_source_bytes });
        }

        let stored = match request.question_id.as_deref() {
            Some(question_id) => self.lookup_question(question_id).await,
            None => None,
        };
        let resolved = resolve_question(&request, stored, self.default_marks);
        let language_label = resolved.language.as_deref().unwrap_or(language::DEFAULT_LABEL);

        self.auto_save(&request, language_label).await;

        let composed = composer::compose(
            &request.source,
            resolved.main_block.as_deref(),
            resolved.language.as_deref(),
        );
        let language_id = language::language_id(resolved.language.as_deref());

        if request.mode == RunMode::Run {
            let outcome = engine::run_once(&self.executor, &composed, language_id).await?;
            let status = outcome.status.clone();
            let result = engine::exploratory_result(outcome);
            return Ok(GradingOutcome::Exploratory { result, status });
        }

        let selected = selector::select(&resolved.test_cases, &request.mode);
        let evaluation = engine::evaluate(
            &self.executor,
            &composed,
            language_id,
            &selected,
            &request.mode,
            resolved.marks,
        )
        .await?;

        let (Some(run_type), Some(user_id)) = (request.mode.persisted_as(), request.user_id.as_deref())
        else {
            return Ok(GradingOutcome::Evaluated(evaluation));
        };

        let draft = SubmissionDraft {
            user_id,
            exam_id: request.exam_id.as_deref(),
            question_id: request.question_id.as_deref(),
            language: language_label,
            source: &request.source,
            composed_source: &composed,
            marks: resolved.marks,
            run_type,
        };
        let submission = persist::new_submission(draft, &evaluation);
        let stored = persist::persist(&self.store, &submission).await?;

        Ok(GradingOutcome::Persisted(Box::new(stored)))
    }

    /// Stores the draft answer under the language it will be judged in.
    async fn auto_save(&self, request: &GradingRequest, language_label: &str) {
        let (Some(exam_id), Some(question_id), Some(user_id)) =
            (request.exam_id.as_deref(), request.question_id.as_deref(), request.user_id.as_deref())
        else {
            return;
        };

        let update = AnswerUpdate {
            exam_id,
            student_id: user_id,
            question_id,
            code: &request.source,
            language: language_label,
            saved_at: primitive_now_utc(),
        };
        persist::auto_save(&self.store, update).await;
    }

    async fn lookup_question(&self, question_id: &str) -> Option<QuestionWithTestCases> {
        if question_id.trim().is_empty() {
            return None;
        }

        match self.store.find_question(question_id).await {
            Ok(Some(found)) => Some(found),
            Ok(None) => {
                tracing::debug!(question_id, "No stored question; using request data");
                None
            }
            Err(err) => {
                tracing::warn!(error = %err, question_id, "Question lookup failed; using request data");
                None
            }
        }
    }
}

/// Stored test cases win when non-empty, the stored scaffold wins over the
/// request's, and the request's language wins over the question's.
pub(crate) fn resolve_question(
    request: &GradingRequest,
    stored: Option<QuestionWithTestCases>,
    default_marks: f64,
) -> ResolvedQuestion {
    let Some(QuestionWithTestCases { question, test_cases }) = stored else {
        return ResolvedQuestion {
            test_cases: request.test_cases.clone(),
            main_block: request.main_block.clone(),
            language: request.language.clone(),
            marks: default_marks,
        };
    };

    let test_cases = if test_cases.is_empty() {
        request.test_cases.clone()
    } else {
        test_cases.into_iter().map(GradingTestCase::from).collect()
    };
    let main_block = question
        .main_block
        .filter(|block| !block.trim().is_empty())
        .or_else(|| request.main_block.clone());

    ResolvedQuestion {
        test_cases,
        main_block,
        language: request.language.clone().or(question.language),
        marks: question.marks,
    }
}
