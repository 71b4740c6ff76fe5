use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{AuthUser, MaybeUser};
use crate::core::state::AppState;
use crate::schemas::grading::{ExecuteCodeRequest, ExecuteCodeResponse, LanguageResponse};
use crate::services::grading::store::PgGradingStore;
use crate::services::grading::{
    language, GradingError, GradingPipeline, GradingRequest, RunMode,
};

const RATE_LIMIT_WINDOW_SECONDS: u64 = 60;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/execute", post(execute_code))
        .route("/languages", get(list_languages))
}

async fn execute_code(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Json(payload): Json<ExecuteCodeRequest>,
) -> Result<Json<ExecuteCodeResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let source = required_source(payload.source)?;

    if let Some(user) = &user {
        enforce_rate_limit(&state, user).await?;
    }

    let mode = RunMode::parse(&payload.run_type);
    metrics::counter!("grading_requests_total", "run_type" => mode.as_str().to_string())
        .increment(1);

    let request = GradingRequest {
        source,
        language: payload.language,
        mode,
        question_id: payload.question_id,
        exam_id: payload.exam_id,
        main_block: payload.main_block,
        test_cases: payload.test_cases,
        user_id: user.map(|user| user.id),
    };

    let pipeline = GradingPipeline::new(
        state.judge().clone(),
        PgGradingStore::new(state.db().clone()),
        state.settings().grading(),
    );
    let outcome = pipeline.grade(request).await?;

    Ok(Json(outcome.into()))
}

/// Blank sources are rejected before they count against the caller's quota.
fn required_source(source: Option<String>) -> Result<String, ApiError> {
    match source {
        Some(source) if !source.trim().is_empty() => Ok(source),
        _ => Err(GradingError::MissingSource.into()),
    }
}

async fn list_languages() -> Json<Vec<LanguageResponse>> {
    Json(
        language::supported_languages()
            .into_iter()
            .map(|(label, language_id)| LanguageResponse { label, language_id })
            .collect(),
    )
}

async fn enforce_rate_limit(state: &AppState, user: &AuthUser) -> Result<(), ApiError> {
    let limit = state.settings().grading().rate_limit_per_minute;
    if limit == 0 {
        return Ok(());
    }

    let key = format!("grading:rate:{}", user.id);
    if state.redis().allow(&key, limit, RATE_LIMIT_WINDOW_SECONDS).await {
        Ok(())
    } else {
        tracing::warn!(user_id = %user.id, "Grading rate limit exceeded");
        Err(ApiError::TooManyRequests("Too many grading requests, try again later"))
    }
}
