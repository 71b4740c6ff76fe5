use axum::{
    extract::{Path, Query, State},
    Json,
};
use validator::Validate;

use super::ListSubmissionsQuery;
use crate::api::errors::ApiError;
use crate::api::guards::{require_evaluator, CurrentUser};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories::submissions::{self, HistoryFilter};
use crate::schemas::submission::{ScoreOverrideRequest, SubmissionResponse};

pub(super) async fn list_my_submissions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<ListSubmissionsQuery>,
) -> Result<Json<Vec<SubmissionResponse>>, ApiError> {
    let filter = HistoryFilter {
        question_id: params.question_id.as_deref(),
        exam_id: params.exam_id.as_deref(),
        skip: params.skip,
        limit: params.limit,
    };

    let items = submissions::list_by_user(state.db(), &user.id, filter)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list submissions"))?;

    Ok(Json(items.into_iter().map(SubmissionResponse::from).collect()))
}

pub(super) async fn get_submission(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(submission_id): Path<String>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let submission = submissions::find_by_id(state.db(), &submission_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch submission"))?
        .ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))?;

    if submission.user_id != user.id && !user.role.is_evaluator() {
        return Err(ApiError::Forbidden("Not allowed to view this submission"));
    }

    Ok(Json(submission.into()))
}

pub(super) async fn override_score(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(submission_id): Path<String>,
    Json(payload): Json<ScoreOverrideRequest>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    require_evaluator(&user)?;
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let submission = submissions::find_by_id(state.db(), &submission_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch submission"))?
        .ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))?;

    if payload.score > submission.marks {
        return Err(ApiError::BadRequest(format!(
            "score must not exceed {} marks",
            submission.marks
        )));
    }

    let updated = submissions::override_score(state.db(), &submission_id, payload.score, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to override score"))?
        .ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))?;

    tracing::info!(
        submission_id = %updated.id,
        evaluator_id = %user.id,
        score = payload.score,
        "Submission score overridden"
    );

    Ok(Json(updated.into()))
}
