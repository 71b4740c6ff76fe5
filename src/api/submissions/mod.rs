mod handlers;

use axum::{routing::get, routing::post, Router};
use serde::Deserialize;

use crate::core::state::AppState;

#[derive(Debug, Deserialize)]
pub(crate) struct ListSubmissionsQuery {
    #[serde(default)]
    pub(crate) question_id: Option<String>,
    #[serde(default)]
    pub(crate) exam_id: Option<String>,
    #[serde(default)]
    pub(crate) skip: i64,
    #[serde(default = "crate::api::pagination::default_limit")]
    pub(crate) limit: i64,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_my_submissions))
        .route("/:submission_id", get(handlers::get_submission))
        .route("/:submission_id/override-score", post(handlers::override_score))
}
