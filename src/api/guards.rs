use async_trait::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::{header, request::Parts};

use crate::api::errors::ApiError;
use crate::core::{security, state::AppState};
use crate::db::types::UserRole;

/// Caller identity taken from a verified access token. Tokens are issued
/// elsewhere; no user lookup happens here.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AuthUser {
    pub(crate) id: String,
    pub(crate) role: UserRole,
}

pub(crate) struct CurrentUser(pub(crate) AuthUser);

/// Identity for endpoints that also serve anonymous callers. A malformed or
/// expired token is still rejected.
pub(crate) struct MaybeUser(pub(crate) Option<AuthUser>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let State(app_state) = State::<AppState>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;

        let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) else {
            return Ok(MaybeUser(None));
        };

        let token = auth_header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

        let claims = security::verify_token(token, app_state.settings())
            .map_err(|_| ApiError::Unauthorized("Invalid authentication credentials"))?;

        Ok(MaybeUser(Some(AuthUser {
            id: claims.sub,
            role: claims.role.unwrap_or(UserRole::Student),
        })))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let MaybeUser(user) = MaybeUser::from_request_parts(parts, state).await?;
        user.map(CurrentUser).ok_or(ApiError::Unauthorized("Invalid authentication credentials"))
    }
}

pub(crate) fn require_evaluator(user: &AuthUser) -> Result<(), ApiError> {
    if user.role.is_evaluator() {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Evaluator access required"))
    }
}
