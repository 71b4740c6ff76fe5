use serde::{Deserialize, Serialize};
use sqlx::Type;

/// Platform roles carried in the caller's access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum UserRole {
    Student,
    Trainer,
    Admin,
    Master,
}

impl UserRole {
    /// Roles allowed to review other users' submissions and override scores.
    pub(crate) fn is_evaluator(self) -> bool {
        matches!(self, Self::Trainer | Self::Admin | Self::Master)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "examsessionstatus", rename_all = "snake_case")]
pub(crate) enum SessionStatus {
    Pending,
    InProgress,
    Submitted,
    Expired,
}

/// Run types that produce a stored submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "submissionruntype", rename_all = "snake_case")]
pub(crate) enum SubmissionRunType {
    All,
    TestAll,
    AutoFinal,
}
