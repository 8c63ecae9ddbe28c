use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hatch_core::{CommitError, HatchError};

/// Carries an explicit 409 through the `anyhow::Error` chain for conflicts
/// that have no `HatchError` of their own.
#[derive(Debug)]
struct ConflictError(String);

impl std::fmt::Display for ConflictError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ConflictError {}

// ---------------------------------------------------------------------------
// AppError - unified error type for HTTP responses
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self(ConflictError(msg.into()).into())
    }

    pub fn join(err: tokio::task::JoinError) -> Self {
        Self(anyhow::anyhow!("task join error: {err}"))
    }
}

fn status_for(e: &HatchError) -> StatusCode {
    match e {
        HatchError::NotInitialized => StatusCode::BAD_REQUEST,
        HatchError::IdeaNotFound(_)
        | HatchError::ProjectNotFound(_)
        | HatchError::WizardNotFound(_) => StatusCode::NOT_FOUND,
        HatchError::IdeaExists(_) | HatchError::SubmitInFlight | HatchError::NoSubmitInFlight => {
            StatusCode::CONFLICT
        }
        HatchError::InvalidSlug(_)
        | HatchError::UnknownRole(_)
        | HatchError::UnknownToggle(_)
        | HatchError::UnknownBoardTemplate(_)
        | HatchError::InvalidDate(_)
        | HatchError::InvalidCommand(_)
        | HatchError::MilestoneIndex { .. } => StatusCode::BAD_REQUEST,
        HatchError::Validation { .. }
        | HatchError::NotOnFinalStep { .. }
        | HatchError::NoNextStep(_) => StatusCode::UNPROCESSABLE_ENTITY,
        HatchError::WizardClosed(_) => StatusCode::GONE,
        HatchError::Commit(c) => match c {
            CommitError::Conflict(_) => StatusCode::CONFLICT,
            CommitError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CommitError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        },
        HatchError::Io(_) | HatchError::Yaml(_) | HatchError::Json(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if self.0.downcast_ref::<ConflictError>().is_some() {
            StatusCode::CONFLICT
        } else {
            self.0
                .downcast_ref::<HatchError>()
                .map(status_for)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
