//! Error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use budgetline_db::repositories::{AccountError, BudgetRepoError, JournalError, OrganizationError};
use budgetline_shared::AppError;
use tracing::error;

/// Handler error; renders as `{"error": <code>, "message": <text>}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

macro_rules! api_error_from {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for ApiError {
                fn from(err: $source) -> Self {
                    Self(err.into())
                }
            }
        )*
    };
}

api_error_from!(
    AppError,
    AccountError,
    BudgetRepoError,
    JournalError,
    OrganizationError,
);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.0.is_internal() {
            error!(error = %self.0, code = self.0.error_code(), "Request failed");
        }

        (status, Json(self.0.body())).into_response()
    }
}

/// Result type for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use rstest::rstest;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = ApiError(err).into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[rstest]
    #[case(AppError::NotFound("budget".into()), StatusCode::NOT_FOUND, "NOT_FOUND")]
    #[case(AppError::Validation("bad".into()), StatusCode::BAD_REQUEST, "VALIDATION_ERROR")]
    #[case(
        AppError::BusinessRule("closed".into()),
        StatusCode::UNPROCESSABLE_ENTITY,
        "BUSINESS_RULE_VIOLATION"
    )]
    #[case(AppError::Conflict("dup".into()), StatusCode::CONFLICT, "CONFLICT")]
    #[tokio::test]
    async fn test_status_and_code(
        #[case] err: AppError,
        #[case] status: StatusCode,
        #[case] code: &str,
    ) {
        let (actual, body) = render(err).await;
        assert_eq!(actual, status);
        assert_eq!(body["error"], code);
    }

    #[tokio::test]
    async fn test_internal_detail_hidden() {
        let (status, body) = render(AppError::Database("connection refused".into())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "DATABASE_ERROR");
        assert_eq!(body["message"], "An error occurred");
    }

    #[tokio::test]
    async fn test_client_error_keeps_message() {
        let (_, body) = render(AppError::Conflict("Budget name already exists".into())).await;
        assert_eq!(body["message"], "Conflict: Budget name already exists");
    }
}
