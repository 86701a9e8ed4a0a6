use axum::{http::StatusCode, response::IntoResponse, Json};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    CapacityExceeded(String),
    #[error("{0}")]
    EntityNotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    ValidationError(#[from] garde::Report),
    #[error("current password is incorrect")]
    InvalidCurrentPassword,
    #[error("transaction could not be executed")]
    TransactionError(#[source] sqlx::Error),
    #[error("an error occurred while running a database query")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("{0}")]
    KeyValueStoreError(#[from] redis::RedisError),
    #[error("{0}")]
    BcryptError(#[from] bcrypt::BcryptError),
    #[error("blocking task failed: {0}")]
    BlockingTaskError(#[from] tokio::task::JoinError),
    #[error("{0}")]
    TokenEncodingError(#[from] jsonwebtoken::errors::Error),
    #[error("{0}")]
    ConvertToUuidError(#[from] uuid::Error),
    #[error("invalid user name or password")]
    InvalidCredentials,
    #[error("authentication required")]
    UnauthenticatedError,
    #[error("operation not permitted")]
    ForbiddenOperation,
    #[error("{0}")]
    ConversionEntityError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::UnprocessableEntity(_) | AppError::CapacityExceeded(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ValidationError(_)
            | AppError::ConvertToUuidError(_)
            | AppError::InvalidCurrentPassword => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::UnauthenticatedError => {
                StatusCode::UNAUTHORIZED
            }
            AppError::ForbiddenOperation => StatusCode::FORBIDDEN,
            AppError::TransactionError(_)
            | AppError::SpecificOperationError(_)
            | AppError::KeyValueStoreError(_)
            | AppError::BcryptError(_)
            | AppError::BlockingTaskError(_)
            | AppError::TokenEncodingError(_)
            | AppError::ConversionEntityError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code();
        match status_code {
            StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!(
                    error.cause_chain = ?self,
                    error.message = %self,
                    "Unexpected error happened"
                );
                status_code.into_response()
            }
            // Rejections carry no detail so callers cannot probe which resources exist.
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => status_code.into_response(),
            _ => (
                status_code,
                Json(serde_json::json!({ "message": self.to_string() })),
            )
                .into_response(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::CapacityExceeded("full".into()), StatusCode::UNPROCESSABLE_ENTITY)]
    #[case(AppError::EntityNotFound("trip".into()), StatusCode::NOT_FOUND)]
    #[case(AppError::Conflict("user name".into()), StatusCode::CONFLICT)]
    #[case(AppError::InvalidCurrentPassword, StatusCode::BAD_REQUEST)]
    #[case(AppError::InvalidCredentials, StatusCode::UNAUTHORIZED)]
    #[case(AppError::UnauthenticatedError, StatusCode::UNAUTHORIZED)]
    #[case(AppError::ForbiddenOperation, StatusCode::FORBIDDEN)]
    #[case(AppError::ConversionEntityError("role".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    fn maps_errors_to_status_codes(#[case] error: AppError, #[case] expected: StatusCode) {
        assert_eq!(error.into_response().status(), expected);
    }

    #[test]
    fn capacity_and_not_found_stay_distinguishable() {
        let capacity = AppError::CapacityExceeded("full".into());
        let not_found = AppError::EntityNotFound("missing".into());
        assert_ne!(capacity.status_code(), not_found.status_code());
    }
}
