//! Conversion of domain errors into HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use taxbook_core::budget::BudgetError;
use taxbook_core::year::YearError;
use taxbook_db::{RepositoryError, StoreError};
use taxbook_shared::AppError;
use tracing::error;

/// Error returned by handlers, rendered as `{"error": code, "message": text}`.
#[derive(Debug)]
pub struct ApiError {
    error: AppError,
    details: Option<Value>,
}

impl ApiError {
    /// The underlying application error.
    #[must_use]
    pub const fn app_error(&self) -> &AppError {
        &self.error
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self {
            error,
            details: None,
        }
    }
}

fn year_error(err: YearError) -> ApiError {
    let message = err.to_string();
    match err {
        YearError::YearNotFound(_) => AppError::NotFound(message).into(),
        YearError::OperationInProgress(_) => AppError::Conflict(message).into(),
        YearError::ClosureBlocked { errors, .. } => ApiError {
            error: AppError::BusinessRule(message),
            details: Some(json!({ "errors": errors })),
        },
        YearError::NotActive { .. }
        | YearError::RegistryMissing
        | YearError::InvalidTransition { .. } => AppError::BusinessRule(message).into(),
    }
}

fn budget_error(err: &BudgetError) -> AppError {
    let message = err.to_string();
    match err {
        BudgetError::Archived(_) | BudgetError::NotActiveYear { .. } => {
            AppError::BusinessRule(message)
        }
        BudgetError::InvalidMonth(_)
        | BudgetError::UnknownLine(_)
        | BudgetError::NegativeAmount(_) => AppError::Validation(message),
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        let message = err.to_string();
        match err {
            RepositoryError::Validation(_) => AppError::Validation(message).into(),
            RepositoryError::Year(err) => year_error(err),
            RepositoryError::Budget(err) => budget_error(&err).into(),
            RepositoryError::TransactionNotFound(_)
            | RepositoryError::Store(StoreError::NotFound { .. }) => {
                AppError::NotFound(message).into()
            }
            RepositoryError::Archived(_) => AppError::BusinessRule(message).into(),
            RepositoryError::Store(err) => {
                error!(error = %err, "Store operation failed");
                AppError::Store(message).into()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut body = json!({
            "error": self.error.error_code(),
            "message": self.error.to_string(),
        });
        if let (Some(details), Some(map)) = (self.details, body.as_object_mut()) {
            map.insert("details".to_string(), details);
        }
        (status, Json(body)).into_response()
    }
}
