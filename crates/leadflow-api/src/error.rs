//! API 에러 응답.
//!
//! 핸들러와 미들웨어는 모두 [`ApiError`]를 반환하며, 응답 본문은 항상
//! [`ApiErrorResponse`] 형식입니다.
//!
//! | 에러 | 상태 코드 | code |
//! |------|-----------|------|
//! | Unauthenticated | 401 | `UNAUTHENTICATED` |
//! | Forbidden | 403 | 사유별 (`ACCOUNT_DISABLED` 등) |
//! | NotFound | 404 | `NOT_FOUND` |
//! | Validation | 400 | `VALIDATION_ERROR` |
//! | Conflict | 409 | `CONFLICT` |
//! | Internal | 500 | `INTERNAL_ERROR` |

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use leadflow_core::{FieldError, LeadflowError, StoreError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;
use utoipa::ToSchema;

use crate::auth::PasswordError;
use crate::metrics::record_auth_rejection;

/// 인증 실패 시 호출자에게 보여주는 유일한 메시지.
pub const UNAUTHENTICATED_MESSAGE: &str = "not authorized";

/// 내부 에러 시 호출자에게 보여주는 메시지.
pub const INTERNAL_MESSAGE: &str = "internal server error";

/// API 에러 응답 본문.
///
/// ```json
/// {
///   "code": "ACCOUNT_PENDING",
///   "message": "account pending approval",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드
    pub code: String,
    /// 사람이 읽을 수 있는 메시지
    pub message: String,
    /// 추가 정보 (검증 에러의 필드 목록 등)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 발생 시각 (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// HTTP 계층 에러.
#[derive(Debug)]
pub struct ApiError(pub LeadflowError);

/// API 핸들러 Result 타입.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn not_found(what: impl Into<String>) -> Self {
        ApiError(LeadflowError::NotFound(what.into()))
    }

    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError(LeadflowError::invalid_field(field, message))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError(LeadflowError::Internal(message.into()))
    }

    /// 상태 코드.
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            LeadflowError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            LeadflowError::Forbidden(_) => StatusCode::FORBIDDEN,
            LeadflowError::NotFound(_) => StatusCode::NOT_FOUND,
            LeadflowError::Validation(_) => StatusCode::BAD_REQUEST,
            LeadflowError::Conflict(_) => StatusCode::CONFLICT,
            LeadflowError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 응답 본문.
    pub fn body(&self) -> ApiErrorResponse {
        match &self.0 {
            LeadflowError::Unauthenticated(_) => {
                ApiErrorResponse::new("UNAUTHENTICATED", UNAUTHENTICATED_MESSAGE)
            }
            LeadflowError::Forbidden(reason) => {
                ApiErrorResponse::new(reason.code(), reason.to_string())
            }
            LeadflowError::NotFound(what) => {
                ApiErrorResponse::new("NOT_FOUND", format!("{} not found", what))
            }
            LeadflowError::Validation(fields) => ApiErrorResponse::with_details(
                "VALIDATION_ERROR",
                "invalid input",
                serde_json::to_value(fields).unwrap_or(Value::Null),
            ),
            LeadflowError::Conflict(what) => {
                ApiErrorResponse::new("CONFLICT", format!("{} already exists", what))
            }
            LeadflowError::Internal(_) => ApiErrorResponse::new("INTERNAL_ERROR", INTERNAL_MESSAGE),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self.0 {
            LeadflowError::Unauthenticated(failure) => record_auth_rejection(failure.as_str()),
            LeadflowError::Forbidden(reason) => record_auth_rejection(reason.code()),
            LeadflowError::Internal(cause) => error!(cause = %cause, "Request failed"),
            _ => {}
        }

        (self.status(), Json(self.body())).into_response()
    }
}

impl From<LeadflowError> for ApiError {
    fn from(err: LeadflowError) -> Self {
        ApiError(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError(err.into())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        let unique_violation = err
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation());

        if unique_violation {
            ApiError(LeadflowError::Conflict("record".to_string()))
        } else {
            ApiError(LeadflowError::Internal(format!("database: {}", err)))
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("invalid {}", field));
                    FieldError::new(field.to_string(), message)
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));

        ApiError(LeadflowError::Validation(fields))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::invalid_field("body", rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::invalid_field("path", rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::invalid_field("query", rejection.body_text())
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError(LeadflowError::Internal(err.to_string()))
    }
}
