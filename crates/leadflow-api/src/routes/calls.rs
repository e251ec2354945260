//! 통화 API 라우트
//!
//! # 엔드포인트
//!
//! - `GET /api/v1/calls` - 통화 목록 (상태 필터, 페이지네이션)
//! - `GET /api/v1/calls/stats` - 통화 통계
//! - `POST /api/v1/calls` - 통화 기록 생성

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use leadflow_core::CallStatus;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::repository::{CallRecord, CallRepository, CallStats, NewCall};
use crate::state::AppState;
use crate::types::{ApiJson, ApiQuery, PageRequest, Pagination};

// ==================== Request/Response 타입 ====================

/// 통화 목록 조회 요청
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct CallListQuery {
    /// completed | missed | failed | all
    pub status: Option<String>,
    /// 페이지 (기본값: 1)
    pub page: Option<i64>,
    /// 페이지 크기 (기본값: 10, 최대: 100)
    pub limit: Option<i64>,
}

impl CallListQuery {
    fn status_filter(&self) -> Result<Option<CallStatus>, ApiError> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") | Some("all") => Ok(None),
            Some(value) => CallStatus::parse(value).map(Some).ok_or_else(|| {
                ApiError::invalid_field("status", format!("unknown call status '{}'", value))
            }),
        }
    }
}

/// 통화 목록 응답
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CallListResponse {
    pub calls: Vec<CallRecord>,
    pub pagination: Pagination,
}

/// 통화 생성 응답
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CallResponse {
    pub call: CallRecord,
}

/// 통화 통계 응답
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CallStatsResponse {
    pub stats: CallStats,
}

// ==================== 라우터 ====================

/// 통화 API 라우터 생성
pub fn calls_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_calls).post(create_call))
        .route("/stats", get(call_stats))
}

// ==================== 핸들러 ====================

/// 통화 목록
#[utoipa::path(
    get,
    path = "/api/v1/calls",
    params(CallListQuery),
    responses(
        (status = 200, description = "통화 목록 (최신순)", body = CallListResponse),
        (status = 400, description = "잘못된 필터", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "calls"
)]
pub async fn list_calls(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<CallListQuery>,
) -> ApiResult<Json<CallListResponse>> {
    let status = query.status_filter()?;
    let page = PageRequest::new(query.page, query.limit);

    let (calls, total) = CallRepository::list(state.pool()?, status, page).await?;

    Ok(Json(CallListResponse {
        calls,
        pagination: Pagination::new(page, total),
    }))
}

/// 통화 통계
#[utoipa::path(
    get,
    path = "/api/v1/calls/stats",
    responses((status = 200, description = "통화 통계", body = CallStatsResponse)),
    security(("bearer_auth" = [])),
    tag = "calls"
)]
pub async fn call_stats(State(state): State<Arc<AppState>>) -> ApiResult<Json<CallStatsResponse>> {
    let stats = CallRepository::stats(state.pool()?).await?;
    Ok(Json(CallStatsResponse { stats }))
}

/// 통화 기록 생성
#[utoipa::path(
    post,
    path = "/api/v1/calls",
    request_body = NewCall,
    responses(
        (status = 201, description = "생성됨", body = CallResponse),
        (status = 400, description = "입력 오류", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "calls"
)]
pub async fn create_call(
    State(state): State<Arc<AppState>>,
    ApiJson(input): ApiJson<NewCall>,
) -> ApiResult<impl IntoResponse> {
    input.validate()?;

    let call = CallRepository::create(state.pool()?, &input).await?;

    Ok((StatusCode::CREATED, Json(CallResponse { call })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_filter() {
        let query = |s: &str| CallListQuery {
            status: Some(s.to_string()),
            ..Default::default()
        };

        assert_eq!(query("all").status_filter().unwrap(), None);
        assert_eq!(
            query("missed").status_filter().unwrap(),
            Some(CallStatus::Missed)
        );
        assert!(query("dropped").status_filter().is_err());
        assert_eq!(CallListQuery::default().status_filter().unwrap(), None);
    }
}
