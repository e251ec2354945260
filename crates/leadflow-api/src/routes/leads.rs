//! 리드 API 라우트
//!
//! # 엔드포인트
//!
//! - `GET /api/v1/leads` - 리드 목록 (검색/상태/기간 필터, 페이지네이션)
//! - `GET /api/v1/leads/stats` - 상태별/유입 경로별 통계
//! - `GET /api/v1/leads/{id}` - 리드 조회
//! - `POST /api/v1/leads` - 리드 생성
//! - `PUT /api/v1/leads/{id}` - 리드 부분 수정
//! - `DELETE /api/v1/leads/{id}` - 리드 삭제

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use leadflow_core::LeadStatus;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::repository::{LeadFilter, LeadRecord, LeadRepository, LeadStats, NewLead, UpdateLead};
use crate::state::AppState;
use crate::types::{ApiJson, ApiPath, ApiQuery, PageRequest, Pagination, TimeFilter};

// ==================== Request/Response 타입 ====================

/// 리드 목록 조회 요청
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct LeadListQuery {
    /// 이름/이메일/전화번호 검색어
    pub search: Option<String>,
    /// hot | warm | cold | all
    pub status: Option<String>,
    /// all | today | yesterday | last3days | last7days | lastmonth
    #[serde(alias = "timeFilter")]
    pub time_filter: Option<String>,
    /// 페이지 (기본값: 1)
    pub page: Option<i64>,
    /// 페이지 크기 (기본값: 10, 최대: 100)
    pub limit: Option<i64>,
}

impl LeadListQuery {
    /// 저장소 필터로 변환. 알 수 없는 상태 값은 검증 에러입니다.
    pub fn to_filter(&self) -> ApiResult<LeadFilter> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(value) => Some(LeadStatus::parse(value).ok_or_else(|| {
                ApiError::invalid_field("status", format!("unknown lead status '{}'", value))
            })?),
        };

        let time_filter = self
            .time_filter
            .as_deref()
            .map(TimeFilter::parse)
            .unwrap_or_default();

        Ok(LeadFilter {
            search: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            status,
            created: time_filter.range(Utc::now()),
        })
    }
}

/// 리드 목록 응답
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeadListResponse {
    pub leads: Vec<LeadRecord>,
    pub pagination: Pagination,
}

/// 리드 단건 응답
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeadResponse {
    pub lead: LeadRecord,
}

/// 리드 통계 응답
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeadStatsResponse {
    pub stats: LeadStats,
}

/// 리드 삭제 응답
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeadDeletedResponse {
    pub id: Uuid,
    pub deleted: bool,
}

// ==================== 라우터 ====================

/// 리드 API 라우터 생성
pub fn leads_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_leads).post(create_lead))
        .route("/stats", get(lead_stats))
        .route("/{id}", get(get_lead).put(update_lead).delete(delete_lead))
}

// ==================== 핸들러 ====================

/// 리드 목록
#[utoipa::path(
    get,
    path = "/api/v1/leads",
    params(LeadListQuery),
    responses(
        (status = 200, description = "리드 목록 (최신순)", body = LeadListResponse),
        (status = 400, description = "잘못된 필터", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "leads"
)]
pub async fn list_leads(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<LeadListQuery>,
) -> ApiResult<Json<LeadListResponse>> {
    let filter = query.to_filter()?;
    let page = PageRequest::new(query.page, query.limit);

    let (leads, total) = LeadRepository::list(state.pool()?, &filter, page).await?;

    Ok(Json(LeadListResponse {
        leads,
        pagination: Pagination::new(page, total),
    }))
}

/// 리드 통계
#[utoipa::path(
    get,
    path = "/api/v1/leads/stats",
    responses((status = 200, description = "리드 통계", body = LeadStatsResponse)),
    security(("bearer_auth" = [])),
    tag = "leads"
)]
pub async fn lead_stats(State(state): State<Arc<AppState>>) -> ApiResult<Json<LeadStatsResponse>> {
    let stats = LeadRepository::stats(state.pool()?).await?;
    Ok(Json(LeadStatsResponse { stats }))
}

/// 리드 조회
#[utoipa::path(
    get,
    path = "/api/v1/leads/{id}",
    params(("id" = Uuid, Path, description = "리드 ID")),
    responses(
        (status = 200, description = "리드", body = LeadResponse),
        (status = 404, description = "리드 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "leads"
)]
pub async fn get_lead(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<LeadResponse>> {
    let lead = LeadRepository::get_by_id(state.pool()?, id)
        .await?
        .ok_or_else(|| ApiError::not_found("lead"))?;

    Ok(Json(LeadResponse { lead }))
}

/// 리드 생성
#[utoipa::path(
    post,
    path = "/api/v1/leads",
    request_body = NewLead,
    responses(
        (status = 201, description = "생성됨", body = LeadResponse),
        (status = 400, description = "입력 오류", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "leads"
)]
pub async fn create_lead(
    State(state): State<Arc<AppState>>,
    ApiJson(input): ApiJson<NewLead>,
) -> ApiResult<impl IntoResponse> {
    input.validate()?;

    let lead = LeadRepository::create(state.pool()?, &input).await?;
    info!(lead_id = %lead.id, source = %lead.source, "Lead created");

    Ok((StatusCode::CREATED, Json(LeadResponse { lead })))
}

/// 리드 부분 수정
#[utoipa::path(
    put,
    path = "/api/v1/leads/{id}",
    params(("id" = Uuid, Path, description = "리드 ID")),
    request_body = UpdateLead,
    responses(
        (status = 200, description = "수정됨", body = LeadResponse),
        (status = 400, description = "입력 오류", body = ApiErrorResponse),
        (status = 404, description = "리드 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "leads"
)]
pub async fn update_lead(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<UpdateLead>,
) -> ApiResult<Json<LeadResponse>> {
    input.validate()?;

    let lead = LeadRepository::update(state.pool()?, id, &input)
        .await?
        .ok_or_else(|| ApiError::not_found("lead"))?;

    Ok(Json(LeadResponse { lead }))
}

/// 리드 삭제
#[utoipa::path(
    delete,
    path = "/api/v1/leads/{id}",
    params(("id" = Uuid, Path, description = "리드 ID")),
    responses(
        (status = 200, description = "삭제됨", body = LeadDeletedResponse),
        (status = 404, description = "리드 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "leads"
)]
pub async fn delete_lead(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<LeadDeletedResponse>> {
    if !LeadRepository::delete(state.pool()?, id).await? {
        return Err(ApiError::not_found("lead"));
    }

    info!(lead_id = %id, "Lead deleted");
    Ok(Json(LeadDeletedResponse { id, deleted: true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_all_means_no_filter() {
        let query = LeadListQuery {
            status: Some("all".to_string()),
            ..Default::default()
        };
        assert!(query.to_filter().unwrap().status.is_none());

        let query = LeadListQuery {
            status: Some("hot".to_string()),
            search: Some("  ".to_string()),
            ..Default::default()
        };
        let filter = query.to_filter().unwrap();
        assert_eq!(filter.status, Some(LeadStatus::Hot));
        assert!(filter.search.is_none());
    }

    #[test]
    fn test_unknown_status_is_validation_error() {
        let query = LeadListQuery {
            status: Some("lukewarm".to_string()),
            ..Default::default()
        };
        let err = query.to_filter().unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_time_filter_alias() {
        let query: LeadListQuery =
            serde_json::from_value(serde_json::json!({ "timeFilter": "today" })).unwrap();
        assert_eq!(query.time_filter.as_deref(), Some("today"));
        assert!(query.to_filter().unwrap().created.from.is_some());
    }
}
