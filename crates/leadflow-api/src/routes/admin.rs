//! 관리자 API 라우트
//!
//! 계정 승인/거절/활성화 토글/역할 변경. 모든 엔드포인트는
//! 활성 상태의 super_admin만 호출할 수 있습니다.
//!
//! # 엔드포인트
//!
//! - `GET /api/v1/admin/pending` - 승인 대기 계정 목록
//! - `GET /api/v1/admin/users` - 전체 계정 목록
//! - `POST /api/v1/admin/approve` - 계정 승인
//! - `DELETE /api/v1/admin/reject/{id}` - 계정 거절 (비활성화, 삭제 아님)
//! - `PUT /api/v1/admin/toggle/{id}` - 활성/비활성 토글
//! - `PUT /api/v1/admin/role/{id}` - 역할 변경

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{delete, get, post, put},
    Json, Router,
};
use leadflow_core::{Account, LeadflowResult, LifecycleOperation, Role};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{ApiErrorResponse, ApiResult};
use crate::metrics::record_account_transition;
use crate::state::AppState;
use crate::types::{ApiJson, ApiPath};

// ==================== Request/Response 타입 ====================

/// 계정 목록 응답
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountsResponse {
    pub users: Vec<Account>,
    pub total: usize,
}

/// 단일 계정 응답
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountUpdateResponse {
    pub user: Account,
}

/// 승인 요청
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ApproveRequest {
    #[serde(alias = "userId")]
    pub user_id: Uuid,
    /// 부여할 역할 (기본값: authorized_user)
    #[serde(default)]
    pub role: Option<String>,
}

/// 역할 변경 요청
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ChangeRoleRequest {
    pub role: String,
}

// ==================== 라우터 ====================

/// 관리자 API 라우터 생성
pub fn admin_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/pending", get(list_pending))
        .route("/users", get(list_users))
        .route("/approve", post(approve))
        .route("/reject/{id}", delete(reject))
        .route("/toggle/{id}", put(toggle_status))
        .route("/role/{id}", put(change_role))
}

// ==================== 핸들러 ====================

fn transitioned(
    operation: LifecycleOperation,
    result: LeadflowResult<Account>,
) -> ApiResult<Json<AccountUpdateResponse>> {
    let user = result?;
    record_account_transition(operation.as_str());
    Ok(Json(AccountUpdateResponse { user }))
}

/// 승인 대기 계정 목록
#[utoipa::path(
    get,
    path = "/api/v1/admin/pending",
    responses(
        (status = 200, description = "승인 대기 계정 (최신순)", body = AccountsResponse),
        (status = 403, description = "권한 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn list_pending(State(state): State<Arc<AppState>>) -> ApiResult<Json<AccountsResponse>> {
    let users = state.lifecycle().pending_accounts().await?;
    Ok(Json(AccountsResponse {
        total: users.len(),
        users,
    }))
}

/// 전체 계정 목록
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    responses(
        (status = 200, description = "전체 계정 (최신순)", body = AccountsResponse),
        (status = 403, description = "권한 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn list_users(State(state): State<Arc<AppState>>) -> ApiResult<Json<AccountsResponse>> {
    let users = state.lifecycle().all_accounts().await?;
    Ok(Json(AccountsResponse {
        total: users.len(),
        users,
    }))
}

/// 계정 승인
#[utoipa::path(
    post,
    path = "/api/v1/admin/approve",
    request_body = ApproveRequest,
    responses(
        (status = 200, description = "승인됨", body = AccountUpdateResponse),
        (status = 400, description = "잘못된 역할", body = ApiErrorResponse),
        (status = 404, description = "계정 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn approve(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<ApproveRequest>,
) -> ApiResult<Json<AccountUpdateResponse>> {
    let role = request
        .role
        .as_deref()
        .map(|r| Role::parse_field("role", r))
        .transpose()?;

    transitioned(
        LifecycleOperation::Approve,
        state.lifecycle().approve(request.user_id, role).await,
    )
}

/// 계정 거절
#[utoipa::path(
    delete,
    path = "/api/v1/admin/reject/{id}",
    params(("id" = Uuid, Path, description = "계정 ID")),
    responses(
        (status = 200, description = "비활성화됨", body = AccountUpdateResponse),
        (status = 404, description = "계정 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn reject(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<AccountUpdateResponse>> {
    transitioned(LifecycleOperation::Reject, state.lifecycle().reject(id).await)
}

/// 활성/비활성 토글
#[utoipa::path(
    put,
    path = "/api/v1/admin/toggle/{id}",
    params(("id" = Uuid, Path, description = "계정 ID")),
    responses(
        (status = 200, description = "토글됨", body = AccountUpdateResponse),
        (status = 403, description = "super_admin 계정은 비활성화 불가", body = ApiErrorResponse),
        (status = 404, description = "계정 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn toggle_status(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<AccountUpdateResponse>> {
    transitioned(
        LifecycleOperation::ToggleStatus,
        state.lifecycle().toggle_status(id).await,
    )
}

/// 역할 변경
#[utoipa::path(
    put,
    path = "/api/v1/admin/role/{id}",
    params(("id" = Uuid, Path, description = "계정 ID")),
    request_body = ChangeRoleRequest,
    responses(
        (status = 200, description = "변경됨", body = AccountUpdateResponse),
        (status = 400, description = "잘못된 역할", body = ApiErrorResponse),
        (status = 404, description = "계정 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn change_role(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<ChangeRoleRequest>,
) -> ApiResult<Json<AccountUpdateResponse>> {
    let role = Role::parse_field("role", &request.role)?;

    transitioned(
        LifecycleOperation::ChangeRole,
        state.lifecycle().change_role(id, role).await,
    )
}
