//! 인증 API 라우트
//!
//! # 엔드포인트
//!
//! - `POST /api/v1/auth/signup` - 회원가입 (pending 상태로 생성)
//! - `POST /api/v1/auth/login` - 로그인
//! - `GET /api/v1/auth/me` - 내 계정 조회 (인증만 필요, 상태 무관)

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use leadflow_core::{normalize_email, AccessPolicy, Account, AuthFailure, LeadflowError, NewAccount};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{hash_password, protect, verify_password, CurrentAccount, IssuedToken};
use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::state::AppState;
use crate::types::ApiJson;

// ==================== Request/Response 타입 ====================

/// 회원가입 요청
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "invalid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

/// 로그인 요청
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// 인증 응답 (계정 + 토큰)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: Account,
    #[serde(flatten)]
    pub token: IssuedToken,
}

/// 계정 응답
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountResponse {
    pub user: Account,
}

// ==================== 라우터 ====================

/// 인증 API 라우터 생성
pub fn auth_router(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    let me = protect(
        Router::new().route("/me", get(me)),
        state,
        AccessPolicy::authenticated(),
    );

    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .merge(me)
}

// ==================== 핸들러 ====================

fn issue_for(state: &AppState, account: Account) -> ApiResult<AuthResponse> {
    let token = state
        .tokens
        .issue(account.id)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(AuthResponse {
        user: account,
        token,
    })
}

/// 회원가입
///
/// POST /api/v1/auth/signup
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "가입 성공 (승인 대기)", body = AuthResponse),
        (status = 400, description = "입력 오류", body = ApiErrorResponse),
        (status = 409, description = "이메일 중복", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn signup(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<SignupRequest>,
) -> ApiResult<impl IntoResponse> {
    request.validate()?;

    let password_hash = hash_password(&request.password)?;
    let account = state
        .accounts
        .create(NewAccount::new(&request.name, &request.email, password_hash))
        .await?;

    info!(account_id = %account.id, email = %account.email, "Account signed up");

    Ok((StatusCode::CREATED, Json(issue_for(&state, account)?)))
}

/// 로그인
///
/// 존재하지 않는 이메일과 잘못된 비밀번호는 구분되지 않습니다.
/// 계정 상태는 여기서 검사하지 않습니다.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공", body = AuthResponse),
        (status = 401, description = "인증 실패", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    request.validate()?;

    let bad_password = || ApiError(LeadflowError::Unauthenticated(AuthFailure::BadPassword));

    let Some(credentials) = state
        .accounts
        .find_credentials(&normalize_email(&request.email))
        .await?
    else {
        debug!(reason = AuthFailure::BadPassword.as_str(), "Login rejected: unknown email");
        return Err(bad_password());
    };

    if !verify_password(&request.password, &credentials.password_hash)? {
        debug!(
            reason = AuthFailure::BadPassword.as_str(),
            account_id = %credentials.account.id,
            "Login rejected: password mismatch"
        );
        return Err(bad_password());
    }

    let account = state.lifecycle().record_login(credentials.account.id).await?;
    info!(account_id = %account.id, status = %account.status, "Logged in");

    Ok(Json(issue_for(&state, account)?))
}

/// 내 계정 조회
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "현재 계정", body = AccountResponse),
        (status = 401, description = "인증 실패", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn me(CurrentAccount(account): CurrentAccount) -> Json<AccountResponse> {
    Json(AccountResponse { user: account })
}
