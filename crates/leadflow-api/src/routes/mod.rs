//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! | 경로 | 접근 정책 |
//! |------|-----------|
//! | `/health` | 공개 |
//! | `/api/v1/auth/signup`, `/api/v1/auth/login` | 공개 |
//! | `/api/v1/auth/me` | 인증 |
//! | `/api/v1/admin` | 인증 → 활성 → super_admin |
//! | `/api/v1/leads`, `/api/v1/chats`, `/api/v1/calls` | 인증 → 활성 → super_admin/authorized_user |

pub mod admin;
pub mod auth;
pub mod calls;
pub mod chats;
pub mod health;
pub mod leads;

pub use admin::{admin_router, AccountUpdateResponse, AccountsResponse};
pub use auth::{auth_router, AccountResponse, AuthResponse};
pub use calls::{calls_router, CallListResponse, CallStatsResponse};
pub use chats::{chats_router, ConversationsResponse, ThreadResponse};
pub use health::{health_router, HealthResponse};
pub use leads::{leads_router, LeadListResponse, LeadResponse, LeadStatsResponse};

use axum::Router;
use leadflow_core::{AccessPolicy, Role, RoleSet};
use std::sync::Arc;

use crate::auth::protect;
use crate::state::AppState;

/// 관리자 API 허용 역할.
pub const ADMIN_ROLES: RoleSet = RoleSet::only(Role::SuperAdmin);

/// 업무 API(리드/채팅/통화) 허용 역할.
pub const BUSINESS_ROLES: RoleSet = RoleSet::only(Role::SuperAdmin).with(Role::AuthorizedUser);

/// 전체 API 라우터 생성.
///
/// 보호 대상 서브 라우터마다 접근 정책을 명시적으로 적용합니다.
pub fn create_api_router(state: Arc<AppState>) -> Router {
    let business = AccessPolicy::active_with_roles(BUSINESS_ROLES);

    Router::new()
        // 헬스 체크 엔드포인트
        .nest("/health", health_router())
        // API v1 엔드포인트
        .nest("/api/v1/auth", auth_router(&state))
        .nest(
            "/api/v1/admin",
            protect(
                admin_router(),
                &state,
                AccessPolicy::active_with_roles(ADMIN_ROLES),
            ),
        )
        .nest("/api/v1/leads", protect(leads_router(), &state, business))
        .nest("/api/v1/chats", protect(chats_router(), &state, business))
        .nest("/api/v1/calls", protect(calls_router(), &state, business))
        .with_state(state)
}
