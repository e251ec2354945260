//! OpenAPI 문서화 설정.
//!
//! utoipa로 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use leadflow_core::{
    Account, AccountStatus, CallStatus, Direction, FieldError, LeadSource, LeadStatus, Role,
};

use crate::auth::IssuedToken;
use crate::error::ApiErrorResponse;
use crate::repository::{
    CallRecord, CallStats, ChatMessageRecord, ConversationSummary, LeadRecord, LeadStats, NewCall,
    NewLead, SendMessage, UpdateLead,
};
use crate::routes::{
    admin::{ApproveRequest, ChangeRoleRequest},
    auth::{LoginRequest, SignupRequest},
    calls::CallResponse,
    chats::{MarkReadResponse, SentResponse},
    leads::LeadDeletedResponse,
    AccountResponse, AccountUpdateResponse, AccountsResponse, AuthResponse, CallListResponse,
    CallStatsResponse, ConversationsResponse, HealthResponse, LeadListResponse, LeadResponse,
    LeadStatsResponse, ThreadResponse,
};
use crate::types::{Pagination, TimeFilter};

// ==================== 보안 스키마 ====================

/// `bearer_auth` 보안 스키마 등록.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

// ==================== OpenAPI 문서 정의 ====================

/// LeadFlow API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "LeadFlow API",
        version = "0.1.0",
        description = r#"
# LeadFlow 리드 관리 REST API

## 접근 제어

보호된 엔드포인트는 `Authorization: Bearer <token>` 헤더가 필요합니다.
모든 요청은 인증 → 계정 상태 → 역할 순서로 검사됩니다.

- 401 `UNAUTHENTICATED`: 자격증명 문제 (사유는 노출하지 않음)
- 403 `ACCOUNT_PENDING` / `ACCOUNT_DISABLED` / `ROLE_NOT_PERMITTED`
- 500 `INTERNAL_ERROR`: 서버 장애 (401과 구분됨)

신규 가입 계정은 관리자 승인 전까지 `pending` 상태입니다.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "로컬 개발 서버"),
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "auth", description = "인증 - 가입, 로그인, 내 계정"),
        (name = "admin", description = "관리자 - 계정 승인/거절/토글/역할 변경"),
        (name = "leads", description = "리드 - 조회, 필터, 통계"),
        (name = "chats", description = "채팅 - 대화 목록, 스레드, 전송"),
        (name = "calls", description = "통화 - 기록, 통계")
    ),
    // ==================== 스키마 등록 ====================
    components(
        schemas(
            // ===== Common =====
            ApiErrorResponse,
            FieldError,
            Pagination,
            TimeFilter,
            // ===== Accounts =====
            Account,
            Role,
            AccountStatus,
            IssuedToken,
            SignupRequest,
            LoginRequest,
            AuthResponse,
            AccountResponse,
            AccountsResponse,
            AccountUpdateResponse,
            ApproveRequest,
            ChangeRoleRequest,
            // ===== Leads =====
            LeadSource,
            LeadStatus,
            LeadRecord,
            NewLead,
            UpdateLead,
            LeadStats,
            LeadListResponse,
            LeadResponse,
            LeadStatsResponse,
            LeadDeletedResponse,
            // ===== Chats =====
            Direction,
            ChatMessageRecord,
            ConversationSummary,
            SendMessage,
            ConversationsResponse,
            ThreadResponse,
            SentResponse,
            MarkReadResponse,
            // ===== Calls =====
            CallStatus,
            CallRecord,
            NewCall,
            CallStats,
            CallListResponse,
            CallResponse,
            CallStatsResponse,
            // ===== Health =====
            HealthResponse,
        )
    ),
    // ==================== 경로 등록 ====================
    paths(
        // ===== Health =====
        crate::routes::health::health_ready,

        // ===== Auth =====
        crate::routes::auth::signup,
        crate::routes::auth::login,
        crate::routes::auth::me,

        // ===== Admin =====
        crate::routes::admin::list_pending,
        crate::routes::admin::list_users,
        crate::routes::admin::approve,
        crate::routes::admin::reject,
        crate::routes::admin::toggle_status,
        crate::routes::admin::change_role,

        // ===== Leads =====
        crate::routes::leads::list_leads,
        crate::routes::leads::lead_stats,
        crate::routes::leads::get_lead,
        crate::routes::leads::create_lead,
        crate::routes::leads::update_lead,
        crate::routes::leads::delete_lead,

        // ===== Chats =====
        crate::routes::chats::list_conversations,
        crate::routes::chats::get_thread,
        crate::routes::chats::send_message,
        crate::routes::chats::mark_read,

        // ===== Calls =====
        crate::routes::calls::list_calls,
        crate::routes::calls::call_stats,
        crate::routes::calls::create_call,
    )
)]
pub struct ApiDoc;

// ==================== Swagger UI 라우터 ====================

/// Swagger UI 라우터 생성.
///
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}
