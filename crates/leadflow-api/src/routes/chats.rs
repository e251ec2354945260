//! 채팅 API 라우트
//!
//! # 엔드포인트
//!
//! - `GET /api/v1/chats` - 대화 목록 (전화번호별 요약)
//! - `GET /api/v1/chats/{phone}` - 메시지 스레드 (조회 시 읽음 처리)
//! - `POST /api/v1/chats` - 메시지 전송
//! - `PUT /api/v1/chats/read/{phone}` - 읽음 처리

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{ApiErrorResponse, ApiResult};
use crate::repository::{
    ChatMessageRecord, ChatRepository, ConversationSummary, NewChatMessage, SendMessage,
};
use crate::state::AppState;
use crate::types::{ApiJson, ApiPath, ApiQuery};

// ==================== Request/Response 타입 ====================

/// 대화 목록 조회 요청
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
pub struct ConversationQuery {
    /// 전화번호/연락처 이름 검색어
    pub search: Option<String>,
}

/// 대화 목록 응답
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConversationsResponse {
    pub chats: Vec<ConversationSummary>,
}

/// 메시지 스레드 응답
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ThreadResponse {
    pub phone_number: String,
    pub messages: Vec<ChatMessageRecord>,
}

/// 메시지 전송 응답
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SentResponse {
    pub chat: ChatMessageRecord,
}

/// 읽음 처리 응답
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MarkReadResponse {
    pub phone_number: String,
    /// 읽음 처리된 메시지 수
    pub updated: u64,
}

// ==================== 라우터 ====================

/// 채팅 API 라우터 생성
pub fn chats_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_conversations).post(send_message))
        .route("/{phone}", get(get_thread))
        .route("/read/{phone}", put(mark_read))
}

// ==================== 핸들러 ====================

/// 대화 목록
#[utoipa::path(
    get,
    path = "/api/v1/chats",
    params(ConversationQuery),
    responses((status = 200, description = "대화 목록 (최근 대화 먼저)", body = ConversationsResponse)),
    security(("bearer_auth" = [])),
    tag = "chats"
)]
pub async fn list_conversations(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ConversationQuery>,
) -> ApiResult<Json<ConversationsResponse>> {
    let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let chats = ChatRepository::conversations(state.pool()?, search).await?;

    Ok(Json(ConversationsResponse { chats }))
}

/// 메시지 스레드
///
/// 조회한 전화번호의 읽지 않은 메시지는 모두 읽음 처리됩니다.
#[utoipa::path(
    get,
    path = "/api/v1/chats/{phone}",
    params(("phone" = String, Path, description = "전화번호")),
    responses((status = 200, description = "메시지 (오래된 순)", body = ThreadResponse)),
    security(("bearer_auth" = [])),
    tag = "chats"
)]
pub async fn get_thread(
    State(state): State<Arc<AppState>>,
    ApiPath(phone): ApiPath<String>,
) -> ApiResult<Json<ThreadResponse>> {
    let pool = state.pool()?;

    let messages = ChatRepository::thread(pool, &phone).await?;
    let updated = ChatRepository::mark_read(pool, &phone).await?;
    debug!(phone = %phone, count = messages.len(), marked_read = updated, "Chat thread fetched");

    Ok(Json(ThreadResponse {
        phone_number: phone,
        messages,
    }))
}

/// 메시지 전송
#[utoipa::path(
    post,
    path = "/api/v1/chats",
    request_body = SendMessage,
    responses(
        (status = 201, description = "전송됨", body = SentResponse),
        (status = 400, description = "입력 오류", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "chats"
)]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    ApiJson(input): ApiJson<SendMessage>,
) -> ApiResult<impl IntoResponse> {
    input.validate()?;

    let chat = ChatRepository::insert(state.pool()?, &NewChatMessage::outgoing(&input)).await?;

    Ok((StatusCode::CREATED, Json(SentResponse { chat })))
}

/// 읽음 처리
#[utoipa::path(
    put,
    path = "/api/v1/chats/read/{phone}",
    params(("phone" = String, Path, description = "전화번호")),
    responses((status = 200, description = "읽음 처리됨", body = MarkReadResponse)),
    security(("bearer_auth" = [])),
    tag = "chats"
)]
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    ApiPath(phone): ApiPath<String>,
) -> ApiResult<Json<MarkReadResponse>> {
    let updated = ChatRepository::mark_read(state.pool()?, &phone).await?;

    Ok(Json(MarkReadResponse {
        phone_number: phone,
        updated,
    }))
}
