//! Repository pattern for database operations.
//!
//! 데이터베이스 접근 로직을 라우트 핸들러에서 분리하여 관리합니다.
//! 계정 저장소([`PgAccountStore`])만 인스턴스이며, 나머지 Repository는
//! static methods 패턴을 사용합니다.

pub mod accounts;
pub mod calls;
pub mod chats;
pub mod leads;

pub use accounts::{AccountRecord, PgAccountStore};
pub use calls::{CallRecord, CallRepository, CallStats, NewCall};
pub use chats::{
    ChatMessageRecord, ChatRepository, ConversationSummary, NewChatMessage, SendMessage,
};
pub use leads::{LeadFilter, LeadRecord, LeadRepository, LeadStats, NewLead, UpdateLead};

use sqlx::PgPool;
use tracing::info;

/// 내장 마이그레이션을 실행합니다.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations...");
    sqlx::migrate!("../../migrations").run(pool).await?;
    info!("Migrations completed successfully");
    Ok(())
}

/// 모든 테이블의 데이터를 삭제합니다. 스키마는 유지됩니다.
pub async fn clear_all(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("TRUNCATE TABLE calls, chat_messages, leads, accounts")
        .execute(pool)
        .await?;
    Ok(())
}
