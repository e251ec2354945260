//! Chat Repository
//!
//! 전화번호 단위 대화 목록과 메시지 스레드를 다룹니다.

use chrono::{DateTime, Utc};
use leadflow_core::Direction;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::leads::like_pattern;

// ================================================================================================
// Types
// ================================================================================================

/// 채팅 메시지 레코드
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ChatMessageRecord {
    pub id: Uuid,
    pub phone_number: String,
    #[sqlx(default)]
    pub contact_name: Option<String>,
    pub message: String,
    /// incoming | outgoing
    pub direction: String,
    pub read: bool,
    #[sqlx(default)]
    pub lead_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// 대화 요약 (전화번호당 하나)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ConversationSummary {
    pub phone_number: String,
    #[sqlx(default)]
    pub contact_name: Option<String>,
    pub last_message: String,
    pub last_time: DateTime<Utc>,
    pub unread: i64,
}

/// 메시지 전송 입력
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SendMessage {
    #[validate(length(min = 1, message = "phone_number is required"))]
    pub phone_number: String,
    #[validate(length(min = 1, message = "message is required"))]
    pub message: String,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub lead_id: Option<Uuid>,
}

/// 메시지 삽입 입력 (방향/읽음 여부 지정)
#[derive(Debug, Clone)]
pub struct NewChatMessage {
    pub phone_number: String,
    pub contact_name: Option<String>,
    pub message: String,
    pub direction: Direction,
    pub read: bool,
    pub lead_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl NewChatMessage {
    /// 발신 메시지. 보낸 쪽이므로 읽음 상태로 저장됩니다.
    pub fn outgoing(input: &SendMessage) -> Self {
        Self {
            phone_number: input.phone_number.trim().to_string(),
            contact_name: input.contact_name.clone(),
            message: input.message.clone(),
            direction: Direction::Outgoing,
            read: true,
            lead_id: input.lead_id,
            created_at: Utc::now(),
        }
    }
}

// ================================================================================================
// Repository
// ================================================================================================

/// Chat Repository
pub struct ChatRepository;

impl ChatRepository {
    /// 대화 목록 (마지막 메시지 시각 내림차순)
    ///
    /// 검색어는 전화번호 또는 최신 연락처 이름에 부분 일치합니다.
    pub async fn conversations(
        pool: &PgPool,
        search: Option<&str>,
    ) -> Result<Vec<ConversationSummary>, sqlx::Error> {
        sqlx::query_as::<_, ConversationSummary>(
            r#"
            WITH latest AS (
                SELECT DISTINCT ON (phone_number)
                    phone_number, contact_name, message, created_at
                FROM chat_messages
                ORDER BY phone_number, created_at DESC
            ),
            unread AS (
                SELECT phone_number, COUNT(*) FILTER (WHERE NOT read) AS unread
                FROM chat_messages
                GROUP BY phone_number
            )
            SELECT
                l.phone_number, l.contact_name,
                l.message AS last_message, l.created_at AS last_time,
                u.unread
            FROM latest l
            JOIN unread u USING (phone_number)
            WHERE ($1::text IS NULL OR l.phone_number ILIKE $1 OR l.contact_name ILIKE $1)
            ORDER BY l.created_at DESC
            "#,
        )
        .bind(search.map(like_pattern))
        .fetch_all(pool)
        .await
    }

    /// 전화번호의 메시지 스레드 (오래된 순)
    pub async fn thread(
        pool: &PgPool,
        phone_number: &str,
    ) -> Result<Vec<ChatMessageRecord>, sqlx::Error> {
        sqlx::query_as::<_, ChatMessageRecord>(
            r#"
            SELECT * FROM chat_messages
            WHERE phone_number = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(phone_number)
        .fetch_all(pool)
        .await
    }

    /// 전화번호의 읽지 않은 메시지를 읽음 처리하고 변경 건수를 반환
    pub async fn mark_read(pool: &PgPool, phone_number: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE chat_messages SET read = TRUE WHERE phone_number = $1 AND NOT read",
        )
        .bind(phone_number)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// 메시지 삽입
    pub async fn insert(
        pool: &PgPool,
        input: &NewChatMessage,
    ) -> Result<ChatMessageRecord, sqlx::Error> {
        sqlx::query_as::<_, ChatMessageRecord>(
            r#"
            INSERT INTO chat_messages
                (phone_number, contact_name, message, direction, read, lead_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&input.phone_number)
        .bind(&input.contact_name)
        .bind(&input.message)
        .bind(input.direction.as_str())
        .bind(input.read)
        .bind(input.lead_id)
        .bind(input.created_at)
        .fetch_one(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outgoing_is_read() {
        let input = SendMessage {
            phone_number: " 917060175427 ".to_string(),
            message: "Hello Rahul".to_string(),
            contact_name: Some("Rahul Sharma".to_string()),
            lead_id: None,
        };

        let message = NewChatMessage::outgoing(&input);
        assert_eq!(message.direction, Direction::Outgoing);
        assert!(message.read);
        assert_eq!(message.phone_number, "917060175427");
    }

    #[test]
    fn test_send_message_requires_text() {
        let input = SendMessage {
            phone_number: "917060175427".to_string(),
            message: String::new(),
            contact_name: None,
            lead_id: None,
        };

        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("message"));
    }
}
