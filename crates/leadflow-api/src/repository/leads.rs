//! Lead Repository
//!
//! 리드 조회/필터/집계 연산을 담당합니다.

use chrono::{DateTime, Utc};
use leadflow_core::{LeadSource, LeadStatus};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::types::{PageRequest, TimeRange};

// ================================================================================================
// Types
// ================================================================================================

/// 리드 레코드
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeadRecord {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    #[sqlx(default)]
    pub email: Option<String>,
    /// whatsapp | call
    pub source: String,
    /// hot | warm | cold
    pub status: String,
    #[sqlx(default)]
    pub notes: Option<String>,
    #[sqlx(default)]
    pub assigned_to: Option<Uuid>,
    #[sqlx(default)]
    pub last_contact: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 새 리드 입력
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewLead {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
    #[serde(default)]
    #[validate(email(message = "invalid email"))]
    pub email: Option<String>,
    pub source: LeadSource,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<Uuid>,
    #[serde(default)]
    pub last_contact: Option<DateTime<Utc>>,
}

/// 리드 부분 수정 입력. 없는 필드는 유지됩니다.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateLead {
    #[serde(default)]
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "phone must not be empty"))]
    pub phone: Option<String>,
    #[serde(default)]
    #[validate(email(message = "invalid email"))]
    pub email: Option<String>,
    #[serde(default)]
    pub source: Option<LeadSource>,
    #[serde(default)]
    pub status: Option<LeadStatus>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<Uuid>,
    #[serde(default)]
    pub last_contact: Option<DateTime<Utc>>,
}

/// 리드 목록 필터
#[derive(Debug, Clone, Default)]
pub struct LeadFilter {
    /// 이름/이메일/전화번호 부분 일치 (대소문자 무시)
    pub search: Option<String>,
    pub status: Option<LeadStatus>,
    pub created: TimeRange,
}

/// 리드 통계
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeadStats {
    pub total: i64,
    pub hot: i64,
    pub warm: i64,
    pub cold: i64,
    pub whatsapp: i64,
    pub call: i64,
}

/// ILIKE 패턴으로 변환합니다. 와일드카드 문자는 리터럴로 취급합니다.
pub fn like_pattern(search: &str) -> String {
    let escaped = search
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

// ================================================================================================
// Repository
// ================================================================================================

/// Lead Repository
pub struct LeadRepository;

impl LeadRepository {
    /// 필터 조건의 리드 목록 (최신순)과 전체 개수
    pub async fn list(
        pool: &PgPool,
        filter: &LeadFilter,
        page: PageRequest,
    ) -> Result<(Vec<LeadRecord>, i64), sqlx::Error> {
        let pattern = filter.search.as_deref().map(like_pattern);
        let status = filter.status.map(|s| s.as_str());

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM leads
            WHERE ($1::text IS NULL OR name ILIKE $1 OR email ILIKE $1 OR phone ILIKE $1)
              AND ($2::text IS NULL OR status = $2)
              AND ($3::timestamptz IS NULL OR created_at >= $3)
              AND ($4::timestamptz IS NULL OR created_at < $4)
            "#,
        )
        .bind(&pattern)
        .bind(status)
        .bind(filter.created.from)
        .bind(filter.created.until)
        .fetch_one(pool)
        .await?;

        let leads = sqlx::query_as::<_, LeadRecord>(
            r#"
            SELECT * FROM leads
            WHERE ($1::text IS NULL OR name ILIKE $1 OR email ILIKE $1 OR phone ILIKE $1)
              AND ($2::text IS NULL OR status = $2)
              AND ($3::timestamptz IS NULL OR created_at >= $3)
              AND ($4::timestamptz IS NULL OR created_at < $4)
            ORDER BY created_at DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(&pattern)
        .bind(status)
        .bind(filter.created.from)
        .bind(filter.created.until)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

        Ok((leads, total))
    }

    /// 리드 단건 조회
    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<LeadRecord>, sqlx::Error> {
        sqlx::query_as::<_, LeadRecord>("SELECT * FROM leads WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// 리드 생성
    pub async fn create(pool: &PgPool, input: &NewLead) -> Result<LeadRecord, sqlx::Error> {
        Self::insert_at(pool, input, Utc::now()).await
    }

    /// 생성 시각을 지정하여 리드 삽입 (시드용)
    pub async fn insert_at(
        pool: &PgPool,
        input: &NewLead,
        created_at: DateTime<Utc>,
    ) -> Result<LeadRecord, sqlx::Error> {
        sqlx::query_as::<_, LeadRecord>(
            r#"
            INSERT INTO leads
                (name, phone, email, source, status, notes, assigned_to, last_contact,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING *
            "#,
        )
        .bind(input.name.trim())
        .bind(input.phone.trim())
        .bind(&input.email)
        .bind(input.source.as_str())
        .bind(input.status.as_str())
        .bind(&input.notes)
        .bind(input.assigned_to)
        .bind(input.last_contact)
        .bind(created_at)
        .fetch_one(pool)
        .await
    }

    /// 리드 부분 수정. 대상이 없으면 `None`.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        input: &UpdateLead,
    ) -> Result<Option<LeadRecord>, sqlx::Error> {
        sqlx::query_as::<_, LeadRecord>(
            r#"
            UPDATE leads SET
                name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                email = COALESCE($4, email),
                source = COALESCE($5, source),
                status = COALESCE($6, status),
                notes = COALESCE($7, notes),
                assigned_to = COALESCE($8, assigned_to),
                last_contact = COALESCE($9, last_contact),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.name.as_deref().map(str::trim))
        .bind(input.phone.as_deref().map(str::trim))
        .bind(&input.email)
        .bind(input.source.map(|s| s.as_str()))
        .bind(input.status.map(|s| s.as_str()))
        .bind(&input.notes)
        .bind(input.assigned_to)
        .bind(input.last_contact)
        .fetch_optional(pool)
        .await
    }

    /// 리드 삭제. 삭제되었으면 `true`.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM leads WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 상태별/유입 경로별 집계
    pub async fn stats(pool: &PgPool) -> Result<LeadStats, sqlx::Error> {
        sqlx::query_as::<_, LeadStats>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'hot') AS hot,
                COUNT(*) FILTER (WHERE status = 'warm') AS warm,
                COUNT(*) FILTER (WHERE status = 'cold') AS cold,
                COUNT(*) FILTER (WHERE source = 'whatsapp') AS whatsapp,
                COUNT(*) FILTER (WHERE source = 'call') AS call
            FROM leads
            "#,
        )
        .fetch_one(pool)
        .await
    }

    /// 전체 리드 수
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM leads")
            .fetch_one(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("rahul"), "%rahul%");
        assert_eq!(like_pattern(" 100% "), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
    }

    #[test]
    fn test_new_lead_validation() {
        let lead: NewLead = serde_json::from_value(serde_json::json!({
            "name": "",
            "phone": "917060175427",
            "email": "not-an-email",
            "source": "whatsapp"
        }))
        .unwrap();

        let errors = lead.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(!fields.contains_key("phone"));
        assert_eq!(lead.status, LeadStatus::Warm);
    }

    #[test]
    fn test_new_lead_rejects_unknown_source() {
        let result = serde_json::from_value::<NewLead>(serde_json::json!({
            "name": "Rahul Sharma",
            "phone": "917060175427",
            "source": "email"
        }));
        assert!(result.is_err());
    }
}
