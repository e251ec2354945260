//! Call Repository
//!
//! 통화 기록 조회와 통계를 담당합니다.

use chrono::{DateTime, Utc};
use leadflow_core::{CallStatus, Direction};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::types::PageRequest;

// ================================================================================================
// Types
// ================================================================================================

/// 통화 레코드
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CallRecord {
    pub id: Uuid,
    pub phone_number: String,
    #[sqlx(default)]
    pub contact_name: Option<String>,
    /// incoming | outgoing
    pub direction: String,
    /// 통화 시간 (초)
    pub duration: i32,
    pub cost: Decimal,
    /// completed | missed | failed
    pub status: String,
    #[sqlx(default)]
    pub notes: Option<String>,
    #[sqlx(default)]
    pub lead_id: Option<Uuid>,
    #[sqlx(default)]
    pub assigned_to: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// 새 통화 기록 입력
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewCall {
    #[validate(length(min = 1, message = "phone_number is required"))]
    pub phone_number: String,
    #[serde(default)]
    pub contact_name: Option<String>,
    pub direction: Direction,
    #[serde(default)]
    #[validate(range(min = 0, message = "duration must not be negative"))]
    pub duration: i32,
    #[serde(default)]
    #[validate(custom(function = "non_negative_cost"))]
    pub cost: Decimal,
    #[serde(default)]
    pub status: CallStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub lead_id: Option<Uuid>,
    #[serde(default)]
    pub assigned_to: Option<Uuid>,
}

fn non_negative_cost(cost: &Decimal) -> Result<(), ValidationError> {
    if cost.is_sign_negative() && !cost.is_zero() {
        let mut error = ValidationError::new("range");
        error.message = Some("cost must not be negative".into());
        return Err(error);
    }
    Ok(())
}

/// 통화 통계
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CallStats {
    pub total_calls: i64,
    /// 전체 통화 시간 (초)
    pub total_duration: i64,
    pub total_cost: Decimal,
    /// 평균 통화 시간 (초, 반올림)
    pub avg_duration: i64,
    pub completed_calls: i64,
    pub missed_calls: i64,
    pub failed_calls: i64,
}

// ================================================================================================
// Repository
// ================================================================================================

/// Call Repository
pub struct CallRepository;

impl CallRepository {
    /// 통화 목록 (최신순)과 전체 개수
    pub async fn list(
        pool: &PgPool,
        status: Option<CallStatus>,
        page: PageRequest,
    ) -> Result<(Vec<CallRecord>, i64), sqlx::Error> {
        let status = status.map(|s| s.as_str());

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM calls WHERE ($1::text IS NULL OR status = $1)")
                .bind(status)
                .fetch_one(pool)
                .await?;

        let calls = sqlx::query_as::<_, CallRecord>(
            r#"
            SELECT * FROM calls
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(status)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

        Ok((calls, total))
    }

    /// 통화 기록 생성
    pub async fn create(pool: &PgPool, input: &NewCall) -> Result<CallRecord, sqlx::Error> {
        Self::insert_at(pool, input, Utc::now()).await
    }

    /// 생성 시각을 지정하여 통화 기록 삽입 (시드용)
    pub async fn insert_at(
        pool: &PgPool,
        input: &NewCall,
        created_at: DateTime<Utc>,
    ) -> Result<CallRecord, sqlx::Error> {
        sqlx::query_as::<_, CallRecord>(
            r#"
            INSERT INTO calls
                (phone_number, contact_name, direction, duration, cost, status, notes,
                 lead_id, assigned_to, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(input.phone_number.trim())
        .bind(&input.contact_name)
        .bind(input.direction.as_str())
        .bind(input.duration)
        .bind(input.cost)
        .bind(input.status.as_str())
        .bind(&input.notes)
        .bind(input.lead_id)
        .bind(input.assigned_to)
        .bind(created_at)
        .fetch_one(pool)
        .await
    }

    /// 통화 통계. 기록이 없으면 모두 0입니다.
    pub async fn stats(pool: &PgPool) -> Result<CallStats, sqlx::Error> {
        sqlx::query_as::<_, CallStats>(
            r#"
            SELECT
                COUNT(*) AS total_calls,
                COALESCE(SUM(duration), 0)::bigint AS total_duration,
                COALESCE(SUM(cost), 0) AS total_cost,
                COALESCE(ROUND(AVG(duration)), 0)::bigint AS avg_duration,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed_calls,
                COUNT(*) FILTER (WHERE status = 'missed') AS missed_calls,
                COUNT(*) FILTER (WHERE status = 'failed') AS failed_calls
            FROM calls
            "#,
        )
        .fetch_one(pool)
        .await
    }
}
