//! 마이그레이션 명령어.

use anyhow::{Context, Result};
use leadflow_api::repository::run_migrations;
use sqlx::PgPool;

/// 내장된 SQL 마이그레이션을 적용합니다.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    run_migrations(pool)
        .await
        .context("failed to apply migrations")
}
