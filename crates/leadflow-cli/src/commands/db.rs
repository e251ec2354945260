//! 데이터베이스 연결.

use std::time::Duration;

use anyhow::{Context, Result};
use leadflow_core::AppConfig;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// 데이터베이스 URL 결정.
///
/// `--db-url` 인자가 우선이고, 없으면 설정 파일/환경 변수
/// (`LEADFLOW__DATABASE__URL`)의 값을 사용합니다.
pub fn resolve_url(db_url: Option<String>, config: &AppConfig) -> String {
    db_url.unwrap_or_else(|| config.database.url.clone())
}

/// 커넥션 풀 생성.
pub async fn connect(db_url: Option<String>) -> Result<PgPool> {
    let config = AppConfig::load_default().context("failed to load configuration")?;
    let url = resolve_url(db_url, &config);

    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .connect(&url)
        .await
        .context("failed to connect to database")?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_url_overrides_config() {
        let config = AppConfig::default();

        assert_eq!(
            resolve_url(Some("postgres://cli/db".to_string()), &config),
            "postgres://cli/db"
        );
        assert_eq!(resolve_url(None, &config), config.database.url);
    }
}
