//! 데이터 전체 삭제 명령어.

use anyhow::{bail, Result};
use leadflow_api::repository::{clear_all, CallRepository, LeadRepository, PgAccountStore};
use sqlx::PgPool;
use tracing::{info, warn};

/// 모든 계정, 리드, 채팅, 통화 데이터를 삭제합니다.
///
/// `force` 없이는 현재 건수만 출력하고 거부합니다.
pub async fn clear(pool: &PgPool, force: bool) -> Result<()> {
    let accounts = PgAccountStore::count(pool).await?;
    let leads = LeadRepository::count(pool).await?;
    let calls = CallRepository::stats(pool).await?.total_calls;
    info!(accounts, leads, calls, "Current database stats");

    if !force {
        warn!("Refusing to delete data without --force");
        bail!("clear requires --force");
    }

    clear_all(pool).await?;
    info!("All data cleared");
    Ok(())
}
