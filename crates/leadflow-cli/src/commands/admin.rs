//! 관리자 계정 생성 명령어.

use anyhow::{bail, Result};
use leadflow_api::auth::MIN_PASSWORD_LEN;
use leadflow_api::hash_password;
use leadflow_api::repository::PgAccountStore;
use leadflow_core::{Account, NewAccount};
use sqlx::PgPool;
use tracing::info;

/// super_admin/active 계정을 만들거나, 같은 이메일의 계정을 승격합니다.
pub async fn create_admin(pool: &PgPool, name: &str, email: &str, password: &str) -> Result<Account> {
    if name.trim().is_empty() {
        bail!("name must not be empty");
    }
    if (password.chars().count() as u64) < MIN_PASSWORD_LEN {
        bail!("password must be at least {} characters", MIN_PASSWORD_LEN);
    }

    let hash = hash_password(password)?;
    let account = PgAccountStore::upsert_admin(pool, &NewAccount::new(name.trim(), email, hash)).await?;

    info!(account_id = %account.id, email = %account.email, "Admin account ready");
    Ok(account)
}
