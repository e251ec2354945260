//! Account Repository
//!
//! PostgreSQL 기반 [`AccountStore`] 구현입니다. 이메일은 항상 정규화된
//! 소문자로 저장되며 `accounts.email`의 고유 제약이 중복을 막습니다.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use leadflow_core::{
    AccessUpdate, Account, AccountCredentials, AccountFilter, AccountStatus, AccountStore,
    NewAccount, Role, StoreError,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

// ================================================================================================
// Types
// ================================================================================================

/// 계정 레코드.
#[derive(Debug, Clone, FromRow)]
pub struct AccountRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub status: String,
    #[sqlx(default)]
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountRecord {
    /// 도메인 계정으로 변환. 알 수 없는 역할/상태 문자열은 손상된 레코드입니다.
    pub fn into_account(self) -> Result<Account, StoreError> {
        let role = Role::parse(&self.role).ok_or_else(|| {
            StoreError::Corrupt(format!("account {} has unknown role '{}'", self.id, self.role))
        })?;
        let status = AccountStatus::parse(&self.status).ok_or_else(|| {
            StoreError::Corrupt(format!(
                "account {} has unknown status '{}'",
                self.id, self.status
            ))
        })?;

        Ok(Account {
            id: self.id,
            name: self.name,
            email: self.email,
            role,
            status,
            last_login: self.last_login,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }

    fn into_credentials(self) -> Result<AccountCredentials, StoreError> {
        let password_hash = self.password_hash.clone();
        Ok(AccountCredentials {
            account: self.into_account()?,
            password_hash,
        })
    }
}

fn store_error(err: sqlx::Error) -> StoreError {
    match err.as_database_error() {
        Some(db) if db.is_unique_violation() => StoreError::Duplicate("email".to_string()),
        _ => StoreError::Unavailable(err.to_string()),
    }
}

// ================================================================================================
// Repository
// ================================================================================================

/// PostgreSQL 계정 저장소.
#[derive(Debug, Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 역할과 상태를 지정하여 계정을 삽입합니다 (시드용).
    pub async fn insert_with(
        pool: &PgPool,
        new_account: &NewAccount,
        role: Role,
        status: AccountStatus,
    ) -> Result<Account, StoreError> {
        let record = sqlx::query_as::<_, AccountRecord>(
            r#"
            INSERT INTO accounts (name, email, password_hash, role, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&new_account.name)
        .bind(&new_account.email)
        .bind(&new_account.password_hash)
        .bind(role.as_str())
        .bind(status.as_str())
        .fetch_one(pool)
        .await
        .map_err(store_error)?;

        record.into_account()
    }

    /// 관리자 계정 생성 또는 기존 계정을 super_admin/active로 승격합니다.
    ///
    /// 기존 계정의 비밀번호는 새 해시로 교체됩니다.
    pub async fn upsert_admin(
        pool: &PgPool,
        new_account: &NewAccount,
    ) -> Result<Account, StoreError> {
        let record = sqlx::query_as::<_, AccountRecord>(
            r#"
            INSERT INTO accounts (name, email, password_hash, role, status)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (email) DO UPDATE SET
                name = EXCLUDED.name,
                password_hash = EXCLUDED.password_hash,
                role = EXCLUDED.role,
                status = EXCLUDED.status,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(&new_account.name)
        .bind(&new_account.email)
        .bind(&new_account.password_hash)
        .bind(Role::SuperAdmin.as_str())
        .bind(AccountStatus::Active.as_str())
        .fetch_one(pool)
        .await
        .map_err(store_error)?;

        record.into_account()
    }

    /// 마지막 로그인 시각을 지정 값으로 기록합니다 (시드용).
    pub async fn set_last_login(
        pool: &PgPool,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<Account>, StoreError> {
        let record = sqlx::query_as::<_, AccountRecord>(
            "UPDATE accounts SET last_login = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(at)
        .fetch_optional(pool)
        .await
        .map_err(store_error)?;

        record.map(AccountRecord::into_account).transpose()
    }

    /// 전체 계정 수.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(pool)
            .await
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let record = sqlx::query_as::<_, AccountRecord>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;

        record.map(AccountRecord::into_account).transpose()
    }

    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<AccountCredentials>, StoreError> {
        let record =
            sqlx::query_as::<_, AccountRecord>("SELECT * FROM accounts WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(store_error)?;

        record.map(AccountRecord::into_credentials).transpose()
    }

    async fn create(&self, new_account: NewAccount) -> Result<Account, StoreError> {
        Self::insert_with(
            &self.pool,
            &new_account,
            NewAccount::initial_role(),
            NewAccount::initial_status(),
        )
        .await
    }

    async fn update_access(
        &self,
        id: Uuid,
        update: AccessUpdate,
    ) -> Result<Option<Account>, StoreError> {
        let record = sqlx::query_as::<_, AccountRecord>(
            r#"
            UPDATE accounts
            SET role = COALESCE($2, role),
                status = COALESCE($3, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.role.map(|r| r.as_str()))
        .bind(update.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        record.map(AccountRecord::into_account).transpose()
    }

    async fn record_login(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let record = sqlx::query_as::<_, AccountRecord>(
            "UPDATE accounts SET last_login = NOW(), updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        record.map(AccountRecord::into_account).transpose()
    }

    async fn find_all(&self, filter: AccountFilter) -> Result<Vec<Account>, StoreError> {
        let records = sqlx::query_as::<_, AccountRecord>(
            r#"
            SELECT * FROM accounts
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        records.into_iter().map(AccountRecord::into_account).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(role: &str, status: &str) -> AccountRecord {
        let now = Utc::now();
        AccountRecord {
            id: Uuid::new_v4(),
            name: "Rahul".to_string(),
            email: "rahul@leadflow.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            role: role.to_string(),
            status: status.to_string(),
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_record_conversion() {
        let account = record("authorized_user", "active").into_account().unwrap();
        assert_eq!(account.role, Role::AuthorizedUser);
        assert_eq!(account.status, AccountStatus::Active);

        let credentials = record("super_admin", "pending").into_credentials().unwrap();
        assert_eq!(credentials.password_hash, "$argon2id$stub");
    }

    #[test]
    fn test_unknown_role_is_corrupt() {
        let err = record("admin", "active").into_account().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));

        let err = record("super_admin", "banned").into_account().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }
}
