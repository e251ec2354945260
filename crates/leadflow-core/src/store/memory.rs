//! 인메모리 계정 저장소.
//!
//! 데이터베이스 없이 접근 파이프라인과 라우터를 구동할 때 사용합니다.
//! 장애 주입(`set_unavailable`)과 조회 횟수 카운터로 테스트에서
//! "저장소 접근 전에 거부되었는지"를 확인할 수 있습니다.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AccessUpdate, AccountCredentials, AccountStore};
use crate::domain::{Account, AccountFilter, AccountStatus, NewAccount, Role};
use crate::error::StoreError;

#[derive(Debug, Clone)]
struct StoredAccount {
    account: Account,
    password_hash: String,
}

/// 인메모리 계정 저장소.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<HashMap<Uuid, StoredAccount>>,
    unavailable: AtomicBool,
    lookups: AtomicUsize,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 저장소 장애 상태를 설정합니다. `true`이면 모든 호출이 `Unavailable`로 실패합니다.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// 지금까지 수행된 조회/쓰기 호출 수.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// 역할과 상태를 지정하여 계정을 직접 삽입합니다 (시드/테스트용).
    pub async fn insert_with(
        &self,
        new_account: NewAccount,
        role: Role,
        status: AccountStatus,
    ) -> Result<Account, StoreError> {
        let account = self.create(new_account).await?;
        self.update_access(
            account.id,
            AccessUpdate {
                role: Some(role),
                status: Some(status),
            },
        )
        .await?
        .ok_or_else(|| StoreError::Corrupt(format!("account {} vanished", account.id)))
    }

    fn begin(&self) -> Result<(), StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "in-memory store marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        self.begin()?;
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&id).map(|stored| stored.account.clone()))
    }

    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<AccountCredentials>, StoreError> {
        self.begin()?;
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|stored| stored.account.email == email)
            .map(|stored| AccountCredentials {
                account: stored.account.clone(),
                password_hash: stored.password_hash.clone(),
            }))
    }

    async fn create(&self, new_account: NewAccount) -> Result<Account, StoreError> {
        self.begin()?;
        let mut accounts = self.accounts.write().await;

        if accounts
            .values()
            .any(|stored| stored.account.email == new_account.email)
        {
            return Err(StoreError::Duplicate(format!(
                "email already registered: {}",
                new_account.email
            )));
        }

        // 생성 순서가 정렬에 반영되도록 기존 최신 시각보다 뒤로 맞춤
        let latest = accounts.values().map(|s| s.account.created_at).max();
        let now = match latest {
            Some(latest) if latest >= Utc::now() => latest + Duration::microseconds(1),
            _ => Utc::now(),
        };

        let account = Account {
            id: Uuid::new_v4(),
            name: new_account.name,
            email: new_account.email,
            role: NewAccount::initial_role(),
            status: NewAccount::initial_status(),
            last_login: None,
            created_at: now,
            updated_at: now,
        };

        accounts.insert(
            account.id,
            StoredAccount {
                account: account.clone(),
                password_hash: new_account.password_hash,
            },
        );

        Ok(account)
    }

    async fn update_access(
        &self,
        id: Uuid,
        update: AccessUpdate,
    ) -> Result<Option<Account>, StoreError> {
        self.begin()?;
        let mut accounts = self.accounts.write().await;

        Ok(accounts.get_mut(&id).map(|stored| {
            update.apply(&mut stored.account);
            stored.account.updated_at = Utc::now();
            stored.account.clone()
        }))
    }

    async fn record_login(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        self.begin()?;
        let mut accounts = self.accounts.write().await;

        Ok(accounts.get_mut(&id).map(|stored| {
            let now = Utc::now();
            stored.account.last_login = Some(now);
            stored.account.updated_at = now;
            stored.account.clone()
        }))
    }

    async fn find_all(&self, filter: AccountFilter) -> Result<Vec<Account>, StoreError> {
        self.begin()?;
        let accounts = self.accounts.read().await;

        let mut result: Vec<Account> = accounts
            .values()
            .map(|stored| stored.account.clone())
            .filter(|account| filter.matches(account))
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_starts_pending() {
        let store = InMemoryAccountStore::new();
        let account = store
            .create(NewAccount::new("Jane", "Jane@Example.com", "hash"))
            .await
            .unwrap();

        assert_eq!(account.role, Role::PendingUser);
        assert_eq!(account.status, AccountStatus::Pending);
        assert_eq!(account.email, "jane@example.com");
        assert!(account.last_login.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = InMemoryAccountStore::new();
        store
            .create(NewAccount::new("Jane", "jane@example.com", "hash"))
            .await
            .unwrap();

        let result = store
            .create(NewAccount::new("Other", " JANE@example.com ", "hash"))
            .await;
        assert!(matches!(result, Err(StoreError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_find_all_newest_first_with_filter() {
        let store = InMemoryAccountStore::new();
        let first = store
            .create(NewAccount::new("A", "a@example.com", "h"))
            .await
            .unwrap();
        let second = store
            .insert_with(
                NewAccount::new("B", "b@example.com", "h"),
                Role::AuthorizedUser,
                AccountStatus::Active,
            )
            .await
            .unwrap();
        let third = store
            .create(NewAccount::new("C", "c@example.com", "h"))
            .await
            .unwrap();

        let all = store.find_all(AccountFilter::all()).await.unwrap();
        let ids: Vec<Uuid> = all.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);

        let pending = store
            .find_all(AccountFilter::with_status(AccountStatus::Pending))
            .await
            .unwrap();
        let ids: Vec<Uuid> = pending.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![third.id, first.id]);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails() {
        let store = InMemoryAccountStore::new();
        store.set_unavailable(true);

        let result = store.find_by_id(Uuid::new_v4()).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert_eq!(store.lookup_count(), 1);
    }

    #[tokio::test]
    async fn test_credentials_lookup() {
        let store = InMemoryAccountStore::new();
        store
            .create(NewAccount::new("Jane", "jane@example.com", "secret-hash"))
            .await
            .unwrap();

        let creds = store
            .find_credentials("jane@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(creds.password_hash, "secret-hash");
        assert!(store.find_credentials("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_access_touches_only_given_fields() {
        let store = InMemoryAccountStore::new();
        let account = store
            .insert_with(
                NewAccount::new("Jane", "jane@example.com", "h"),
                Role::SuperAdmin,
                AccountStatus::Active,
            )
            .await
            .unwrap();

        let updated = store
            .update_access(account.id, AccessUpdate::status(AccountStatus::Disabled))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.role, Role::SuperAdmin);
        assert_eq!(updated.status, AccountStatus::Disabled);

        let updated = store
            .update_access(account.id, AccessUpdate::role(Role::AuthorizedUser))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.role, Role::AuthorizedUser);
        assert_eq!(updated.status, AccountStatus::Disabled);
    }

    #[tokio::test]
    async fn test_record_login_keeps_access_fields() {
        let store = InMemoryAccountStore::new();
        let account = store
            .insert_with(
                NewAccount::new("Jane", "jane@example.com", "h"),
                Role::AuthorizedUser,
                AccountStatus::Disabled,
            )
            .await
            .unwrap();

        let logged_in = store.record_login(account.id).await.unwrap().unwrap();
        assert!(logged_in.last_login.is_some());
        assert_eq!(logged_in.role, Role::AuthorizedUser);
        assert_eq!(logged_in.status, AccountStatus::Disabled);
    }

    #[tokio::test]
    async fn test_writes_to_missing_account_return_none() {
        let store = InMemoryAccountStore::new();
        let missing = Uuid::new_v4();

        assert!(store.record_login(missing).await.unwrap().is_none());
        assert!(store
            .update_access(missing, AccessUpdate::status(AccountStatus::Active))
            .await
            .unwrap()
            .is_none());
    }
}
