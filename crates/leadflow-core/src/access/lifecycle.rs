//! 계정 생명주기 상태 머신.
//!
//! 상태(pending/active/disabled) × 역할(pending_user/authorized_user/super_admin)
//! 위의 관리자 작업을 정의합니다. 호출자는 이미 super_admin 역할 가드를
//! 통과했다고 가정합니다.
//!
//! 각 작업은 조회 후 자신이 바꾸는 필드만 저장하며, 실패 시 아무것도
//! 기록되지 않습니다. 다른 엔티티(리드/채팅/통화)로 전파되지 않습니다.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{Account, AccountFilter, AccountStatus, Role};
use crate::error::{ForbiddenReason, LeadflowError, LeadflowResult};
use crate::store::{AccessUpdate, AccountStore};

/// 생명주기 작업 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleOperation {
    Approve,
    Reject,
    ToggleStatus,
    ChangeRole,
}

impl LifecycleOperation {
    /// 메트릭 라벨 및 로그용 식별자.
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleOperation::Approve => "approve",
            LifecycleOperation::Reject => "reject",
            LifecycleOperation::ToggleStatus => "toggle_status",
            LifecycleOperation::ChangeRole => "change_role",
        }
    }
}

/// 계정 생명주기 서비스.
#[derive(Clone)]
pub struct AccountLifecycle {
    store: Arc<dyn AccountStore>,
}

impl AccountLifecycle {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// 승인: status=active, role=지정값 또는 authorized_user.
    ///
    /// 이전 상태와 무관하게 허용되며 재승인도 가능합니다.
    pub async fn approve(&self, account_id: Uuid, role: Option<Role>) -> LeadflowResult<Account> {
        let account = self.load(account_id).await?;
        let update = AccessUpdate {
            role: Some(role.unwrap_or(Role::AuthorizedUser)),
            status: Some(AccountStatus::Active),
        };

        self.commit(LifecycleOperation::Approve, &account, update).await
    }

    /// 거절: status=disabled. 역할은 그대로 둡니다 (소프트 비활성화).
    pub async fn reject(&self, account_id: Uuid) -> LeadflowResult<Account> {
        let account = self.load(account_id).await?;
        let update = AccessUpdate::status(AccountStatus::Disabled);

        self.commit(LifecycleOperation::Reject, &account, update).await
    }

    /// 상태 토글: active → disabled, 그 외 → active.
    ///
    /// 대상이 보호 역할이면 호출자가 누구든 거부합니다.
    pub async fn toggle_status(&self, account_id: Uuid) -> LeadflowResult<Account> {
        let account = self.load(account_id).await?;

        if account.role.is_protected() {
            warn!(
                account_id = %account.id,
                role = %account.role,
                "Refused to toggle status of protected account"
            );
            return Err(LeadflowError::Forbidden(ForbiddenReason::ProtectedAccount));
        }

        let update = AccessUpdate::status(account.status.toggled());

        self.commit(LifecycleOperation::ToggleStatus, &account, update).await
    }

    /// 역할 변경. 상태는 그대로 둡니다.
    pub async fn change_role(&self, account_id: Uuid, role: Role) -> LeadflowResult<Account> {
        let account = self.load(account_id).await?;

        self.commit(LifecycleOperation::ChangeRole, &account, AccessUpdate::role(role))
            .await
    }

    /// 로그인 성공 기록 (마지막 인증 시각 갱신).
    ///
    /// 역할/상태는 저장소의 현재 값을 그대로 돌려줍니다.
    pub async fn record_login(&self, account_id: Uuid) -> LeadflowResult<Account> {
        self.store
            .record_login(account_id)
            .await?
            .ok_or_else(|| LeadflowError::NotFound(format!("account {}", account_id)))
    }

    /// 승인 대기 계정 목록 (최신순).
    pub async fn pending_accounts(&self) -> LeadflowResult<Vec<Account>> {
        Ok(self
            .store
            .find_all(AccountFilter::with_status(AccountStatus::Pending))
            .await?)
    }

    /// 전체 계정 목록 (최신순).
    pub async fn all_accounts(&self) -> LeadflowResult<Vec<Account>> {
        Ok(self.store.find_all(AccountFilter::all()).await?)
    }

    async fn load(&self, account_id: Uuid) -> LeadflowResult<Account> {
        self.store
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| LeadflowError::NotFound(format!("account {}", account_id)))
    }

    async fn commit(
        &self,
        operation: LifecycleOperation,
        before: &Account,
        update: AccessUpdate,
    ) -> LeadflowResult<Account> {
        let saved = self
            .store
            .update_access(before.id, update)
            .await?
            .ok_or_else(|| LeadflowError::NotFound(format!("account {}", before.id)))?;

        info!(
            operation = operation.as_str(),
            account_id = %saved.id,
            from_status = %before.status,
            to_status = %saved.status,
            from_role = %before.role,
            to_role = %saved.role,
            "Account lifecycle transition"
        );

        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewAccount;
    use crate::store::InMemoryAccountStore;

    async fn setup(role: Role, status: AccountStatus) -> (AccountLifecycle, Arc<InMemoryAccountStore>, Uuid) {
        let store = Arc::new(InMemoryAccountStore::new());
        let account = store
            .insert_with(NewAccount::new("Target", "target@example.com", "h"), role, status)
            .await
            .unwrap();
        (AccountLifecycle::new(store.clone()), store, account.id)
    }

    #[tokio::test]
    async fn test_approve_defaults_to_authorized_user() {
        let (lifecycle, _, id) = setup(Role::PendingUser, AccountStatus::Pending).await;

        let account = lifecycle.approve(id, None).await.unwrap();
        assert_eq!(account.status, AccountStatus::Active);
        assert_eq!(account.role, Role::AuthorizedUser);
    }

    #[tokio::test]
    async fn test_approve_with_explicit_role() {
        let (lifecycle, _, id) = setup(Role::PendingUser, AccountStatus::Disabled).await;

        let account = lifecycle.approve(id, Some(Role::SuperAdmin)).await.unwrap();
        assert_eq!(account.status, AccountStatus::Active);
        assert_eq!(account.role, Role::SuperAdmin);

        // 재승인 허용
        let again = lifecycle.approve(id, Some(Role::SuperAdmin)).await.unwrap();
        assert_eq!(again.status, AccountStatus::Active);
        assert_eq!(again.role, Role::SuperAdmin);
    }

    #[tokio::test]
    async fn test_reject_keeps_role() {
        let (lifecycle, _, id) = setup(Role::AuthorizedUser, AccountStatus::Active).await;

        let account = lifecycle.reject(id).await.unwrap();
        assert_eq!(account.status, AccountStatus::Disabled);
        assert_eq!(account.role, Role::AuthorizedUser);
    }

    #[tokio::test]
    async fn test_toggle_flips_status() {
        let (lifecycle, _, id) = setup(Role::AuthorizedUser, AccountStatus::Active).await;

        let account = lifecycle.toggle_status(id).await.unwrap();
        assert_eq!(account.status, AccountStatus::Disabled);

        let account = lifecycle.toggle_status(id).await.unwrap();
        assert_eq!(account.status, AccountStatus::Active);
    }

    #[tokio::test]
    async fn test_toggle_pending_activates() {
        let (lifecycle, _, id) = setup(Role::PendingUser, AccountStatus::Pending).await;

        let account = lifecycle.toggle_status(id).await.unwrap();
        assert_eq!(account.status, AccountStatus::Active);
        assert_eq!(account.role, Role::PendingUser);
    }

    #[tokio::test]
    async fn test_toggle_protected_account_refused() {
        for status in [AccountStatus::Active, AccountStatus::Disabled, AccountStatus::Pending] {
            let (lifecycle, store, id) = setup(Role::SuperAdmin, status).await;

            let err = lifecycle.toggle_status(id).await.unwrap_err();
            assert!(err.is_forbidden(ForbiddenReason::ProtectedAccount));

            // 상태 변경 없음
            let unchanged = store.find_by_id(id).await.unwrap().unwrap();
            assert_eq!(unchanged.status, status);
        }
    }

    #[tokio::test]
    async fn test_change_role_last_write_wins() {
        let (lifecycle, _, id) = setup(Role::PendingUser, AccountStatus::Active).await;

        lifecycle.change_role(id, Role::AuthorizedUser).await.unwrap();
        let account = lifecycle.change_role(id, Role::PendingUser).await.unwrap();
        assert_eq!(account.role, Role::PendingUser);
        assert_eq!(account.status, AccountStatus::Active);
    }

    #[tokio::test]
    async fn test_unknown_account_is_not_found() {
        let (lifecycle, _, _) = setup(Role::PendingUser, AccountStatus::Pending).await;
        let missing = Uuid::new_v4();

        assert!(matches!(lifecycle.approve(missing, None).await, Err(LeadflowError::NotFound(_))));
        assert!(matches!(lifecycle.reject(missing).await, Err(LeadflowError::NotFound(_))));
        assert!(matches!(lifecycle.toggle_status(missing).await, Err(LeadflowError::NotFound(_))));
        assert!(matches!(
            lifecycle.change_role(missing, Role::AuthorizedUser).await,
            Err(LeadflowError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_store_outage_is_internal() {
        let (lifecycle, store, id) = setup(Role::AuthorizedUser, AccountStatus::Active).await;
        store.set_unavailable(true);

        assert!(matches!(lifecycle.reject(id).await, Err(LeadflowError::Internal(_))));
    }

    #[tokio::test]
    async fn test_record_login_sets_timestamp() {
        let (lifecycle, store, id) = setup(Role::AuthorizedUser, AccountStatus::Active).await;
        let account = store.find_by_id(id).await.unwrap().unwrap();
        assert!(account.last_login.is_none());

        let account = lifecycle.record_login(id).await.unwrap();
        assert!(account.last_login.is_some());
        assert_eq!(account.status, AccountStatus::Active);

        assert!(matches!(
            lifecycle.record_login(Uuid::new_v4()).await,
            Err(LeadflowError::NotFound(_))
        ));
    }
}
