//! 접근 파이프라인 통합 테스트.
//!
//! 인메모리 저장소와 가짜 토큰 검증기로 인증 → 상태 → 역할 순서와
//! 계정 생명주기 전이를 검증합니다.

use std::sync::Arc;

use async_trait::async_trait;
use leadflow_core::{
    AccessPolicy, AccessUpdate, Account, AccountCredentials, AccountFilter, AccountLifecycle,
    AccountStatus, AccountStore, AuthFailure, ForbiddenReason, InMemoryAccountStore,
    LeadflowError, NewAccount, Role, RoleSet, StoreError, TokenError, TokenVerifier,
    VerifiedToken,
};
use proptest::prelude::*;
use uuid::Uuid;

/// 토큰 문자열을 그대로 subject로 취급하는 검증기.
///
/// - `expired` → 만료
/// - `garbage` → 무효
/// - `anon` → subject 없는 유효 토큰
/// - `outage` → 검증기 장애
struct PlainVerifier;

impl TokenVerifier for PlainVerifier {
    fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        match token {
            "expired" => Err(TokenError::Expired),
            "garbage" => Err(TokenError::Invalid),
            "anon" => Ok(VerifiedToken::anonymous()),
            "outage" => Err(TokenError::Unavailable("key store offline".to_string())),
            subject => Ok(VerifiedToken::with_subject(subject)),
        }
    }
}

fn bearer(id: Uuid) -> String {
    format!("Bearer {}", id)
}

fn business_policy() -> AccessPolicy {
    AccessPolicy::active_with_roles(
        RoleSet::only(Role::SuperAdmin).with(Role::AuthorizedUser),
    )
}

fn admin_policy() -> AccessPolicy {
    AccessPolicy::active_with_roles(RoleSet::only(Role::SuperAdmin))
}

async fn signup(store: &InMemoryAccountStore, email: &str) -> Uuid {
    store
        .create(NewAccount::new("Someone", email, "argon2-hash"))
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn signup_starts_pending() {
    let store = InMemoryAccountStore::new();
    let account = store
        .create(NewAccount::new("  Kim  ", "  Kim@Example.COM ", "hash"))
        .await
        .unwrap();

    assert_eq!(account.status, AccountStatus::Pending);
    assert_eq!(account.role, Role::PendingUser);
    assert_eq!(account.name, "Kim");
    assert_eq!(account.email, "kim@example.com");

    let json = serde_json::to_value(&account).unwrap();
    assert!(json.get("password").is_none());
    assert!(json.get("password_hash").is_none());
}

#[tokio::test]
async fn malformed_header_rejected_before_store_access() {
    let store = InMemoryAccountStore::new();
    let verifier = PlainVerifier;

    for header in [None, Some("Basic abc"), Some("bearer x"), Some("Bearer ")] {
        let err = AccessPolicy::authenticated()
            .admit(header, &verifier, &store)
            .await
            .unwrap_err();
        assert!(err.is_unauthenticated());
    }

    assert_eq!(store.lookup_count(), 0);
}

#[tokio::test]
async fn invalid_tokens_are_unauthenticated() {
    let store = InMemoryAccountStore::new();
    let verifier = PlainVerifier;

    for header in ["Bearer expired", "Bearer garbage"] {
        let err = AccessPolicy::authenticated()
            .admit(Some(header), &verifier, &store)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LeadflowError::Unauthenticated(AuthFailure::InvalidCredential)
        ));
    }

    let err = AccessPolicy::authenticated()
        .admit(Some("Bearer anon"), &verifier, &store)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LeadflowError::Unauthenticated(AuthFailure::MissingSubject)
    ));
    assert_eq!(store.lookup_count(), 0);
}

#[tokio::test]
async fn unknown_subject_is_unauthenticated_not_not_found() {
    let store = InMemoryAccountStore::new();
    let verifier = PlainVerifier;

    let err = AccessPolicy::authenticated()
        .admit(Some(bearer(Uuid::new_v4()).as_str()), &verifier, &store)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LeadflowError::Unauthenticated(AuthFailure::SubjectNotFound)
    ));

    let err = AccessPolicy::authenticated()
        .admit(Some("Bearer not-a-uuid"), &verifier, &store)
        .await
        .unwrap_err();
    assert!(err.is_unauthenticated());
}

#[tokio::test]
async fn infrastructure_faults_are_internal() {
    let store = InMemoryAccountStore::new();
    let id = signup(&store, "a@example.com").await;
    let verifier = PlainVerifier;

    let err = AccessPolicy::authenticated()
        .admit(Some("Bearer outage"), &verifier, &store)
        .await
        .unwrap_err();
    assert!(matches!(err, LeadflowError::Internal(_)));

    store.set_unavailable(true);
    let err = AccessPolicy::authenticated()
        .admit(Some(bearer(id).as_str()), &verifier, &store)
        .await
        .unwrap_err();
    assert!(matches!(err, LeadflowError::Internal(_)));
}

#[tokio::test]
async fn disabled_account_forbidden_regardless_of_role() {
    let store = InMemoryAccountStore::new();
    let verifier = PlainVerifier;

    for role in Role::ALL {
        let email = format!("{}@example.com", role.as_str());
        let account = store
            .insert_with(
                NewAccount::new("Disabled", &email, "hash"),
                role,
                AccountStatus::Disabled,
            )
            .await
            .unwrap();

        let err = business_policy()
            .admit(Some(bearer(account.id).as_str()), &verifier, &store)
            .await
            .unwrap_err();
        assert!(err.is_forbidden(ForbiddenReason::AccountDisabled));
        assert_eq!(err.to_string(), "account disabled");
    }
}

#[tokio::test]
async fn authenticated_only_policy_ignores_status() {
    let store = InMemoryAccountStore::new();
    let verifier = PlainVerifier;
    let id = signup(&store, "pending@example.com").await;

    let ctx = AccessPolicy::authenticated()
        .admit(Some(bearer(id).as_str()), &verifier, &store)
        .await
        .unwrap();
    assert_eq!(ctx.status(), AccountStatus::Pending);
}

#[tokio::test]
async fn protected_account_cannot_be_toggled_even_by_admin() {
    let store = Arc::new(InMemoryAccountStore::new());
    let admin = store
        .insert_with(
            NewAccount::new("Admin", "admin@example.com", "hash"),
            Role::SuperAdmin,
            AccountStatus::Active,
        )
        .await
        .unwrap();
    let verifier = PlainVerifier;

    // 관리자 본인이 자신을 대상으로 호출
    admin_policy()
        .admit(Some(bearer(admin.id).as_str()), &verifier, store.as_ref())
        .await
        .unwrap();

    let lifecycle = AccountLifecycle::new(store.clone());
    let err = lifecycle.toggle_status(admin.id).await.unwrap_err();
    assert!(err.is_forbidden(ForbiddenReason::ProtectedAccount));

    let after = store.find_by_id(admin.id).await.unwrap().unwrap();
    assert_eq!(after.status, AccountStatus::Active);
}

#[tokio::test]
async fn signup_approve_toggle_end_to_end() {
    let store = Arc::new(InMemoryAccountStore::new());
    let verifier = PlainVerifier;
    let lifecycle = AccountLifecycle::new(store.clone());

    let id = signup(&store, "new@example.com").await;
    let header = bearer(id);

    // 승인 전
    let err = business_policy()
        .admit(Some(header.as_str()), &verifier, store.as_ref())
        .await
        .unwrap_err();
    assert!(err.is_forbidden(ForbiddenReason::AccountPending));

    // 승인
    lifecycle.approve(id, None).await.unwrap();
    let ctx = business_policy()
        .admit(Some(header.as_str()), &verifier, store.as_ref())
        .await
        .unwrap();
    assert_eq!(ctx.role(), Role::AuthorizedUser);

    // 비활성화
    lifecycle.toggle_status(id).await.unwrap();
    let err = business_policy()
        .admit(Some(header.as_str()), &verifier, store.as_ref())
        .await
        .unwrap_err();
    assert!(err.is_forbidden(ForbiddenReason::AccountDisabled));

    // 재활성화
    lifecycle.toggle_status(id).await.unwrap();
    business_policy()
        .admit(Some(header.as_str()), &verifier, store.as_ref())
        .await
        .unwrap();

    // 일반 사용자는 관리자 작업 불가
    let err = admin_policy()
        .admit(Some(header.as_str()), &verifier, store.as_ref())
        .await
        .unwrap_err();
    assert!(err.is_forbidden(ForbiddenReason::RoleNotPermitted));
}

#[tokio::test]
async fn role_change_takes_effect_on_next_request() {
    let store = Arc::new(InMemoryAccountStore::new());
    let verifier = PlainVerifier;
    let lifecycle = AccountLifecycle::new(store.clone());

    let id = signup(&store, "user@example.com").await;
    lifecycle.approve(id, None).await.unwrap();
    let header = bearer(id);

    business_policy()
        .admit(Some(header.as_str()), &verifier, store.as_ref())
        .await
        .unwrap();

    // 같은 토큰이라도 다음 요청에서 현재 역할로 다시 판단
    lifecycle.change_role(id, Role::PendingUser).await.unwrap();
    let err = business_policy()
        .admit(Some(header.as_str()), &verifier, store.as_ref())
        .await
        .unwrap_err();
    assert!(err.is_forbidden(ForbiddenReason::RoleNotPermitted));
}

#[tokio::test]
async fn login_after_concurrent_reject_keeps_account_disabled() {
    let store = Arc::new(InMemoryAccountStore::new());
    let verifier = PlainVerifier;
    let lifecycle = AccountLifecycle::new(store.clone());

    let id = signup(&store, "user@example.com").await;
    lifecycle.approve(id, None).await.unwrap();

    // 비밀번호 검증 직후, 로그인 기록 전에 관리자가 거절
    let credentials = store
        .find_credentials("user@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(credentials.account.status, AccountStatus::Active);
    lifecycle.reject(id).await.unwrap();

    let account = lifecycle.record_login(credentials.account.id).await.unwrap();
    assert_eq!(account.status, AccountStatus::Disabled);
    assert_eq!(account.role, Role::AuthorizedUser);
    assert!(account.last_login.is_some());

    let stored = store.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.status, AccountStatus::Disabled);

    let err = business_policy()
        .admit(Some(bearer(id).as_str()), &verifier, store.as_ref())
        .await
        .unwrap_err();
    assert!(err.is_forbidden(ForbiddenReason::AccountDisabled));
}

/// 조회 직후 다른 관리자의 역할 변경이 끼어드는 저장소.
struct InterleavingStore {
    inner: InMemoryAccountStore,
    concurrent_role: Role,
}

#[async_trait]
impl AccountStore for InterleavingStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let snapshot = self.inner.find_by_id(id).await?;
        self.inner
            .update_access(id, AccessUpdate::role(self.concurrent_role))
            .await?;
        Ok(snapshot)
    }

    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<AccountCredentials>, StoreError> {
        self.inner.find_credentials(email).await
    }

    async fn create(&self, new_account: NewAccount) -> Result<Account, StoreError> {
        self.inner.create(new_account).await
    }

    async fn update_access(
        &self,
        id: Uuid,
        update: AccessUpdate,
    ) -> Result<Option<Account>, StoreError> {
        self.inner.update_access(id, update).await
    }

    async fn record_login(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        self.inner.record_login(id).await
    }

    async fn find_all(&self, filter: AccountFilter) -> Result<Vec<Account>, StoreError> {
        self.inner.find_all(filter).await
    }
}

#[tokio::test]
async fn status_changes_do_not_overwrite_concurrent_role_change() {
    let inner = InMemoryAccountStore::new();
    let id = inner
        .insert_with(
            NewAccount::new("Someone", "user@example.com", "argon2-hash"),
            Role::AuthorizedUser,
            AccountStatus::Active,
        )
        .await
        .unwrap()
        .id;
    let store = Arc::new(InterleavingStore {
        inner,
        concurrent_role: Role::PendingUser,
    });
    let lifecycle = AccountLifecycle::new(store.clone());

    let rejected = lifecycle.reject(id).await.unwrap();
    assert_eq!(rejected.status, AccountStatus::Disabled);
    assert_eq!(rejected.role, Role::PendingUser);

    let toggled = lifecycle.toggle_status(id).await.unwrap();
    assert_eq!(toggled.status, AccountStatus::Active);
    assert_eq!(toggled.role, Role::PendingUser);
}

fn role_strategy() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::SuperAdmin),
        Just(Role::AuthorizedUser),
        Just(Role::PendingUser),
    ]
}

fn status_strategy() -> impl Strategy<Value = AccountStatus> {
    prop_oneof![
        Just(AccountStatus::Pending),
        Just(AccountStatus::Active),
        Just(AccountStatus::Disabled),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn lifecycle_on_missing_id_is_not_found(raw in any::<u128>(), role in role_strategy()) {
        runtime().block_on(async {
            let store = Arc::new(InMemoryAccountStore::new());
            signup(&store, "someone@example.com").await;
            let lifecycle = AccountLifecycle::new(store.clone());
            let missing = Uuid::from_u128(raw);

            prop_assert!(matches!(lifecycle.approve(missing, Some(role)).await, Err(LeadflowError::NotFound(_))));
            prop_assert!(matches!(lifecycle.reject(missing).await, Err(LeadflowError::NotFound(_))));
            prop_assert!(matches!(lifecycle.toggle_status(missing).await, Err(LeadflowError::NotFound(_))));
            prop_assert!(matches!(lifecycle.change_role(missing, role).await, Err(LeadflowError::NotFound(_))));
            Ok(())
        })?;
    }

    #[test]
    fn transitions_respect_role_and_status_rules(
        role in role_strategy(),
        status in status_strategy(),
        approve_role in proptest::option::of(role_strategy()),
    ) {
        runtime().block_on(async {
            let store = Arc::new(InMemoryAccountStore::new());
            let account = store
                .insert_with(NewAccount::new("P", "p@example.com", "hash"), role, status)
                .await
                .unwrap();
            let lifecycle = AccountLifecycle::new(store.clone());

            let rejected = lifecycle.reject(account.id).await.unwrap();
            prop_assert_eq!(rejected.status, AccountStatus::Disabled);
            prop_assert_eq!(rejected.role, role);

            let toggled = lifecycle.toggle_status(account.id).await;
            if role.is_protected() {
                prop_assert!(toggled.unwrap_err().is_forbidden(ForbiddenReason::ProtectedAccount));
            } else {
                prop_assert_eq!(toggled.unwrap().status, AccountStatus::Active);
            }

            let approved = lifecycle.approve(account.id, approve_role).await.unwrap();
            prop_assert_eq!(approved.status, AccountStatus::Active);
            prop_assert_eq!(approved.role, approve_role.unwrap_or(Role::AuthorizedUser));
            Ok(())
        })?;
    }
}
