//! 계정 저장소 추상화.
//!
//! 접근 파이프라인과 계정 생명주기는 이 trait만 알고 있으며,
//! 실제 구현(PostgreSQL, 인메모리)은 호출 측에서 주입합니다.

mod memory;

pub use memory::InMemoryAccountStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Account, AccountFilter, AccountStatus, NewAccount, Role};
use crate::error::StoreError;

/// 계정과 저장된 비밀번호 해시.
///
/// 로그인 검증 경로에서만 사용되며 직렬화되지 않습니다.
#[derive(Debug, Clone)]
pub struct AccountCredentials {
    pub account: Account,
    pub password_hash: String,
}

/// 관리자 작업이 바꾸는 접근 필드.
///
/// `None`인 필드는 저장소에서 건드리지 않습니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessUpdate {
    pub role: Option<Role>,
    pub status: Option<AccountStatus>,
}

impl AccessUpdate {
    pub fn status(status: AccountStatus) -> Self {
        Self {
            role: None,
            status: Some(status),
        }
    }

    pub fn role(role: Role) -> Self {
        Self {
            role: Some(role),
            status: None,
        }
    }

    /// 이 변경을 계정 스냅샷에 적용합니다.
    pub fn apply(&self, account: &mut Account) {
        if let Some(role) = self.role {
            account.role = role;
        }
        if let Some(status) = self.status {
            account.status = status;
        }
    }
}

/// 계정 저장소.
///
/// # 구현 규칙
///
/// - `create`는 항상 `role = pending_user`, `status = pending`으로 저장합니다.
/// - 이메일은 소문자로 정규화된 값으로 고유해야 하며, 중복 시
///   `StoreError::Duplicate`를 반환합니다.
/// - 쓰기는 필드 단위입니다. `update_access`는 지정된 역할/상태만,
///   `record_login`은 마지막 로그인 시각만 바꾸므로 서로의 변경을
///   덮어쓰지 않습니다.
/// - 대상 계정이 없으면 쓰기 메서드는 `Ok(None)`을 반환합니다.
/// - `find_all`은 생성 시각 내림차순으로 반환합니다.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// ID로 계정 조회.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    /// 정규화된 이메일로 계정과 비밀번호 해시 조회.
    async fn find_credentials(&self, email: &str)
        -> Result<Option<AccountCredentials>, StoreError>;

    /// 신규 계정 생성.
    async fn create(&self, new_account: NewAccount) -> Result<Account, StoreError>;

    /// 역할/상태 중 지정된 필드만 갱신하고 갱신된 계정 반환.
    async fn update_access(
        &self,
        id: Uuid,
        update: AccessUpdate,
    ) -> Result<Option<Account>, StoreError>;

    /// 마지막 로그인 시각을 현재 시각으로 갱신.
    async fn record_login(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    /// 필터 조건의 계정 목록 (최신순).
    async fn find_all(&self, filter: AccountFilter) -> Result<Vec<Account>, StoreError>;
}
