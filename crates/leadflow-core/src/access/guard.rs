//! 상태 가드와 역할 가드.
//!
//! 두 가드 모두 인증 게이트가 바인딩한 컨텍스트를 입력으로 받습니다.
//! 컨텍스트가 없으면 `Unauthenticated`로 거부합니다.
//!
//! 파이프라인 순서는 항상 인증 → 상태 → 역할이며, 앞 단계가 실패하면
//! 뒤 단계는 실행되지 않습니다. [`AccessPolicy::admit`]이 이 순서를 고정합니다.

use tracing::debug;

use super::gate::{authenticate, AuthenticatedContext};
use super::token::TokenVerifier;
use crate::domain::{AccountStatus, Role};
use crate::error::{AuthFailure, ForbiddenReason, LeadflowError, LeadflowResult};
use crate::store::AccountStore;

/// 허용 역할 집합.
///
/// 보호 대상 작업마다 라우터 구성 시점에 명시적으로 만듭니다.
/// 멤버십 검사는 정확히 일치하는 역할만 통과시킵니다.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RoleSet(u8);

impl RoleSet {
    /// 빈 집합 (모든 역할 거부).
    pub const EMPTY: RoleSet = RoleSet(0);

    const fn bit(role: Role) -> u8 {
        match role {
            Role::SuperAdmin => 0b001,
            Role::AuthorizedUser => 0b010,
            Role::PendingUser => 0b100,
        }
    }

    /// 단일 역할 집합.
    pub const fn only(role: Role) -> Self {
        RoleSet(Self::bit(role))
    }

    /// 역할을 추가한 집합.
    pub const fn with(self, role: Role) -> Self {
        RoleSet(self.0 | Self::bit(role))
    }

    /// 역할 포함 여부.
    pub const fn contains(&self, role: Role) -> bool {
        self.0 & Self::bit(role) != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// 포함된 역할 목록.
    pub fn roles(&self) -> Vec<Role> {
        Role::ALL.into_iter().filter(|r| self.contains(*r)).collect()
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        iter.into_iter().fold(RoleSet::EMPTY, RoleSet::with)
    }
}

impl std::fmt::Debug for RoleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.roles()).finish()
    }
}

impl std::fmt::Display for RoleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.roles().iter().map(Role::as_str).collect();
        write!(f, "{}", names.join(","))
    }
}

/// 상태 가드: 활성 계정만 통과시킵니다.
///
/// - `disabled` → `Forbidden(AccountDisabled)`
/// - `pending` → `Forbidden(AccountPending)`
pub fn require_active(
    context: Option<&AuthenticatedContext>,
) -> LeadflowResult<&AuthenticatedContext> {
    let context =
        context.ok_or(LeadflowError::Unauthenticated(AuthFailure::MissingCredential))?;

    match context.status() {
        AccountStatus::Active => Ok(context),
        AccountStatus::Disabled => {
            debug!(account_id = %context.account_id(), "Rejected: account disabled");
            Err(LeadflowError::Forbidden(ForbiddenReason::AccountDisabled))
        }
        AccountStatus::Pending => {
            debug!(account_id = %context.account_id(), "Rejected: account pending approval");
            Err(LeadflowError::Forbidden(ForbiddenReason::AccountPending))
        }
    }
}

/// 역할 가드: 허용 집합에 속한 역할만 통과시킵니다.
pub fn require_role(
    context: Option<&AuthenticatedContext>,
    allowed: RoleSet,
) -> LeadflowResult<&AuthenticatedContext> {
    let context =
        context.ok_or(LeadflowError::Unauthenticated(AuthFailure::MissingCredential))?;

    if allowed.contains(context.role()) {
        Ok(context)
    } else {
        debug!(
            account_id = %context.account_id(),
            role = %context.role(),
            allowed = %allowed,
            "Rejected: role not permitted"
        );
        Err(LeadflowError::Forbidden(ForbiddenReason::RoleNotPermitted))
    }
}

/// 보호 대상 작업의 접근 정책.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPolicy {
    /// 활성 상태 요구 여부
    pub require_active: bool,
    /// 허용 역할 (None이면 역할 검사 생략)
    pub roles: Option<RoleSet>,
}

impl AccessPolicy {
    /// 인증만 요구 (상태/역할 무관).
    pub const fn authenticated() -> Self {
        Self {
            require_active: false,
            roles: None,
        }
    }

    /// 인증 + 활성 상태 + 허용 역할.
    pub const fn active_with_roles(roles: RoleSet) -> Self {
        Self {
            require_active: true,
            roles: Some(roles),
        }
    }

    /// 이미 인증된 컨텍스트에 상태/역할 가드를 순서대로 적용합니다.
    pub fn authorize<'a>(
        &self,
        context: &'a AuthenticatedContext,
    ) -> LeadflowResult<&'a AuthenticatedContext> {
        if self.require_active {
            require_active(Some(context))?;
        }
        if let Some(roles) = self.roles {
            require_role(Some(context), roles)?;
        }
        Ok(context)
    }

    /// 인증 → 상태 → 역할 파이프라인 전체를 실행합니다.
    pub async fn admit(
        &self,
        authorization: Option<&str>,
        verifier: &dyn TokenVerifier,
        store: &dyn AccountStore,
    ) -> LeadflowResult<AuthenticatedContext> {
        let context = authenticate(authorization, verifier, store).await?;
        self.authorize(&context)?;
        Ok(context)
    }
}
