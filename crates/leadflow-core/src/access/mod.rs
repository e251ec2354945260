//! 접근 제어.
//!
//! # 구성 요소
//!
//! - [`authenticate`]: Bearer 토큰 검증 및 계정 바인딩 (인증 게이트)
//! - [`require_active`]: 계정 상태 검사 (상태 가드)
//! - [`require_role`] / [`RoleSet`]: 허용 역할 검사 (역할 가드)
//! - [`AccessPolicy`]: 세 단계를 고정된 순서로 조합
//! - [`AccountLifecycle`]: 관리자용 승인/거절/토글/역할 변경
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! let policy = AccessPolicy::active_with_roles(RoleSet::only(Role::SuperAdmin));
//! let ctx = policy.admit(header, &verifier, &store).await?;
//! let lifecycle = AccountLifecycle::new(store);
//! lifecycle.approve(target_id, None).await?;
//! ```

mod gate;
mod guard;
mod lifecycle;
mod token;

pub use gate::{authenticate, extract_bearer, AuthenticatedContext};
pub use guard::{require_active, require_role, AccessPolicy, RoleSet};
pub use lifecycle::{AccountLifecycle, LifecycleOperation};
pub use token::{TokenVerifier, VerifiedToken};
