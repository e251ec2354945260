//! 접근 파이프라인 미들웨어.
//!
//! 보호 대상 라우트는 항상 인증 게이트 → 상태 가드 → 역할 가드 순서로
//! 통과합니다. 각 단계는 `leadflow_core::access`의 순수 함수를 호출하고,
//! 실패하면 [`ApiError`] 응답으로 파이프라인을 끝냅니다.
//!
//! ```rust,ignore
//! let router = protect(
//!     leads_router(),
//!     &state,
//!     AccessPolicy::active_with_roles(BUSINESS_ROLES),
//! );
//! ```

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::{from_fn, from_fn_with_state, Next},
    response::Response,
    Router,
};
use leadflow_core::{
    authenticate, require_active, require_role, AccessPolicy, Account, AuthFailure,
    AuthenticatedContext, LeadflowError, RoleSet,
};

use crate::error::ApiError;
use crate::state::AppState;

/// 인증 게이트.
///
/// 성공하면 [`AuthenticatedContext`]를 요청 extension에 넣습니다.
/// UTF-8이 아닌 헤더 값은 헤더가 없는 것과 같게 취급합니다.
pub async fn auth_gate(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let context =
        authenticate(authorization, state.tokens.as_ref(), state.accounts.as_ref()).await?;

    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

/// 상태 가드. 활성 계정만 통과시킵니다.
pub async fn status_guard(request: Request, next: Next) -> Result<Response, ApiError> {
    require_active(request.extensions().get::<AuthenticatedContext>())?;
    Ok(next.run(request).await)
}

/// 역할 가드. `roles`에 포함된 역할만 통과시킵니다.
pub async fn role_guard(roles: RoleSet, request: Request, next: Next) -> Result<Response, ApiError> {
    require_role(request.extensions().get::<AuthenticatedContext>(), roles)?;
    Ok(next.run(request).await)
}

/// 라우터 전체에 접근 정책을 적용합니다.
///
/// `route_layer`는 나중에 추가한 레이어가 먼저 실행되므로
/// 역할 → 상태 → 인증 순서로 추가합니다.
pub fn protect(
    router: Router<Arc<AppState>>,
    state: &Arc<AppState>,
    policy: AccessPolicy,
) -> Router<Arc<AppState>> {
    let mut router = router;

    if let Some(roles) = policy.roles {
        router = router.route_layer(from_fn(move |request: Request, next: Next| {
            role_guard(roles, request, next)
        }));
    }
    if policy.require_active {
        router = router.route_layer(from_fn(status_guard));
    }

    router.route_layer(from_fn_with_state(state.clone(), auth_gate))
}

/// 인증 게이트가 바인딩한 계정 추출기.
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub Account);

impl<S> FromRequestParts<S> for CurrentAccount
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedContext>()
            .map(|context| CurrentAccount(context.account().clone()))
            .ok_or(ApiError(LeadflowError::Unauthenticated(
                AuthFailure::MissingCredential,
            )))
    }
}
