//! 인증 게이트.
//!
//! Authorization 헤더에서 Bearer 토큰을 꺼내 검증하고, subject를 계정으로
//! 해석하여 [`AuthenticatedContext`]를 만듭니다.
//!
//! 자격증명 문제는 모두 `Unauthenticated`로 끝나지만, 저장소나 검증기
//! 자체의 장애는 `Internal`로 전파됩니다. 401은 "자격증명이 잘못됨"만을
//! 의미해야 하며 "서버가 고장남"을 뜻해서는 안 됩니다.

use tracing::{debug, error, warn};
use uuid::Uuid;

use super::token::TokenVerifier;
use crate::domain::{Account, AccountStatus, Role};
use crate::error::{AuthFailure, LeadflowError, LeadflowResult};
use crate::store::AccountStore;

const BEARER_PREFIX: &str = "Bearer ";

/// 요청 단위로 검증된 계정 바인딩.
///
/// 요청이 끝나면 버려지며 저장되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedContext {
    account: Account,
}

impl AuthenticatedContext {
    pub fn new(account: Account) -> Self {
        Self { account }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn into_account(self) -> Account {
        self.account
    }

    pub fn account_id(&self) -> Uuid {
        self.account.id
    }

    pub fn role(&self) -> Role {
        self.account.role
    }

    pub fn status(&self) -> AccountStatus {
        self.account.status
    }
}

/// Authorization 헤더 값에서 Bearer 토큰을 추출합니다.
///
/// 헤더가 없거나 `Bearer <token>` 형식이 아니면 토큰 파싱을 시도하기 전에
/// 거부합니다.
pub fn extract_bearer(authorization: Option<&str>) -> LeadflowResult<&str> {
    let header = authorization
        .ok_or(LeadflowError::Unauthenticated(AuthFailure::MissingCredential))?;

    let token = header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|t| !t.is_empty() && !t.contains(char::is_whitespace))
        .ok_or(LeadflowError::Unauthenticated(AuthFailure::MissingCredential))?;

    Ok(token)
}

/// 요청을 인증합니다.
///
/// # 처리 순서
///
/// 1. 헤더 형식 검사 (저장소 접근 없음)
/// 2. 토큰 검증
/// 3. subject 존재 여부
/// 4. subject → 계정 해석
///
/// # Errors
///
/// - `Unauthenticated`: 자격증명 없음/무효/만료, subject 없음, 계정 없음
/// - `Internal`: 저장소 장애 또는 검증기 장애
pub async fn authenticate(
    authorization: Option<&str>,
    verifier: &dyn TokenVerifier,
    store: &dyn AccountStore,
) -> LeadflowResult<AuthenticatedContext> {
    let token = extract_bearer(authorization).inspect_err(|_| {
        debug!(reason = AuthFailure::MissingCredential.as_str(), "Authentication rejected");
    })?;

    let verified = verifier.verify(token).map_err(|e| {
        if e.is_credential_fault() {
            debug!(
                reason = AuthFailure::InvalidCredential.as_str(),
                error = %e,
                "Authentication rejected"
            );
            LeadflowError::Unauthenticated(AuthFailure::InvalidCredential)
        } else {
            error!(error = %e, "Token verifier unavailable");
            LeadflowError::Internal(e.to_string())
        }
    })?;

    let subject = verified
        .subject
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| {
            warn!(
                reason = AuthFailure::MissingSubject.as_str(),
                "Authentication rejected: verified token without subject"
            );
            LeadflowError::Unauthenticated(AuthFailure::MissingSubject)
        })?;

    // 계정 ID 형식이 아닌 subject는 존재하지 않는 계정과 동일하게 취급
    let Ok(account_id) = Uuid::parse_str(&subject) else {
        debug!(
            reason = AuthFailure::SubjectNotFound.as_str(),
            subject = %subject,
            "Authentication rejected"
        );
        return Err(LeadflowError::Unauthenticated(AuthFailure::SubjectNotFound));
    };

    let account = store
        .find_by_id(account_id)
        .await
        .map_err(|e| {
            error!(account_id = %account_id, error = %e, "Account lookup failed");
            LeadflowError::Internal(e.to_string())
        })?
        .ok_or_else(|| {
            debug!(
                reason = AuthFailure::SubjectNotFound.as_str(),
                account_id = %account_id,
                "Authentication rejected"
            );
            LeadflowError::Unauthenticated(AuthFailure::SubjectNotFound)
        })?;

    debug!(
        account_id = %account.id,
        role = %account.role,
        status = %account.status,
        "Authenticated"
    );

    Ok(AuthenticatedContext::new(account))
}
