//! LeadFlow 에러 타입.
//!
//! 접근 제어와 계정 생명주기에서 발생하는 에러 분류를 정의합니다.
//! 분류는 호출자에게 노출되는 방식까지 결정합니다:
//!
//! - [`LeadflowError::Unauthenticated`]: 사유와 무관하게 항상 동일한 "not authorized" 신호
//! - [`LeadflowError::Forbidden`]: 신원이 확인되었으므로 구체적인 사유를 노출
//! - [`LeadflowError::Internal`]: 저장소/토큰 검증기 장애. 인증 실패로 변환하지 않음

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 인증 실패 사유.
///
/// 로그와 메트릭에만 기록되며 응답 본문에는 포함되지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthFailure {
    /// Authorization 헤더가 없거나 Bearer 형식이 아님
    MissingCredential,
    /// 서명 불일치, 만료, 형식 오류
    InvalidCredential,
    /// 유효한 토큰이지만 subject가 없음
    MissingSubject,
    /// subject에 해당하는 계정이 없음
    SubjectNotFound,
    /// 로그인 시 이메일 또는 비밀번호 불일치
    BadPassword,
}

impl AuthFailure {
    /// 메트릭 라벨 및 로그용 식별자.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthFailure::MissingCredential => "missing_credential",
            AuthFailure::InvalidCredential => "invalid_credential",
            AuthFailure::MissingSubject => "missing_subject",
            AuthFailure::SubjectNotFound => "subject_not_found",
            AuthFailure::BadPassword => "bad_password",
        }
    }
}

impl std::fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AuthFailure::MissingCredential => "missing/invalid credential",
            AuthFailure::InvalidCredential => "invalid credential",
            AuthFailure::MissingSubject => "credential missing subject",
            AuthFailure::SubjectNotFound => "subject not found",
            AuthFailure::BadPassword => "invalid email or password",
        };
        write!(f, "{}", s)
    }
}

/// 접근 거부 사유.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForbiddenReason {
    /// 비활성화된 계정
    AccountDisabled,
    /// 승인 대기 중인 계정
    AccountPending,
    /// 허용되지 않은 역할
    RoleNotPermitted,
    /// 보호 역할(super_admin) 계정은 비활성화할 수 없음
    ProtectedAccount,
}

impl ForbiddenReason {
    /// API 에러 코드.
    pub fn code(&self) -> &'static str {
        match self {
            ForbiddenReason::AccountDisabled => "ACCOUNT_DISABLED",
            ForbiddenReason::AccountPending => "ACCOUNT_PENDING",
            ForbiddenReason::RoleNotPermitted => "ROLE_NOT_PERMITTED",
            ForbiddenReason::ProtectedAccount => "PROTECTED_ACCOUNT",
        }
    }
}

impl std::fmt::Display for ForbiddenReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ForbiddenReason::AccountDisabled => "account disabled",
            ForbiddenReason::AccountPending => "account pending approval",
            ForbiddenReason::RoleNotPermitted => "role not permitted",
            ForbiddenReason::ProtectedAccount => "cannot disable privileged account",
        };
        write!(f, "{}", s)
    }
}

/// 필드 단위 검증 에러.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct FieldError {
    /// 필드 이름
    pub field: String,
    /// 에러 설명
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// LeadFlow 핵심 에러.
#[derive(Debug, Error)]
pub enum LeadflowError {
    /// 인증 실패 (자격증명 없음/무효/만료, subject 미해결)
    #[error("인증 실패: {0}")]
    Unauthenticated(AuthFailure),

    /// 인증되었으나 상태 또는 역할로 인해 거부됨
    #[error("{0}")]
    Forbidden(ForbiddenReason),

    /// 대상 리소스 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {}", format_fields(.0))]
    Validation(Vec<FieldError>),

    /// 고유 제약 위반
    #[error("충돌: {0}")]
    Conflict(String),

    /// 저장소/토큰 검증기 장애
    #[error("내부 에러: {0}")]
    Internal(String),
}

fn format_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join(", ")
}

/// LeadFlow 작업을 위한 Result 타입.
pub type LeadflowResult<T> = Result<T, LeadflowError>;

impl LeadflowError {
    /// 단일 필드 검증 에러 생성.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        LeadflowError::Validation(vec![FieldError::new(field, message)])
    }

    /// 인증 실패인지 확인합니다.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, LeadflowError::Unauthenticated(_))
    }

    /// 특정 사유의 접근 거부인지 확인합니다.
    pub fn is_forbidden(&self, reason: ForbiddenReason) -> bool {
        matches!(self, LeadflowError::Forbidden(r) if *r == reason)
    }
}

/// 계정 저장소 에러.
#[derive(Debug, Error)]
pub enum StoreError {
    /// 고유 키 중복 (이메일)
    #[error("중복된 값: {0}")]
    Duplicate(String),

    /// 저장소에 접근할 수 없음
    #[error("저장소 사용 불가: {0}")]
    Unavailable(String),

    /// 저장된 레코드를 해석할 수 없음
    #[error("손상된 레코드: {0}")]
    Corrupt(String),
}

impl From<StoreError> for LeadflowError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(what) => LeadflowError::Conflict(what),
            other => LeadflowError::Internal(other.to_string()),
        }
    }
}

/// 토큰 검증 에러.
#[derive(Debug, Error)]
pub enum TokenError {
    /// 만료된 토큰
    #[error("토큰이 만료되었습니다")]
    Expired,

    /// 서명 불일치 등 유효하지 않은 토큰
    #[error("유효하지 않은 토큰")]
    Invalid,

    /// 디코딩할 수 없는 토큰
    #[error("잘못된 토큰 형식")]
    Malformed,

    /// 검증기 자체의 장애 (키 설정 오류 등)
    #[error("토큰 검증기 사용 불가: {0}")]
    Unavailable(String),
}

impl TokenError {
    /// 자격증명 자체의 문제인지 확인합니다.
    ///
    /// `false`이면 검증기 장애이며 내부 에러로 전파해야 합니다.
    pub fn is_credential_fault(&self) -> bool {
        !matches!(self, TokenError::Unavailable(_))
    }
}
