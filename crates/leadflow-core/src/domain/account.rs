//! 계정, 역할, 계정 상태.
//!
//! 역할은 계정이 *무엇을* 할 수 있는지, 상태는 계정이 *행동할 수 있는지*를
//! 결정합니다. 두 값은 생성 시점을 제외하면 서로 독립적으로 변합니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{LeadflowError, LeadflowResult};

/// 계정 역할.
///
/// 역할 간 상속은 없습니다. `SuperAdmin`이 `AuthorizedUser` 전용 검사를
/// 암묵적으로 통과하지 않으므로 각 가드는 허용 역할을 모두 나열해야 합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// 특권 관리자 - 계정 생명주기 관리, 비활성화 불가
    SuperAdmin,
    /// 승인된 사용자 - 리드/채팅/통화 업무
    AuthorizedUser,
    /// 승인 대기 사용자 - 가입 직후 기본 역할
    PendingUser,
}

impl Role {
    /// 모든 역할.
    pub const ALL: [Role; 3] = [Role::SuperAdmin, Role::AuthorizedUser, Role::PendingUser];

    /// 저장 및 직렬화에 쓰이는 문자열.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::AuthorizedUser => "authorized_user",
            Role::PendingUser => "pending_user",
        }
    }

    /// 문자열에서 역할 파싱 (정확히 일치해야 함).
    pub fn parse(s: &str) -> Option<Self> {
        Role::ALL.into_iter().find(|r| r.as_str() == s)
    }

    /// 요청 필드 값을 역할로 파싱하고, 실패 시 필드 단위 검증 에러를 반환합니다.
    pub fn parse_field(field: &str, value: &str) -> LeadflowResult<Self> {
        Role::parse(value).ok_or_else(|| {
            LeadflowError::invalid_field(
                field,
                format!(
                    "must be one of super_admin, authorized_user, pending_user (got '{}')",
                    value
                ),
            )
        })
    }

    /// 보호 역할인지 확인. 보호 역할 계정은 상태 토글로 비활성화할 수 없습니다.
    pub fn is_protected(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 계정 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// 승인 대기
    Pending,
    /// 활성
    Active,
    /// 비활성 (거절 또는 관리자 토글)
    Disabled,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Pending => "pending",
            AccountStatus::Active => "active",
            AccountStatus::Disabled => "disabled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(AccountStatus::Pending),
            "active" => Some(AccountStatus::Active),
            "disabled" => Some(AccountStatus::Disabled),
            _ => None,
        }
    }

    /// 상태 토글 결과: active → disabled, 그 외 → active.
    pub fn toggled(&self) -> Self {
        match self {
            AccountStatus::Active => AccountStatus::Disabled,
            AccountStatus::Pending | AccountStatus::Disabled => AccountStatus::Active,
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 계정 (공개 표현).
///
/// 비밀번호 해시는 이 타입에 포함되지 않습니다. 해시는 저장소의
/// 자격증명 조회 경로로만 전달되므로 응답에 실수로 노출될 수 없습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Account {
    /// 저장소가 부여한 식별자
    pub id: Uuid,
    /// 표시 이름
    pub name: String,
    /// 소문자로 정규화된 이메일 (고유)
    pub email: String,
    /// 역할
    pub role: Role,
    /// 상태
    pub status: AccountStatus,
    /// 마지막 인증 시각
    pub last_login: Option<DateTime<Utc>>,
    /// 생성 시각
    pub created_at: DateTime<Utc>,
    /// 수정 시각
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// 계정이 요청을 수행할 수 있는 상태인지 확인.
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }
}

/// 신규 계정 입력.
///
/// 역할과 상태는 받지 않습니다. 새 계정은 항상
/// `role = pending_user`, `status = pending`으로 시작합니다.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl NewAccount {
    /// 이름은 trim, 이메일은 trim + 소문자 정규화하여 생성합니다.
    pub fn new(
        name: impl AsRef<str>,
        email: impl AsRef<str>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            name: name.as_ref().trim().to_string(),
            email: normalize_email(email.as_ref()),
            password_hash: password_hash.into(),
        }
    }

    /// 신규 계정의 초기 역할.
    pub const fn initial_role() -> Role {
        Role::PendingUser
    }

    /// 신규 계정의 초기 상태.
    pub const fn initial_status() -> AccountStatus {
        AccountStatus::Pending
    }
}

/// 이메일 정규화 (앞뒤 공백 제거 + 소문자).
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// 계정 목록 필터.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountFilter {
    /// 특정 상태만 조회
    pub status: Option<AccountStatus>,
}

impl AccountFilter {
    /// 전체 계정.
    pub fn all() -> Self {
        Self::default()
    }

    /// 특정 상태의 계정.
    pub fn with_status(status: AccountStatus) -> Self {
        Self {
            status: Some(status),
        }
    }

    /// 계정이 필터 조건을 만족하는지 확인.
    pub fn matches(&self, account: &Account) -> bool {
        self.status.map_or(true, |s| account.status == s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_exact() {
        assert_eq!(Role::parse("super_admin"), Some(Role::SuperAdmin));
        assert_eq!(Role::parse("authorized_user"), Some(Role::AuthorizedUser));
        assert_eq!(Role::parse("pending_user"), Some(Role::PendingUser));
        assert_eq!(Role::parse("SUPER_ADMIN"), None);
        assert_eq!(Role::parse("admin"), None);
    }

    #[test]
    fn test_role_parse_field_error() {
        let err = Role::parse_field("role", "root").unwrap_err();
        match err {
            LeadflowError::Validation(fields) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].field, "role");
                assert!(fields[0].message.contains("root"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Role::SuperAdmin).unwrap();
        assert_eq!(json, "\"super_admin\"");

        let parsed: Role = serde_json::from_str("\"authorized_user\"").unwrap();
        assert_eq!(parsed, Role::AuthorizedUser);
        assert!(serde_json::from_str::<Role>("\"viewer\"").is_err());
    }

    #[test]
    fn test_status_toggle() {
        assert_eq!(AccountStatus::Active.toggled(), AccountStatus::Disabled);
        assert_eq!(AccountStatus::Disabled.toggled(), AccountStatus::Active);
        assert_eq!(AccountStatus::Pending.toggled(), AccountStatus::Active);
    }

    #[test]
    fn test_new_account_normalizes() {
        let new = NewAccount::new("  Jane Doe ", "  Jane.Doe@Example.COM ", "hash");
        assert_eq!(new.name, "Jane Doe");
        assert_eq!(new.email, "jane.doe@example.com");
        assert_eq!(NewAccount::initial_role(), Role::PendingUser);
        assert_eq!(NewAccount::initial_status(), AccountStatus::Pending);
    }

    #[test]
    fn test_account_serialization_has_no_secret() {
        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            role: Role::PendingUser,
            status: AccountStatus::Pending,
            last_login: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("password"));
        assert!(json.contains(r#""role":"pending_user""#));
        assert!(json.contains(r#""status":"pending""#));
    }
}
