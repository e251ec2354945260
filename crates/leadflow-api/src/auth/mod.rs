//! 인증 및 접근 제어.
//!
//! # 구성 요소
//!
//! - [`JwtTokenService`]: HS256 토큰 발급, `TokenVerifier` 구현
//! - [`hash_password`] / [`verify_password`]: Argon2id 비밀번호 해싱
//! - [`auth_gate`] / [`status_guard`] / [`role_guard`]: 접근 파이프라인 미들웨어
//! - [`CurrentAccount`]: 인증된 계정 추출기
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! async fn me(CurrentAccount(account): CurrentAccount) -> Json<AccountResponse> {
//!     Json(account.into())
//! }
//! ```

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, IssuedToken, JwtError, JwtTokenService};
pub use middleware::{auth_gate, protect, role_guard, status_guard, CurrentAccount};
pub use password::{hash_password, verify_password, PasswordError, MIN_PASSWORD_LEN};
