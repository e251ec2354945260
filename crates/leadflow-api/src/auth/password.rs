//! 비밀번호 해싱.
//!
//! Argon2id 기반 해싱 및 검증. 해시는 PHC 문자열(솔트 포함)로 저장합니다.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// 최소 비밀번호 길이.
pub const MIN_PASSWORD_LEN: u64 = 6;

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패")]
    HashingFailed,
    #[error("잘못된 해시 형식")]
    InvalidHashFormat,
}

/// 비밀번호를 해싱합니다.
///
/// ```rust,ignore
/// let hash = hash_password("admin123")?;
/// // "$argon2id$v=19$m=19456,t=2,p=1$..."
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| PasswordError::HashingFailed)?;

    Ok(hash.to_string())
}

/// 저장된 해시와 비밀번호를 비교합니다.
///
/// 불일치는 `Ok(false)`이며, 저장된 해시를 해석할 수 없을 때만 에러입니다.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("admin123").unwrap();
        assert!(hash.starts_with("$argon2id$"));

        assert!(verify_password("admin123", &hash).unwrap());
        assert!(!verify_password("admin124", &hash).unwrap());
    }

    #[test]
    fn test_same_password_different_salt() {
        let hash1 = hash_password("user123").unwrap();
        let hash2 = hash_password("user123").unwrap();
        assert_ne!(hash1, hash2);
        assert!(verify_password("user123", &hash2).unwrap());
    }

    #[test]
    fn test_invalid_hash_format() {
        let result = verify_password("password", "not-a-valid-hash");
        assert!(matches!(result, Err(PasswordError::InvalidHashFormat)));
    }
}
