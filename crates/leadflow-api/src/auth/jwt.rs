//! JWT 토큰 발급 및 검증.
//!
//! 토큰은 계정 ID(subject)만 담습니다. 역할과 상태는 매 요청마다
//! 저장소에서 다시 읽으므로 토큰에 넣지 않습니다.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use leadflow_core::{TokenError, TokenVerifier, VerifiedToken};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// JWT 페이로드.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - 계정 ID. 서명이 유효해도 없을 수 있습니다.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Issued At (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    /// JWT ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    /// 계정용 Claims 생성.
    pub fn for_account(account_id: Uuid, expires_in_minutes: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: Some(account_id.to_string()),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(expires_in_minutes)).timestamp(),
            jti: Some(Uuid::new_v4().to_string()),
        }
    }
}

/// 발급된 토큰.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IssuedToken {
    /// Bearer 토큰
    pub access_token: String,
    /// 토큰 타입 (항상 "Bearer")
    pub token_type: String,
    /// 만료까지 남은 시간 (초)
    pub expires_in: i64,
}

/// 토큰 발급 에러.
#[derive(Debug, thiserror::Error)]
#[error("토큰 인코딩 실패: {0}")]
pub struct JwtError(#[from] jsonwebtoken::errors::Error);

/// HS256 토큰 서비스.
#[derive(Clone)]
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_minutes: i64,
}

impl std::fmt::Debug for JwtTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenService")
            .field("ttl_minutes", &self.ttl_minutes)
            .finish_non_exhaustive()
    }
}

impl JwtTokenService {
    pub fn new(secret: &SecretString, ttl_minutes: i64) -> Self {
        let key = secret.expose_secret().as_bytes();

        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(key),
            decoding: DecodingKey::from_secret(key),
            validation,
            ttl_minutes,
        }
    }

    /// 토큰 유효 기간 (분).
    pub fn ttl_minutes(&self) -> i64 {
        self.ttl_minutes
    }

    /// 계정에 대한 토큰을 발급합니다.
    pub fn issue(&self, account_id: Uuid) -> Result<IssuedToken, JwtError> {
        let claims = Claims::for_account(account_id, self.ttl_minutes);
        let access_token = self.encode(&claims)?;

        Ok(IssuedToken {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.ttl_minutes * 60,
        })
    }

    /// 임의의 Claims를 서명합니다.
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        Ok(encode(&Header::default(), claims, &self.encoding)?)
    }
}

impl TokenVerifier for JwtTokenService {
    fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidToken
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_) => TokenError::Malformed,
                ErrorKind::InvalidKeyFormat
                | ErrorKind::InvalidRsaKey(_)
                | ErrorKind::InvalidEcdsaKey
                | ErrorKind::RsaFailedSigning
                | ErrorKind::Crypto(_) => TokenError::Unavailable(e.to_string()),
                _ => TokenError::Invalid,
            }
        })?;

        Ok(VerifiedToken {
            subject: data.claims.sub,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

    fn service() -> JwtTokenService {
        JwtTokenService::new(&SecretString::from(TEST_SECRET.to_string()), 60)
    }

    #[test]
    fn test_issue_and_verify() {
        let service = service();
        let account_id = Uuid::new_v4();

        let issued = service.issue(account_id).unwrap();
        assert_eq!(issued.token_type, "Bearer");
        assert_eq!(issued.expires_in, 3600);

        let verified = service.verify(&issued.access_token).unwrap();
        assert_eq!(verified.subject, Some(account_id.to_string()));
    }

    #[test]
    fn test_expired_token() {
        let service = service();
        let mut claims = Claims::for_account(Uuid::new_v4(), 60);
        claims.iat -= 7200;
        claims.exp = Utc::now().timestamp() - 3600;

        let token = service.encode(&claims).unwrap();
        assert!(matches!(service.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = service().issue(Uuid::new_v4()).unwrap().access_token;
        let other = JwtTokenService::new(
            &SecretString::from("another-secret-key-for-testing-minimum-32".to_string()),
            60,
        );

        let err = other.verify(&token).unwrap_err();
        assert!(matches!(err, TokenError::Invalid));
        assert!(err.is_credential_fault());
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert!(matches!(
            service().verify("invalid.token.here"),
            Err(TokenError::Malformed)
        ));
        assert!(matches!(service().verify("abc"), Err(TokenError::Malformed)));
    }

    #[test]
    fn test_token_without_subject() {
        let service = service();
        let mut claims = Claims::for_account(Uuid::new_v4(), 60);
        claims.sub = None;

        let token = service.encode(&claims).unwrap();
        let verified = service.verify(&token).unwrap();
        assert!(verified.subject.is_none());
    }
}
