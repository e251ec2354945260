//! 토큰 검증 추상화.
//!
//! 서명 방식은 이 크레이트의 관심사가 아닙니다. 검증기는 토큰이 유효하면
//! subject를 돌려주고, 그 외에는 [`TokenError`]로 실패합니다.

use crate::error::TokenError;

/// 검증을 통과한 토큰의 내용.
///
/// 토큰은 신원만 증명하며 역할이나 상태 같은 권한 정보는 담지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    /// subject (계정 ID). 서명이 유효해도 비어 있을 수 있습니다.
    pub subject: Option<String>,
}

impl VerifiedToken {
    pub fn with_subject(subject: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self { subject: None }
    }
}

/// 토큰 검증기.
pub trait TokenVerifier: Send + Sync {
    /// 토큰 서명과 만료를 검증합니다.
    fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError>;
}
