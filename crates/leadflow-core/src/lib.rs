//! # LeadFlow Core
//!
//! 리드 관리 백엔드의 핵심 도메인 모델과 접근 제어 로직을 제공합니다.
//!
//! 이 크레이트는 HTTP 프레임워크나 데이터베이스에 의존하지 않습니다:
//! - 계정, 역할, 계정 상태 모델
//! - 리드/채팅/통화 도메인 열거형
//! - 인증 게이트 → 상태 가드 → 역할 가드로 이어지는 접근 파이프라인
//! - 관리자용 계정 생명주기 상태 머신
//! - `AccountStore` / `TokenVerifier` 추상화와 인메모리 저장소
//! - 설정 관리 및 로깅 인프라

pub mod access;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod store;

pub use access::*;
pub use self::config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use store::*;
