//! LeadFlow 운영 CLI.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 마이그레이션 적용
//! - 데모 데이터 시드 및 전체 삭제
//! - 관리자 계정 생성/승격

pub mod commands;
