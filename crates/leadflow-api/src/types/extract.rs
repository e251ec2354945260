//! 요청 추출기.
//!
//! axum 기본 추출기와 같지만 거부 시 [`ApiError`] 검증 에러
//! (`400 VALIDATION_ERROR`, `details` 포함)로 응답합니다.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// JSON 본문.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// 경로 파라미터.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// 쿼리 문자열.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
