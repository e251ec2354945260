//! 목록 조회 페이지네이션.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 기본 페이지 크기.
pub const DEFAULT_LIMIT: i64 = 10;

/// 최대 페이지 크기.
pub const MAX_LIMIT: i64 = 100;

/// 정규화된 페이지 요청.
///
/// `page`는 1부터 시작합니다. 범위를 벗어난 값은 오류 없이 보정됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.filter(|p| *p >= 1).unwrap_or(1);
        let limit = limit
            .filter(|l| *l >= 1)
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT);

        Self { page, limit }
    }

    /// SQL OFFSET.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// 목록 응답의 페이지 정보.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Pagination {
    /// 현재 페이지 (1부터)
    pub page: i64,
    /// 페이지 크기
    pub limit: i64,
    /// 전체 항목 수
    pub total: i64,
    /// 전체 페이지 수
    pub pages: i64,
}

impl Pagination {
    pub fn new(request: PageRequest, total: i64) -> Self {
        let pages = (total + request.limit - 1) / request.limit;
        Self {
            page: request.page,
            limit: request.limit,
            total,
            pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_clamping() {
        assert_eq!(PageRequest::default(), PageRequest { page: 1, limit: 10 });
        assert_eq!(PageRequest::new(Some(0), Some(0)), PageRequest { page: 1, limit: 10 });
        assert_eq!(PageRequest::new(Some(3), Some(500)).limit, MAX_LIMIT);
        assert_eq!(PageRequest::new(Some(3), Some(20)).offset(), 40);
    }

    #[test]
    fn test_pages_rounds_up() {
        let request = PageRequest::new(Some(1), Some(10));
        assert_eq!(Pagination::new(request, 0).pages, 0);
        assert_eq!(Pagination::new(request, 10).pages, 1);
        assert_eq!(Pagination::new(request, 11).pages, 2);
    }
}
