//! 공용 타입 정의.
//!
//! 목록 조회 라우트에서 공유하는 페이지네이션과 기간 필터, 그리고
//! 거부를 검증 에러로 바꾸는 요청 추출기입니다.

pub mod extract;
pub mod pagination;
pub mod time_filter;

pub use extract::{ApiJson, ApiPath, ApiQuery};
pub use pagination::{PageRequest, Pagination, DEFAULT_LIMIT, MAX_LIMIT};
pub use time_filter::{TimeFilter, TimeRange};
