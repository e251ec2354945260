//! Prometheus 메트릭 설정 및 유틸리티.
//!
//! HTTP 요청 메트릭과 접근 제어 메트릭을 수집하고 `/metrics` 엔드포인트로 노출합니다.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

/// Prometheus 메트릭 레코더를 설치하고 핸들을 반환합니다.
///
/// 프로세스당 한 번만 성공합니다.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )?
        .install_recorder()
}

// ============================================================================
// HTTP 메트릭
// ============================================================================

/// HTTP 요청 카운터 증가.
pub fn record_http_request(method: &str, path: &str) {
    counter!("http_requests_total", "method" => method.to_string(), "path" => path.to_string())
        .increment(1);
}

/// HTTP 응답 카운터 증가.
pub fn record_http_response(method: &str, path: &str, status: u16) {
    counter!(
        "http_responses_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// HTTP 요청 처리 시간 기록.
pub fn record_http_duration(method: &str, path: &str, duration_secs: f64) {
    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_secs);
}

// ============================================================================
// 접근 제어 메트릭
// ============================================================================

/// 인증/인가 거부 카운터 증가.
///
/// `kind`는 내부 사유(`missing_credential`, `ACCOUNT_DISABLED` 등)이며
/// 응답에는 노출되지 않습니다.
pub fn record_auth_rejection(kind: &str) {
    counter!("auth_rejections_total", "kind" => kind.to_string()).increment(1);
}

/// 계정 생명주기 전이 카운터 증가.
pub fn record_account_transition(operation: &str) {
    counter!("account_transitions_total", "operation" => operation.to_string()).increment(1);
}

// ============================================================================
// 경로 정규화
// ============================================================================

/// 경로의 동적 세그먼트를 정규화합니다.
///
/// UUID와 숫자로만 된 세그먼트는 `:id`로 바뀝니다.
/// 예: `/api/v1/leads/123e4567-e89b-12d3-a456-426614174000` → `/api/v1/leads/:id`
///
/// 채팅 스레드 경로의 전화번호도 숫자 세그먼트이므로 함께 정규화되어
/// 라벨 카디널리티가 제한됩니다.
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            let is_uuid = uuid::Uuid::parse_str(segment).is_ok();
            let digits = segment.trim_start_matches('+');
            let is_numeric = !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit());

            if is_uuid || is_numeric {
                ":id"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_uuid() {
        let path = "/api/v1/leads/123e4567-e89b-12d3-a456-426614174000";
        assert_eq!(normalize_path(path), "/api/v1/leads/:id");
    }

    #[test]
    fn test_normalize_path_phone() {
        assert_eq!(normalize_path("/api/v1/chats/917060175427"), "/api/v1/chats/:id");
        assert_eq!(
            normalize_path("/api/v1/chats/read/+917060175427"),
            "/api/v1/chats/read/:id"
        );
    }

    #[test]
    fn test_normalize_path_no_params() {
        assert_eq!(normalize_path("/api/v1/leads/stats"), "/api/v1/leads/stats");
        assert_eq!(normalize_path("/"), "/");
    }
}
