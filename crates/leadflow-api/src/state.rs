//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 `Arc`로 래핑되어 요청 간에 공유됩니다. 요청 간에 공유되는
//! 가변 상태는 없으며, 계정은 매 요청마다 저장소에서 다시 읽습니다.

use std::sync::Arc;

use leadflow_core::{AccountLifecycle, AccountStore, AppConfig};
use sqlx::PgPool;

use crate::auth::JwtTokenService;
use crate::error::ApiError;

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 계정 저장소 - 인증 게이트와 계정 생명주기가 사용
    pub accounts: Arc<dyn AccountStore>,

    /// 토큰 발급/검증
    pub tokens: Arc<JwtTokenService>,

    /// 데이터베이스 연결 풀 (리드/채팅/통화)
    pub db_pool: Option<PgPool>,

    /// 애플리케이션 설정
    pub config: Arc<AppConfig>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        tokens: JwtTokenService,
        config: AppConfig,
    ) -> Self {
        Self {
            accounts,
            tokens: Arc::new(tokens),
            db_pool: None,
            config: Arc::new(config),
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 데이터베이스 풀 설정.
    pub fn with_db_pool(mut self, pool: PgPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// 계정 생명주기 서비스.
    pub fn lifecycle(&self) -> AccountLifecycle {
        AccountLifecycle::new(self.accounts.clone())
    }

    /// 데이터베이스 풀. 설정되지 않았으면 내부 에러입니다.
    pub fn pool(&self) -> Result<&PgPool, ApiError> {
        self.db_pool
            .as_ref()
            .ok_or_else(|| ApiError::internal("database pool not configured"))
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        (chrono::Utc::now() - self.started_at).num_seconds()
    }

    /// 데이터베이스 연결 상태 확인.
    pub async fn is_db_healthy(&self) -> bool {
        match &self.db_pool {
            Some(pool) => sqlx::query("SELECT 1").execute(pool).await.is_ok(),
            None => false,
        }
    }
}

/// 테스트용 AppState 생성.
///
/// 인메모리 계정 저장소를 사용하며, 저장소 핸들을 함께 반환하므로
/// 테스트에서 계정을 직접 심거나 장애를 주입할 수 있습니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> (Arc<AppState>, Arc<leadflow_core::InMemoryAccountStore>) {
    use leadflow_core::InMemoryAccountStore;
    use secrecy::SecretString;

    let store = Arc::new(InMemoryAccountStore::new());
    let tokens = JwtTokenService::new(
        &SecretString::from("test-secret-key-for-router-testing-32+".to_string()),
        60,
    );

    let state = AppState::new(store.clone(), tokens, AppConfig::default());
    (Arc::new(state), store)
}
