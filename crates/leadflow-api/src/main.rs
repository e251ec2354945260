//! LeadFlow API 서버 진입점.

use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, middleware, routing::get, Router};
use leadflow_api::auth::JwtTokenService;
use leadflow_api::metrics::setup_metrics_recorder;
use leadflow_api::middleware::metrics_layer;
use leadflow_api::openapi::swagger_ui_router;
use leadflow_api::repository::{run_migrations, PgAccountStore};
use leadflow_api::routes::create_api_router;
use leadflow_api::state::AppState;
use leadflow_core::{init_logging, AppConfig};
use metrics_exporter_prometheus::PrometheusHandle;
use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// CORS 레이어 생성.
///
/// `cors.origins`가 비어 있으면 모든 origin을 허용합니다 (개발 모드).
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors
        .origins
        .iter()
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    let restricted = !origins.is_empty();
    let allow_origin = if restricted {
        info!("CORS configured with {} allowed origins", origins.len());
        AllowOrigin::list(origins)
    } else {
        if !config.cors.origins.is_empty() {
            warn!("cors.origins contains no valid origins, allowing any");
        } else {
            warn!("cors.origins not set, allowing any origin (development mode)");
        }
        AllowOrigin::any()
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        // 와일드카드 origin과 credentials는 함께 쓸 수 없음
        .allow_credentials(restricted)
        .max_age(Duration::from_secs(3600))
}

/// /metrics 엔드포인트 핸들러.
async fn metrics_handler(
    axum::extract::State(handle): axum::extract::State<PrometheusHandle>,
) -> String {
    handle.render()
}

/// 전체 라우터 생성.
fn create_router(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let request_timeout = Duration::from_secs(state.config.server.request_timeout_secs);
    let cors = cors_layer(&state.config);

    // 메트릭 라우터 (별도 상태)
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics_handle);

    Router::new()
        .merge(metrics_router)
        .merge(create_api_router(state))
        // OpenAPI 문서 및 Swagger UI
        .merge(swagger_ui_router())
        // 메트릭 미들웨어 (모든 요청에 적용)
        .layer(middleware::from_fn(metrics_layer))
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(cors)
}

/// OpenAPI 스펙 내보내기 처리.
///
/// `--export-openapi` 플래그가 있으면 스펙을 stdout으로 출력하고 종료합니다.
fn handle_export_openapi() -> Result<(), Box<dyn std::error::Error>> {
    use leadflow_api::openapi::ApiDoc;
    use utoipa::OpenApi as _;

    if std::env::args().any(|arg| arg == "--export-openapi") {
        let json = serde_json::to_string_pretty(&ApiDoc::openapi())?;
        println!("{}", json);
        std::process::exit(0);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    handle_export_openapi()?;

    let config = AppConfig::load_default()?;
    init_logging(config.logging.to_log_config()).map_err(|e| e.to_string())?;

    info!("Starting LeadFlow API server...");

    let metrics_handle = setup_metrics_recorder()?;
    info!("Prometheus metrics recorder initialized");

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .connect(&config.database.url)
        .await
        .map_err(|e| {
            error!(error = %e, "데이터베이스 연결 실패. LEADFLOW__DATABASE__URL을 확인하세요.");
            e
        })?;
    info!("Database connected");

    run_migrations(&pool).await?;

    let secret = SecretString::from(config.auth.effective_secret());
    let tokens = JwtTokenService::new(&secret, config.auth.token_ttl_minutes);
    let accounts = Arc::new(PgAccountStore::new(pool.clone()));

    let addr = config.server.bind_addr();
    let state = Arc::new(AppState::new(accounts, tokens, config).with_db_pool(pool));
    info!(version = %state.version, "Application state initialized");

    let app = create_router(state, metrics_handle);

    info!(%addr, "API server listening");
    info!("Swagger UI available at http://{}/swagger-ui", addr);
    info!("Metrics available at http://{}/metrics", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let shutdown_token = CancellationToken::new();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_token.clone()))
        .await?;

    info!("Server stopped gracefully");
    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 종료 토큰을 취소합니다.
async fn shutdown_signal(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    shutdown_token.cancel();
}
