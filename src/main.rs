//! # 고객 지원 채팅 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 연결 풀 생성 + 마이그레이션
//! 4. 애플리케이션 상태(저장소, 자동 응답기) 구성
//! 5. 라우터 구성 및 HTTP 서버 시작

use anyhow::Result;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use suporte_chat::{
    build_router,
    config::Config,
    db::{self, SqliteChatStore},
    routes::AppState,
    services::responder::CannedResponder,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅 초기화 ──
    // RUST_LOG가 없으면 이 크레이트, tower_http, axum을 debug 레벨로 출력합니다.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "suporte_chat=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 로딩 ──
    let config = Config::from_env();
    tracing::info!("Starting chat server on {}:{}", config.host, config.port);

    // SQLITE_PATH 방식이면 DB 파일의 부모 디렉토리를 먼저 만들어 둡니다.
    if let Some(parent) = config.sqlite_path.as_deref().and_then(Path::parent) {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            tokio::fs::create_dir_all(parent).await?;
            tracing::info!("Created database directory: {}", parent.display());
        }
    }

    // ── 4단계: SQLite 연결 풀 + 마이그레이션 ──
    tracing::info!("Connecting to database and running migrations...");
    let pool = db::connect(&config.database_url, 5).await?;

    // ── 5단계: 애플리케이션 상태 ──
    // 시드가 설정되어 있으면 자동 응답 순서를 재현할 수 있습니다 (데모용).
    let responder = match config.responder_seed {
        Some(seed) => {
            tracing::info!(seed, "Using fixed responder seed");
            CannedResponder::with_seed(seed)
        }
        None => CannedResponder::new(),
    };
    let state = AppState::new(Arc::new(SqliteChatStore::new(pool)), responder);

    // ── 6단계: 라우터 구성 ──
    let static_dir = Path::new(&config.static_dir);
    let app = if static_dir.is_dir() {
        build_router(state, Some(static_dir))
    } else {
        tracing::warn!("Static directory {} not found, serving API only", config.static_dir);
        build_router(state, None)
    };

    // ── 7단계: 서버 시작 ──
    // into_make_service_with_connect_info: 핸들러에서 클라이언트 주소(ConnectInfo)를 읽을 수 있게 합니다.
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
