//! # 고객 지원 채팅 백엔드
//!
//! 채팅 세션과 메시지를 SQLite에 기록하고, 키워드 기반 자동 응답과
//! 간단한 통계를 JSON API로 제공합니다.
//!
//! 계층 구조:
//! ```text
//! routes (HTTP 핸들러) → services (비즈니스 규칙) → db::ChatStore (저장소 포트) → SQLite
//! ```
//!
//! 라우터 구성(`build_router`)을 라이브러리에 두어 `main.rs`와 통합 테스트가 같은 라우터를 씁니다.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use axum::{
    routing::{get, post},
    Router,
};
use routes::*;
use std::path::Path;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

/// API 라우트만 담은 라우터 (`/api` 아래에 중첩되기 전)
///
/// axum 0.8부터 경로 파라미터는 `{id}` 문법을 씁니다.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        // 세션
        .route("/chat/session", post(create_chat_session))
        .route("/chat/session/{id}/messages", get(get_session_messages))
        .route("/chat/session/{id}/end", post(end_chat_session))
        // 메시지
        .route("/chat/message", post(send_chat_message))
        // 통계
        .route("/chat/analytics", get(get_chat_analytics))
        .route("/chat/analytics/snapshot", post(create_analytics_snapshot))
        .route("/chat/analytics/snapshots", get(list_analytics_snapshots))
        .route("/health", get(health_check))
        .with_state(state)
}

/// 전체 애플리케이션 라우터를 만듭니다.
///
/// - API는 `/api` 아래에 둡니다.
/// - `static_dir`이 있으면 API에 매칭되지 않는 경로를 정적 파일로 서빙하고,
///   파일이 없으면 index.html을 돌려줍니다 (SPA 라우팅).
/// - CORS는 모든 출처를 허용합니다.
pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new().nest("/api", api_router(state));

    let router = match static_dir {
        Some(dir) => {
            tracing::info!("Serving static files from {}", dir.display());
            let serve_dir =
                ServeDir::new(dir).not_found_service(ServeFile::new(dir.join("index.html")));
            router.fallback_service(serve_dir)
        }
        None => router,
    };

    router.layer(cors).layer(TraceLayer::new_for_http())
}
