//! # 헬스체크(Health Check) 핸들러
//!
//! ## 엔드포인트
//! - `GET /api/health` → `200 { "status": "ok", "database": "ok" }`
//!
//! 저장소에 간단한 쿼리를 보내 DB 연결까지 확인합니다.
//! DB에 닿지 않으면 `503 { "status": "degraded", "database": "unavailable" }`를 반환하여
//! 로드밸런서가 이 인스턴스를 트래픽에서 빼도록 합니다.

use crate::routes::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

/// `GET /api/health`: 서버와 DB 상태를 확인합니다.
///
/// 실패해도 `AppError`를 쓰지 않습니다. 헬스체크 응답 형식은 다른 API와 다르기 때문입니다.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "database": "ok" })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check could not reach the database");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": "unavailable" })),
            )
        }
    }
}
