//! # 통계 API 라우트 핸들러
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/chat/analytics | `get_chat_analytics` | 실시간 요약 통계 |
//! | POST | /api/chat/analytics/snapshot | `create_analytics_snapshot` | 일자별 스냅샷 생성/갱신 |
//! | GET | /api/chat/analytics/snapshots | `list_analytics_snapshots` | 스냅샷 목록 |

use crate::{
    error::AppError,
    models::SnapshotRequest,
    routes::{parse_optional_json, AppState},
    services::analytics,
};
use axum::{body::Bytes, extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

/// `GET /api/chat/analytics` → `{ "success": true, "analytics": {...} }`
///
/// 매 요청마다 원본 테이블에서 새로 계산합니다.
pub async fn get_chat_analytics(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let summary = analytics::get_analytics(state.store.as_ref(), Utc::now()).await?;

    Ok(Json(json!({
        "success": true,
        "analytics": summary
    })))
}

/// `POST /api/chat/analytics/snapshot` + `{ "date": "2026-10-18" }` (본문 선택)
///
/// 날짜를 생략하면 오늘(UTC) 스냅샷을 만듭니다. 같은 날짜는 덮어씁니다.
pub async fn create_analytics_snapshot(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let req: SnapshotRequest = parse_optional_json(&body)?;
    let date = match req.date.as_deref() {
        Some(raw) => analytics::parse_date(raw)?,
        None => Utc::now().date_naive(),
    };

    let snapshot = analytics::build_daily_snapshot(state.store.as_ref(), date).await?;
    Ok(Json(json!({
        "success": true,
        "snapshot": snapshot
    })))
}

pub async fn list_analytics_snapshots(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let snapshots = analytics::list_snapshots(state.store.as_ref()).await?;
    Ok(Json(json!({
        "success": true,
        "snapshots": snapshots
    })))
}
