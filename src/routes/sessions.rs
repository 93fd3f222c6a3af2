//! # 채팅 세션 API 라우트 핸들러
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | POST | /api/chat/session | `create_chat_session` | 새 세션 시작 |
//! | GET | /api/chat/session/{id}/messages | `get_session_messages` | 세션 요약 + 메시지 목록 |
//! | POST | /api/chat/session/{id}/end | `end_chat_session` | 세션 종료 (만족도 평가 선택) |
//!
//! ## 세션 사용 흐름
//! ```text
//! 1. 채팅 위젯 열기 → POST /chat/session (session_id 발급)
//! 2. 대화 진행 → POST /chat/message (messages.rs)
//! 3. 대화 종료 → POST /chat/session/{id}/end + { "satisfaction_rating": 5 }
//! ```

use crate::{
    error::AppError,
    models::*,
    routes::{parse_optional_json, AppState},
    services::chat,
};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

/// 새 채팅 세션을 시작합니다.
///
/// `POST /api/chat/session` → `201 { "success": true, "session_id": "...", "message": "..." }`
///
/// 요청 본문은 사용하지 않지만, 비어 있지 않다면 JSON이어야 합니다 (아니면 400).
/// 클라이언트 주소와 User-Agent는 `ClientInfo` 추출자가 요청에서 꺼내 줍니다.
pub async fn create_chat_session(
    State(state): State<AppState>,
    client: ClientInfo,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let _: Value = parse_optional_json(&body)?;
    let session = chat::create_session(state.store.as_ref(), &client).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "session_id": session.session_id,
            "message": "Sessão de chat criada com sucesso"
        })),
    ))
}

/// 세션 요약과 메시지 목록을 조회합니다.
///
/// `GET /api/chat/session/{id}/messages` → `{ "success": true, "session": {...}, "messages": [...] }`
///
/// 메시지는 timestamp 오름차순입니다.
pub async fn get_session_messages(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let (session, messages) = chat::get_messages(state.store.as_ref(), &session_id).await?;

    Ok(Json(json!({
        "success": true,
        "session": session,
        "messages": messages
    })))
}

/// 세션을 종료합니다.
///
/// `POST /api/chat/session/{id}/end` + `{ "satisfaction_rating": 1~5 }` (본문 선택)
///
/// 범위를 벗어난 평가(정수가 아니거나 i64보다 큰 수 포함)는 에러 없이 무시됩니다.
pub async fn end_chat_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let req: EndSessionRequest = parse_optional_json(&body)?;
    chat::end_session(state.store.as_ref(), &session_id, req.rating()).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Sessão finalizada com sucesso"
    })))
}
