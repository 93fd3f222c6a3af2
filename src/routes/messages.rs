//! # 메시지 API 라우트 핸들러
//!
//! | 메서드 | 경로 | 핸들러 |
//! |--------|------|--------|
//! | POST | /api/chat/message | `send_chat_message` |

use crate::{
    error::AppError,
    models::SendMessageRequest,
    routes::{parse_optional_json, AppState},
    services::chat,
};
use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

/// 메시지를 보냅니다.
///
/// `POST /api/chat/message` + `{ "session_id": "...", "content": "...", "message_type": "user" }`
/// → `201 { "success": true, "message": {...}, "bot_response": "..." | null }`
///
/// `message_type`을 생략하면 user로 처리되고, user 메시지에는 자동 응답이 함께 저장됩니다.
/// 본문이 비어 있으면 필수 필드 누락과 같은 400을 반환합니다.
pub async fn send_chat_message(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let req: SendMessageRequest = parse_optional_json(&body)?;
    let exchange = chat::send_message(state.store.as_ref(), &state.responder, &req).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": exchange.message,
            "bot_response": exchange.bot_response
        })),
    ))
}
