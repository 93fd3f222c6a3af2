//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//! 핸들러는 요청을 파싱해 서비스 계층(`services`)을 호출하고, 결과를 JSON으로 돌려줄 뿐입니다.
//!
//! 각 하위 모듈:
//! - `sessions`: 세션 생성, 메시지 목록, 세션 종료
//! - `messages`: 메시지 전송 (자동 응답 포함)
//! - `analytics`: 실시간 통계, 일자별 스냅샷
//! - `health`: 서버/DB 상태 확인

pub mod analytics;
pub mod health;
pub mod messages;
pub mod sessions;

pub use analytics::*;
pub use health::*;
pub use messages::*;
pub use sessions::*;

use crate::db::ChatStore;
use crate::error::AppError;
use crate::services::responder::CannedResponder;
use axum::body::Bytes;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// 저장소와 자동 응답기를 트레이트 객체/Arc로 들고 있어서 clone 비용이 작고,
/// 테스트에서는 다른 구현으로 바꿔 끼울 수 있습니다.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ChatStore>,
    pub responder: Arc<CannedResponder>,
}

impl AppState {
    pub fn new(store: Arc<dyn ChatStore>, responder: CannedResponder) -> Self {
        Self {
            store,
            responder: Arc::new(responder),
        }
    }
}

/// 선택적인 JSON 본문을 파싱합니다.
///
/// - 본문이 비어 있으면(공백 포함) `T::default()`
/// - JSON이 아니거나 필드 타입이 맞지 않으면 `BadRequest`
///
/// axum의 `Json` 추출자는 Content-Type이 없거나 본문이 잘못되면
/// 일반 텍스트 에러를 돌려주므로, 원시 바이트를 받아 직접 파싱합니다.
/// 이렇게 해야 모든 에러가 `{ "success": false, ... }` 형태로 통일됩니다.
pub fn parse_optional_json<T>(body: &Bytes) -> Result<T, AppError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("JSON inválido: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EndSessionRequest;

    #[test]
    fn empty_body_uses_default() {
        let req: EndSessionRequest = parse_optional_json(&Bytes::from_static(b"  ")).unwrap();
        assert!(req.satisfaction_rating.is_none());
    }

    #[test]
    fn malformed_body_is_bad_request() {
        let err = parse_optional_json::<EndSessionRequest>(&Bytes::from_static(b"{oops")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = parse_optional_json::<EndSessionRequest>(&Bytes::from_static(
            br#"{"satisfaction_rating": "cinco"}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
