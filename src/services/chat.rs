//! # 채팅 세션/메시지 서비스
//!
//! 세션 생성·종료와 메시지 교환의 비즈니스 규칙을 담당합니다.
//! 저장소는 `&dyn ChatStore`로, 자동 응답기는 `&CannedResponder`로 주입받습니다.

use crate::db::ChatStore;
use crate::error::AppError;
use crate::models::*;
use crate::services::responder::CannedResponder;

/// 봇 메시지에 기록하는 응답 시간(초). 실제 측정값이 아닌 고정값입니다.
pub const SIMULATED_RESPONSE_TIME: f64 = 1.5;

/// 만족도 평가의 허용 범위
pub const RATING_RANGE: std::ops::RangeInclusive<i64> = 1..=5;

/// 메시지 전송 결과
#[derive(Debug, Clone)]
pub struct MessageExchange {
    /// 저장된 원본 메시지
    pub message: ChatMessage,
    /// 고객 메시지였다면 함께 저장된 봇 응답 텍스트
    pub bot_response: Option<String>,
}

/// 새 채팅 세션을 만듭니다.
///
/// 토큰은 UUID v4(128비트 난수)로 생성하므로 충돌 가능성은 무시할 수 있습니다.
pub async fn create_session(
    store: &dyn ChatStore,
    client: &ClientInfo,
) -> Result<ChatSession, AppError> {
    let new = NewSession {
        session_id: uuid::Uuid::new_v4().to_string(),
        user_ip: client.ip.clone(),
        user_agent: client.user_agent.clone(),
    };

    let session = store.insert_session(&new).await?;
    tracing::info!(session_id = %session.session_id, "chat session created");
    Ok(session)
}

/// 세션을 종료합니다.
///
/// - 1~5 범위의 평가만 저장하고, 범위를 벗어난 값은 조용히 무시합니다.
/// - 이미 종료된 세션도 다시 종료할 수 있으며, 이때는 종료 시각만 새로 찍힙니다.
pub async fn end_session(
    store: &dyn ChatStore,
    session_id: &str,
    rating: Option<i64>,
) -> Result<ChatSession, AppError> {
    let accepted = rating.filter(|r| RATING_RANGE.contains(r));
    if rating.is_some() && accepted.is_none() {
        tracing::debug!(session_id, ?rating, "ignoring out-of-range satisfaction rating");
    }

    let session = store
        .end_session(session_id, accepted)
        .await?
        .ok_or(AppError::SessionNotFound)?;

    tracing::info!(session_id, rating = ?session.satisfaction_rating, "chat session ended");
    Ok(session)
}

/// 메시지를 세션에 추가합니다.
///
/// ## 처리 흐름
/// 1. `session_id`, `content`가 비어 있으면 `BadRequest`
/// 2. `message_type`이 user/bot/system이 아니면 `BadRequest` (생략 시 user)
/// 3. 세션이 없으면 `SessionNotFound`: 이 경우 어떤 행도 쓰지 않습니다
/// 4. user 메시지면 자동 응답을 만들어 두 메시지를 한 트랜잭션으로 저장
pub async fn send_message(
    store: &dyn ChatStore,
    responder: &CannedResponder,
    req: &SendMessageRequest,
) -> Result<MessageExchange, AppError> {
    let session_id = non_blank(req.session_id.as_deref());
    let content = non_blank(req.content.as_deref());
    let (Some(session_id), Some(content)) = (session_id, content) else {
        return Err(AppError::BadRequest(
            "session_id e content são obrigatórios".to_string(),
        ));
    };

    let message_type = match req.message_type.as_deref() {
        None => MessageType::User,
        Some(raw) => raw.parse::<MessageType>().map_err(AppError::BadRequest)?,
    };

    if store.find_session(session_id).await?.is_none() {
        return Err(AppError::SessionNotFound);
    }

    let mut batch = vec![NewMessage {
        session_id: session_id.to_string(),
        message_type,
        content: content.to_string(),
        response_time: None,
    }];

    let bot_response = if message_type == MessageType::User {
        let reply = responder.respond(content);
        batch.push(NewMessage {
            session_id: session_id.to_string(),
            message_type: MessageType::Bot,
            content: reply.to_string(),
            response_time: Some(SIMULATED_RESPONSE_TIME),
        });
        Some(reply.to_string())
    } else {
        None
    };

    let mut saved = store.insert_messages(&batch).await?.into_iter();
    let message = saved
        .next()
        .ok_or_else(|| AppError::Internal("message batch returned no rows".to_string()))?;
    tracing::debug!(
        session_id,
        message_type = %message_type,
        replied = bot_response.is_some(),
        "chat message stored"
    );

    Ok(MessageExchange {
        message,
        bot_response,
    })
}

/// 세션 요약과 전체 메시지(시간순)를 조회합니다.
pub async fn get_messages(
    store: &dyn ChatStore,
    session_id: &str,
) -> Result<(ChatSession, Vec<ChatMessage>), AppError> {
    let session = store
        .find_session(session_id)
        .await?
        .ok_or(AppError::SessionNotFound)?;
    let messages = store.list_messages(session_id).await?;
    Ok((session, messages))
}

/// 공백만 있는 문자열도 누락으로 취급합니다.
/// 저장은 원문 그대로 하므로, 앞뒤 공백을 잘라낸 값이 아니라 원래 값을 돌려줍니다.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
