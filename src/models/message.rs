//! # 채팅 메시지 모델 정의
//!
//! 세션 안에서 오가는 메시지 한 건을 표현합니다.
//! 메시지는 생성 후 수정되지 않으며, 세션 내에서 timestamp 오름차순으로 정렬됩니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 메시지 작성자 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum MessageType {
    /// 고객이 보낸 메시지: 자동 응답을 유발합니다
    User,
    /// 자동 응답 봇의 메시지
    Bot,
    /// 시스템 안내 메시지
    System,
}

impl MessageType {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageType::User => "user",
            MessageType::Bot => "bot",
            MessageType::System => "system",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(MessageType::User),
            "bot" => Ok(MessageType::Bot),
            "system" => Ok(MessageType::System),
            other => Err(format!("message_type inválido: {other}")),
        }
    }
}

/// 채팅 메시지 엔티티: `chat_messages` 테이블 한 행에 대응합니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatMessage {
    /// 정수 기본키. 같은 timestamp끼리는 이 값(삽입 순서)으로 정렬합니다.
    pub id: i64,
    /// 소속 세션 토큰 (외래키)
    pub session_id: String,
    pub message_type: MessageType,
    pub content: String,
    /// 작성 시각 (RFC 3339, UTC)
    pub timestamp: String,
    /// 응답 시간(초). 봇 메시지에만 기록됩니다.
    pub response_time: Option<f64>,
}

/// 저장할 메시지 한 건
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub session_id: String,
    pub message_type: MessageType,
    pub content: String,
    pub response_time: Option<f64>,
}

/// 메시지 전송 요청: `POST /api/chat/message`의 요청 본문
///
/// 필수 필드도 Option으로 받습니다. 누락 시 serde 파싱 에러 대신
/// 서비스 계층에서 `BadRequest`를 만들어 일관된 JSON 에러를 돌려주기 위해서입니다.
/// `message_type`도 문자열로 받아 직접 파싱합니다.
#[derive(Debug, Default, Deserialize)]
pub struct SendMessageRequest {
    pub session_id: Option<String>,
    pub content: Option<String>,
    pub message_type: Option<String>,
}
