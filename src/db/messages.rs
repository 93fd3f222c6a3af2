//! # 채팅 메시지 데이터베이스 쿼리 모듈
//!
//! 메시지 저장과 조회를 담당합니다.
//! 메시지는 생성 후 수정하지 않으므로 UPDATE 쿼리는 없습니다.

use super::now_timestamp;
use crate::error::AppError;
use crate::models::{ChatMessage, NewMessage};
use sqlx::SqlitePool;

/// 여러 메시지를 하나의 트랜잭션으로 저장하고, 저장된 행들을 입력 순서대로 반환합니다.
///
/// 고객 메시지와 봇 응답처럼 함께 저장되어야 하는 메시지 묶음에 사용합니다.
/// 중간에 실패하면 `?`로 빠져나가면서 `tx`가 커밋 없이 drop되어 전체가 롤백됩니다.
/// 따라서 "고객 메시지만 저장되고 응답은 없는" 상태는 생기지 않습니다.
///
/// 각 메시지의 timestamp는 INSERT 직전에 찍으므로, 같은 묶음 안에서도
/// 뒤의 메시지가 앞의 메시지보다 이르지 않습니다.
pub async fn insert_messages(
    pool: &SqlitePool,
    messages: &[NewMessage],
) -> Result<Vec<ChatMessage>, AppError> {
    let mut tx = pool.begin().await?;
    let mut saved = Vec::with_capacity(messages.len());

    for message in messages {
        // RETURNING: INSERT한 행을 바로 돌려받아 추가 SELECT 없이 구조체로 매핑합니다.
        let row = sqlx::query_as::<_, ChatMessage>(
            r#"
            INSERT INTO chat_messages (session_id, message_type, content, timestamp, response_time)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, session_id, message_type, content, timestamp, response_time
            "#,
        )
        .bind(&message.session_id)
        .bind(message.message_type.as_str())
        .bind(&message.content)
        .bind(now_timestamp())
        .bind(message.response_time)
        .fetch_one(&mut *tx)
        .await?;

        saved.push(row);
    }

    tx.commit().await?;
    Ok(saved)
}

/// 세션의 모든 메시지를 시간순으로 조회합니다.
///
/// timestamp가 같으면 id(삽입 순서)로 정렬하여 항상 같은 순서를 보장합니다.
pub async fn list_messages(
    pool: &SqlitePool,
    session_id: &str,
) -> Result<Vec<ChatMessage>, AppError> {
    let messages = sqlx::query_as::<_, ChatMessage>(
        r#"
        SELECT id, session_id, message_type, content, timestamp, response_time
        FROM chat_messages
        WHERE session_id = ?
        ORDER BY timestamp ASC, id ASC
        "#,
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;

    Ok(messages)
}

/// 전체 메시지 수
pub async fn count_messages(pool: &SqlitePool) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM chat_messages")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// 기간 내 고객(user) 메시지의 본문만 조회합니다.
///
/// - `since`: 이 시각 이후(포함)
/// - `until`: Some이면 이 시각 이전(미포함), None이면 상한 없음
///
/// timestamp는 고정 폭 RFC 3339 문자열이라 문자열 비교가 곧 시간 비교입니다.
pub async fn user_message_contents(
    pool: &SqlitePool,
    since: &str,
    until: Option<&str>,
) -> Result<Vec<String>, AppError> {
    let contents = sqlx::query_scalar::<_, String>(
        r#"
        SELECT content
        FROM chat_messages
        WHERE message_type = 'user'
          AND timestamp >= ?
          AND (? IS NULL OR timestamp < ?)
        ORDER BY timestamp ASC, id ASC
        "#,
    )
    .bind(since)
    .bind(until)
    .bind(until)
    .fetch_all(pool)
    .await?;

    Ok(contents)
}
