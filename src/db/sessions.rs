//! # 채팅 세션 데이터베이스 쿼리 모듈
//!
//! 채팅 세션의 생성, 조회, 종료, 집계를 담당하는 SQL 쿼리 함수들입니다.
//!
//! ## 세션 라이프사이클
//! ```text
//! [생성] insert_session() → active(ended_at = NULL) → end_session() → ended
//! ```
//!
//! 세션 조회 결과에는 항상 `message_count`(현재 메시지 수)가 함께 계산되어 들어갑니다.

use super::now_timestamp;
use crate::error::AppError;
use crate::models::{ChatSession, NewSession, SessionStats};
use sqlx::SqlitePool;

/// 세션 한 행 + 메시지 수를 조회하는 SELECT 절
///
/// `message_count`는 컬럼이 아니라 상관 서브쿼리로 계산합니다.
const SELECT_SESSION: &str = r#"
    SELECT s.id, s.session_id, s.user_ip, s.user_agent, s.started_at, s.ended_at,
           s.status, s.satisfaction_rating,
           (SELECT COUNT(*) FROM chat_messages m WHERE m.session_id = s.session_id) AS message_count
    FROM chat_sessions s
"#;

/// 새 채팅 세션을 저장합니다.
///
/// `started_at`은 현재 UTC 시각, `status`는 테이블 기본값('active')이 들어갑니다.
/// 단일 INSERT이므로 실패하면 아무 행도 남지 않습니다.
pub async fn insert_session(pool: &SqlitePool, new: &NewSession) -> Result<ChatSession, AppError> {
    sqlx::query(
        r#"
        INSERT INTO chat_sessions (session_id, user_ip, user_agent, started_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&new.session_id)
    .bind(new.user_ip.as_deref()) // None이면 SQL NULL
    .bind(new.user_agent.as_deref())
    .bind(now_timestamp())
    .execute(pool)
    .await?;

    // 생성 직후 조회하여 DB 기본값(status 등)이 포함된 완전한 객체를 반환
    get_session(pool, &new.session_id)
        .await?
        .ok_or(AppError::Internal(
            "Failed to retrieve created chat session".to_string(),
        ))
}

/// 세션 토큰으로 세션 하나를 조회합니다.
///
/// 존재하면 `Some(ChatSession)`, 없으면 `None`을 반환합니다.
pub async fn get_session(
    pool: &SqlitePool,
    session_id: &str,
) -> Result<Option<ChatSession>, AppError> {
    let sql = format!("{SELECT_SESSION} WHERE s.session_id = ?");
    let session = sqlx::query_as::<_, ChatSession>(&sql)
        .bind(session_id)
        .fetch_optional(pool)
        .await?;

    Ok(session)
}

/// 세션을 종료 상태로 바꿉니다.
///
/// `ended_at`을 현재 시각으로, `status`를 'ended'로 설정합니다.
/// `rating`이 Some이면 만족도도 함께 기록하고, None이면 기존 값을 유지합니다
/// (`COALESCE(?, satisfaction_rating)`). 범위 검사는 호출하는 쪽의 책임입니다.
///
/// 이미 종료된 세션이어도 막지 않습니다. 종료 시각만 다시 찍힙니다.
///
/// ## 반환값
/// - `Ok(Some(ChatSession))`: 종료 성공, 갱신된 세션 반환
/// - `Ok(None)`: 해당 토큰의 세션이 존재하지 않음
pub async fn end_session(
    pool: &SqlitePool,
    session_id: &str,
    rating: Option<i64>,
) -> Result<Option<ChatSession>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE chat_sessions
        SET ended_at = ?,
            status = 'ended',
            satisfaction_rating = COALESCE(?, satisfaction_rating)
        WHERE session_id = ?
        "#,
    )
    .bind(now_timestamp())
    .bind(rating)
    .bind(session_id)
    .execute(pool)
    .await?;

    // 갱신된 행이 없으면 존재하지 않는 세션
    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_session(pool, session_id).await
}

/// 세션을 삭제합니다. 소속 메시지는 외래키의 `ON DELETE CASCADE`로 함께 삭제됩니다.
///
/// 일반 요청 흐름에서는 호출되지 않습니다 (세션은 종료될 뿐 삭제되지 않음).
pub async fn delete_session(pool: &SqlitePool, session_id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM chat_sessions WHERE session_id = ?")
        .bind(session_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// 세션 테이블 전체를 한 번에 집계합니다.
///
/// - `COUNT(satisfaction_rating)`: NULL이 아닌 평가 개수
/// - `AVG(satisfaction_rating)`: 평가가 없으면 NULL → `average_rating = None`
pub async fn session_stats(pool: &SqlitePool) -> Result<SessionStats, AppError> {
    let stats = sqlx::query_as::<_, SessionStats>(
        r#"
        SELECT COUNT(*) AS total_sessions,
               COALESCE(SUM(CASE WHEN status = 'active' THEN 1 ELSE 0 END), 0) AS active_sessions,
               COUNT(satisfaction_rating) AS total_ratings,
               AVG(satisfaction_rating) AS average_rating
        FROM chat_sessions
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(stats)
}
