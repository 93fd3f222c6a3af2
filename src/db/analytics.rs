//! # 일자별 통계 스냅샷 쿼리 모듈
//!
//! 하루 단위 집계(`daily_figures`)와 `chat_analytics` 테이블의 저장/조회를 담당합니다.

use crate::error::AppError;
use crate::models::{ChatAnalytics, DailyFigures, NewSnapshot};
use sqlx::SqlitePool;

/// `[start, end)` 구간에 대한 하루치 집계를 계산합니다.
///
/// - 세션 관련 값은 `started_at`이 구간 안에 있는 세션 기준
/// - 메시지 관련 값은 `timestamp`가 구간 안에 있는 메시지 기준
///
/// 세션 지속 시간은 SQLite의 `julianday()`(일 단위 실수) 차이에 1440을 곱해 분으로 환산합니다.
/// RFC 3339 문자열의 끝 'Z'는 julianday가 UTC 표기로 받아들입니다.
pub async fn daily_figures(
    pool: &SqlitePool,
    start: &str,
    end: &str,
) -> Result<DailyFigures, AppError> {
    let figures = sqlx::query_as::<_, DailyFigures>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM chat_sessions
              WHERE started_at >= ?1 AND started_at < ?2) AS total_sessions,
            (SELECT COUNT(*) FROM chat_messages
              WHERE timestamp >= ?1 AND timestamp < ?2) AS total_messages,
            (SELECT AVG((julianday(ended_at) - julianday(started_at)) * 1440.0)
               FROM chat_sessions
              WHERE started_at >= ?1 AND started_at < ?2
                AND ended_at IS NOT NULL) AS avg_session_duration,
            (SELECT AVG(response_time) FROM chat_messages
              WHERE message_type = 'bot' AND response_time IS NOT NULL
                AND timestamp >= ?1 AND timestamp < ?2) AS avg_response_time,
            (SELECT AVG(satisfaction_rating) FROM chat_sessions
              WHERE started_at >= ?1 AND started_at < ?2
                AND satisfaction_rating IS NOT NULL) AS satisfaction_avg
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?;

    Ok(figures)
}

/// 날짜를 키로 스냅샷을 저장합니다. 같은 날짜의 행이 있으면 덮어씁니다.
///
/// `ON CONFLICT(date) DO UPDATE`: SQLite의 UPSERT 문법입니다.
/// `excluded.컬럼`은 INSERT하려던 값을 가리킵니다.
pub async fn upsert_snapshot(
    pool: &SqlitePool,
    snapshot: &NewSnapshot,
) -> Result<ChatAnalytics, AppError> {
    let saved = sqlx::query_as::<_, ChatAnalytics>(
        r#"
        INSERT INTO chat_analytics
            (date, total_sessions, total_messages, avg_session_duration,
             avg_response_time, satisfaction_avg, common_issues)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(date) DO UPDATE SET
            total_sessions = excluded.total_sessions,
            total_messages = excluded.total_messages,
            avg_session_duration = excluded.avg_session_duration,
            avg_response_time = excluded.avg_response_time,
            satisfaction_avg = excluded.satisfaction_avg,
            common_issues = excluded.common_issues
        RETURNING id, date, total_sessions, total_messages, avg_session_duration,
                  avg_response_time, satisfaction_avg, common_issues
        "#,
    )
    .bind(&snapshot.date)
    .bind(snapshot.total_sessions)
    .bind(snapshot.total_messages)
    .bind(snapshot.avg_session_duration)
    .bind(snapshot.avg_response_time)
    .bind(snapshot.satisfaction_avg)
    .bind(snapshot.common_issues.as_deref())
    .fetch_one(pool)
    .await?;

    Ok(saved)
}

/// 모든 스냅샷을 최신 날짜부터 조회합니다.
pub async fn list_snapshots(pool: &SqlitePool) -> Result<Vec<ChatAnalytics>, AppError> {
    let snapshots = sqlx::query_as::<_, ChatAnalytics>(
        r#"
        SELECT id, date, total_sessions, total_messages, avg_session_duration,
               avg_response_time, satisfaction_avg, common_issues
        FROM chat_analytics
        ORDER BY date DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(snapshots)
}
