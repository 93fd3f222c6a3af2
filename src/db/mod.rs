//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `sessions`: 채팅 세션 생성/조회/종료/집계 쿼리
//! - `messages`: 메시지 저장(트랜잭션)/조회 쿼리
//! - `analytics`: 일자별 통계 스냅샷 쿼리
//!
//! 서비스 계층은 하위 모듈의 함수를 직접 부르지 않고 `ChatStore` 트레이트(포트)를 통해
//! 저장소에 접근합니다. 핸들러에는 `AppState`를 통해 `Arc<dyn ChatStore>`가 주입되므로,
//! 테스트에서는 일부 동작을 바꾼 저장소로 갈아끼울 수 있습니다.

pub mod analytics;
pub mod messages;
pub mod sessions;

use crate::error::AppError;
use crate::models::*;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// 시각을 저장/응답용 문자열로 변환합니다.
///
/// 마이크로초 6자리 + 'Z'의 고정 폭 형식(`2026-10-18T12:00:00.000000Z`)이라
/// 문자열 정렬 순서와 시간 순서가 같습니다. 구간 조회는 이 성질에 의존합니다.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// 현재 UTC 시각을 `format_timestamp` 형식으로 반환합니다.
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// SQLite 연결 풀을 만들고 마이그레이션을 적용합니다.
///
/// `sqlx::migrate!`는 컴파일 타임에 ./migrations 폴더의 SQL 파일들을 바이너리에 포함시킵니다.
/// 외래키 제약(`PRAGMA foreign_keys`)은 sqlx가 연결마다 기본으로 켜 두므로
/// 세션 삭제 시 메시지가 함께 삭제됩니다.
///
/// `sqlite::memory:`는 연결마다 별도 DB가 생기므로 `max_connections`를 1로 줘야 합니다.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(pool)
}

/// 채팅 데이터 저장소 포트
///
/// 서비스 계층이 필요로 하는 저장소 기능만 모아 둔 트레이트입니다.
/// 모든 메서드는 단일 행 삽입/갱신이거나 하나의 트랜잭션으로 처리됩니다.
///
/// `#[async_trait]`: 트레이트 객체(`dyn ChatStore`)로 쓰기 위해 async fn을
/// `Pin<Box<dyn Future>>`를 반환하는 형태로 바꿔 줍니다.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// 저장소 연결 확인 (헬스체크용)
    async fn ping(&self) -> Result<(), AppError>;

    async fn insert_session(&self, new: &NewSession) -> Result<ChatSession, AppError>;
    async fn find_session(&self, session_id: &str) -> Result<Option<ChatSession>, AppError>;
    /// `rating`은 이미 범위 검사를 통과한 값이어야 합니다. None이면 기존 평가를 유지합니다.
    async fn end_session(
        &self,
        session_id: &str,
        rating: Option<i64>,
    ) -> Result<Option<ChatSession>, AppError>;
    async fn delete_session(&self, session_id: &str) -> Result<bool, AppError>;

    /// 전부 저장되거나 전부 저장되지 않습니다.
    async fn insert_messages(&self, messages: &[NewMessage]) -> Result<Vec<ChatMessage>, AppError>;
    async fn list_messages(&self, session_id: &str) -> Result<Vec<ChatMessage>, AppError>;
    async fn count_messages(&self) -> Result<i64, AppError>;
    async fn user_message_contents(
        &self,
        since: &str,
        until: Option<&str>,
    ) -> Result<Vec<String>, AppError>;

    async fn session_stats(&self) -> Result<SessionStats, AppError>;
    async fn daily_figures(&self, start: &str, end: &str) -> Result<DailyFigures, AppError>;
    async fn save_snapshot(&self, snapshot: &NewSnapshot) -> Result<ChatAnalytics, AppError>;
    async fn list_snapshots(&self) -> Result<Vec<ChatAnalytics>, AppError>;
}

/// SQLite 기반 `ChatStore` 구현
///
/// `SqlitePool`은 내부적으로 Arc를 사용하므로 clone해도 같은 풀을 가리킵니다.
#[derive(Clone)]
pub struct SqliteChatStore {
    pool: SqlitePool,
}

impl SqliteChatStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ChatStore for SqliteChatStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_session(&self, new: &NewSession) -> Result<ChatSession, AppError> {
        sessions::insert_session(&self.pool, new).await
    }

    async fn find_session(&self, session_id: &str) -> Result<Option<ChatSession>, AppError> {
        sessions::get_session(&self.pool, session_id).await
    }

    async fn end_session(
        &self,
        session_id: &str,
        rating: Option<i64>,
    ) -> Result<Option<ChatSession>, AppError> {
        sessions::end_session(&self.pool, session_id, rating).await
    }

    async fn delete_session(&self, session_id: &str) -> Result<bool, AppError> {
        sessions::delete_session(&self.pool, session_id).await
    }

    async fn insert_messages(&self, messages: &[NewMessage]) -> Result<Vec<ChatMessage>, AppError> {
        messages::insert_messages(&self.pool, messages).await
    }

    async fn list_messages(&self, session_id: &str) -> Result<Vec<ChatMessage>, AppError> {
        messages::list_messages(&self.pool, session_id).await
    }

    async fn count_messages(&self) -> Result<i64, AppError> {
        messages::count_messages(&self.pool).await
    }

    async fn user_message_contents(
        &self,
        since: &str,
        until: Option<&str>,
    ) -> Result<Vec<String>, AppError> {
        messages::user_message_contents(&self.pool, since, until).await
    }

    async fn session_stats(&self) -> Result<SessionStats, AppError> {
        sessions::session_stats(&self.pool).await
    }

    async fn daily_figures(&self, start: &str, end: &str) -> Result<DailyFigures, AppError> {
        analytics::daily_figures(&self.pool, start, end).await
    }

    async fn save_snapshot(&self, snapshot: &NewSnapshot) -> Result<ChatAnalytics, AppError> {
        analytics::upsert_snapshot(&self.pool, snapshot).await
    }

    async fn list_snapshots(&self) -> Result<Vec<ChatAnalytics>, AppError> {
        analytics::list_snapshots(&self.pool).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Duration;

    /// 마이그레이션이 적용된 인메모리 저장소
    pub(crate) async fn memory_store() -> SqliteChatStore {
        let pool = connect("sqlite::memory:", 1).await.unwrap();
        SqliteChatStore::new(pool)
    }

    pub(crate) async fn seed_session(store: &SqliteChatStore, session_id: &str) -> ChatSession {
        store
            .insert_session(&NewSession {
                session_id: session_id.to_string(),
                user_ip: Some("127.0.0.1".into()),
                user_agent: Some("test-agent".into()),
            })
            .await
            .unwrap()
    }

    /// 임의의 시각으로 메시지를 직접 넣습니다 (기간 필터 테스트용).
    pub(crate) async fn insert_message_at(
        store: &SqliteChatStore,
        session_id: &str,
        message_type: MessageType,
        content: &str,
        timestamp: &str,
    ) {
        sqlx::query(
            "INSERT INTO chat_messages (session_id, message_type, content, timestamp) VALUES (?, ?, ?, ?)",
        )
        .bind(session_id)
        .bind(message_type.as_str())
        .bind(content)
        .bind(timestamp)
        .execute(store.pool())
        .await
        .unwrap();
    }

    fn user_message(session_id: &str, content: &str) -> NewMessage {
        NewMessage {
            session_id: session_id.into(),
            message_type: MessageType::User,
            content: content.into(),
            response_time: None,
        }
    }

    #[test]
    fn timestamps_are_fixed_width_and_sortable() {
        let early = Utc::now();
        let late = early + Duration::milliseconds(1);
        let (a, b) = (format_timestamp(early), format_timestamp(late));
        assert_eq!(a.len(), "2026-10-18T12:00:00.000000Z".len());
        assert!(a < b);
    }

    #[tokio::test]
    async fn new_session_is_active_without_end() {
        let store = memory_store().await;
        let session = seed_session(&store, "s-1").await;

        assert_eq!(session.status, SessionStatus::Active);
        assert!(session.ended_at.is_none());
        assert!(session.satisfaction_rating.is_none());
        assert_eq!(session.message_count, 0);
        assert_eq!(session.user_ip.as_deref(), Some("127.0.0.1"));
    }

    #[tokio::test]
    async fn end_session_keeps_rating_when_none_given() {
        let store = memory_store().await;
        seed_session(&store, "s-1").await;

        let ended = store.end_session("s-1", Some(4)).await.unwrap().unwrap();
        assert_eq!(ended.status, SessionStatus::Ended);
        assert_eq!(ended.satisfaction_rating, Some(4));
        assert!(ended.ended_at.is_some());

        let again = store.end_session("s-1", None).await.unwrap().unwrap();
        assert_eq!(again.satisfaction_rating, Some(4));
    }

    #[tokio::test]
    async fn end_unknown_session_returns_none() {
        let store = memory_store().await;
        assert!(store.end_session("missing", Some(5)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn messages_are_listed_in_insertion_order() {
        let store = memory_store().await;
        seed_session(&store, "s-1").await;

        store
            .insert_messages(&[user_message("s-1", "primeira"), user_message("s-1", "segunda")])
            .await
            .unwrap();
        store.insert_messages(&[user_message("s-1", "terceira")]).await.unwrap();

        let messages = store.list_messages("s-1").await.unwrap();
        let contents: Vec<_> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["primeira", "segunda", "terceira"]);
        assert!(messages.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

        let session = store.find_session("s-1").await.unwrap().unwrap();
        assert_eq!(session.message_count, 3);
    }

    #[tokio::test]
    async fn failed_batch_rolls_back_every_row() {
        let store = memory_store().await;
        seed_session(&store, "s-1").await;

        // 두 번째 행이 빈 content라 CHECK 제약에 걸립니다.
        let result = store
            .insert_messages(&[user_message("s-1", "olá"), user_message("s-1", "")])
            .await;

        assert!(result.is_err());
        assert_eq!(store.count_messages().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn message_for_unknown_session_violates_foreign_key() {
        let store = memory_store().await;
        let result = store.insert_messages(&[user_message("ghost", "olá")]).await;

        assert!(matches!(result, Err(AppError::Database(_))));
        assert_eq!(store.count_messages().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn deleting_session_cascades_to_messages() {
        let store = memory_store().await;
        seed_session(&store, "s-1").await;
        seed_session(&store, "s-2").await;
        store.insert_messages(&[user_message("s-1", "a")]).await.unwrap();
        store.insert_messages(&[user_message("s-2", "b")]).await.unwrap();

        assert!(store.delete_session("s-1").await.unwrap());
        assert!(!store.delete_session("s-1").await.unwrap());

        assert_eq!(store.count_messages().await.unwrap(), 1);
        assert!(store.list_messages("s-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn session_stats_without_ratings() {
        let store = memory_store().await;
        seed_session(&store, "s-1").await;
        seed_session(&store, "s-2").await;
        store.end_session("s-2", None).await.unwrap();

        let stats = store.session_stats().await.unwrap();
        assert_eq!(stats.total_sessions, 2);
        assert_eq!(stats.active_sessions, 1);
        assert_eq!(stats.total_ratings, 0);
        assert!(stats.average_rating.is_none());
    }

    #[tokio::test]
    async fn user_contents_respect_window() {
        let store = memory_store().await;
        seed_session(&store, "s-1").await;
        insert_message_at(&store, "s-1", MessageType::User, "antiga", "2026-01-01T00:00:00.000000Z").await;
        insert_message_at(&store, "s-1", MessageType::User, "recente", "2026-02-01T00:00:00.000000Z").await;
        insert_message_at(&store, "s-1", MessageType::Bot, "resposta", "2026-02-01T00:00:01.000000Z").await;

        let since = store
            .user_message_contents("2026-01-15T00:00:00.000000Z", None)
            .await
            .unwrap();
        assert_eq!(since, ["recente"]);

        let bounded = store
            .user_message_contents("2025-12-01T00:00:00.000000Z", Some("2026-01-15T00:00:00.000000Z"))
            .await
            .unwrap();
        assert_eq!(bounded, ["antiga"]);
    }

    #[tokio::test]
    async fn snapshot_upsert_overwrites_same_date() {
        let store = memory_store().await;
        let mut snapshot = NewSnapshot {
            date: "2026-10-01".into(),
            total_sessions: 3,
            total_messages: 10,
            avg_session_duration: 2.5,
            avg_response_time: 1.5,
            satisfaction_avg: 4.0,
            common_issues: Some("[]".into()),
        };
        let first = store.save_snapshot(&snapshot).await.unwrap();

        snapshot.total_sessions = 7;
        let second = store.save_snapshot(&snapshot).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.total_sessions, 7);
        assert_eq!(store.list_snapshots().await.unwrap().len(), 1);
    }
}
