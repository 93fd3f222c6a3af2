//! # 통계(analytics) 모델 정의
//!
//! - `AnalyticsSummary`: `GET /api/chat/analytics`가 매번 원본 데이터에서 새로 계산하는 요약
//! - `ChatAnalytics`: 날짜별로 덮어쓰는 스냅샷 행 (`chat_analytics` 테이블)
//! - `SessionStats`, `DailyFigures`: 저장소가 집계 쿼리 결과를 담아 돌려주는 중간 구조체

use serde::{Deserialize, Serialize};

/// 자주 언급되는 문의 유형과 언급된 메시지 수
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonIssue {
    pub issue: String,
    pub count: i64,
}

/// 실시간 통계 응답의 `analytics` 객체
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub total_sessions: i64,
    pub total_messages: i64,
    pub active_sessions: i64,
    /// 평가된 세션들의 평균 만족도 (소수점 둘째 자리 반올림, 평가가 없으면 0)
    pub average_satisfaction: f64,
    pub total_ratings: i64,
    pub common_issues: Vec<CommonIssue>,
    /// 문의 유형 분석이 실패해 `common_issues`가 빈 목록으로 대체되었는지 여부
    pub common_issues_degraded: bool,
}

/// 세션 테이블 전체에 대한 집계 결과
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct SessionStats {
    pub total_sessions: i64,
    pub active_sessions: i64,
    pub total_ratings: i64,
    /// 평가가 하나도 없으면 SQL AVG가 NULL을 반환하므로 Option
    pub average_rating: Option<f64>,
}

/// 하루치 세션/메시지에 대한 집계 결과
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct DailyFigures {
    pub total_sessions: i64,
    pub total_messages: i64,
    /// 종료된 세션의 평균 지속 시간(분)
    pub avg_session_duration: Option<f64>,
    /// 봇 메시지의 평균 응답 시간(초)
    pub avg_response_time: Option<f64>,
    pub satisfaction_avg: Option<f64>,
}

/// 일자별 통계 스냅샷: `chat_analytics` 테이블 한 행에 대응합니다.
///
/// 날짜(`date`)를 키로 덮어쓰는 캐시 행입니다.
/// 실시간 통계 API는 이 테이블을 읽지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatAnalytics {
    pub id: i64,
    /// "YYYY-MM-DD"
    pub date: String,
    pub total_sessions: i64,
    pub total_messages: i64,
    /// 분 단위
    pub avg_session_duration: f64,
    /// 초 단위
    pub avg_response_time: f64,
    pub satisfaction_avg: f64,
    /// `[{"issue": ..., "count": ...}]` 형태의 JSON 문자열
    pub common_issues: Option<String>,
}

/// 스냅샷 저장 시 필요한 값들 (id를 제외한 `ChatAnalytics`)
#[derive(Debug, Clone)]
pub struct NewSnapshot {
    pub date: String,
    pub total_sessions: i64,
    pub total_messages: i64,
    pub avg_session_duration: f64,
    pub avg_response_time: f64,
    pub satisfaction_avg: f64,
    pub common_issues: Option<String>,
}

/// 스냅샷 생성 요청: `POST /api/chat/analytics/snapshot`의 요청 본문 (선택)
#[derive(Debug, Default, Deserialize)]
pub struct SnapshotRequest {
    /// "YYYY-MM-DD". 없으면 오늘(UTC)
    pub date: Option<String>,
}
