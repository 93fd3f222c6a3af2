//! # 통계(Analytics) 서비스
//!
//! - `get_analytics`: 요청마다 원본 데이터에서 요약 통계를 새로 계산합니다 (캐시 없음).
//! - `rank_common_issues`: 고객 메시지 본문에서 문의 유형별 언급 수를 세어 순위를 매깁니다.
//! - `build_daily_snapshot`: 특정 날짜의 통계를 계산해 `chat_analytics`에 저장합니다.

use crate::db::{format_timestamp, ChatStore};
use crate::error::AppError;
use crate::models::*;
use chrono::{DateTime, Duration, NaiveDate, Utc};

/// 문의 유형 분석 대상 기간 (일)
pub const ISSUE_WINDOW_DAYS: i64 = 30;

/// 문의 유형 → 키워드 표. 동률일 때는 이 순서가 유지됩니다.
pub const ISSUE_CATEGORIES: &[(&str, &[&str])] = &[
    ("rastreamento", &["rastrear", "código", "jt", "localizar"]),
    ("entrega", &["entrega", "entregar", "receber", "atraso"]),
    ("endereço", &["endereço", "endereco", "alterar", "mudar"]),
    ("atendimento", &["atendimento", "suporte", "ajuda", "problema"]),
    ("supervisor", &["supervisor", "gerente", "responsável"]),
];

/// 메시지 본문 목록에서 문의 유형별 언급 수를 세어 내림차순으로 반환합니다.
///
/// - 한 메시지가 한 유형의 키워드를 여러 개 포함해도 그 유형에는 1만 더합니다.
/// - 한 메시지가 여러 유형에 동시에 집계될 수 있습니다.
/// - 0건인 유형은 결과에서 빠집니다.
///
/// `sort_by`는 안정 정렬이므로 같은 수의 유형은 `ISSUE_CATEGORIES` 순서를 유지합니다.
pub fn rank_common_issues<'a, I>(contents: I) -> Vec<CommonIssue>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = vec![0_i64; ISSUE_CATEGORIES.len()];

    for content in contents {
        let lowered = content.to_lowercase();
        for (count, (_, keywords)) in counts.iter_mut().zip(ISSUE_CATEGORIES) {
            if keywords.iter().any(|keyword| lowered.contains(keyword)) {
                *count += 1;
            }
        }
    }

    let mut issues: Vec<CommonIssue> = ISSUE_CATEGORIES
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|((issue, _), count)| CommonIssue {
            issue: issue.to_string(),
            count,
        })
        .collect();
    issues.sort_by(|a, b| b.count.cmp(&a.count));
    issues
}

/// 소수점 둘째 자리에서 반올림합니다.
///
/// 정확히 절반인 값은 짝수 쪽으로 반올림합니다 (2.125 → 2.12, 2.375 → 2.38).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// 실시간 통계를 계산합니다.
///
/// `now` 기준 최근 `ISSUE_WINDOW_DAYS`일의 고객 메시지로 문의 유형 순위를 만듭니다.
/// 문의 유형 분석 중 저장소 에러가 나면 전체 응답을 실패시키지 않고
/// 빈 목록 + `common_issues_degraded = true`로 대체합니다.
/// 나머지 집계에서 난 에러는 그대로 전파됩니다.
pub async fn get_analytics(
    store: &dyn ChatStore,
    now: DateTime<Utc>,
) -> Result<AnalyticsSummary, AppError> {
    let stats = store.session_stats().await?;
    let total_messages = store.count_messages().await?;

    let since = format_timestamp(now - Duration::days(ISSUE_WINDOW_DAYS));
    let (common_issues, common_issues_degraded) =
        match store.user_message_contents(&since, None).await {
            Ok(contents) => (rank_common_issues(contents.iter().map(String::as_str)), false),
            Err(e) => {
                tracing::warn!(error = %e, "common issue analysis failed, returning empty list");
                (Vec::new(), true)
            }
        };

    Ok(AnalyticsSummary {
        total_sessions: stats.total_sessions,
        total_messages,
        active_sessions: stats.active_sessions,
        average_satisfaction: round2(stats.average_rating.unwrap_or(0.0)),
        total_ratings: stats.total_ratings,
        common_issues,
        common_issues_degraded,
    })
}

/// "YYYY-MM-DD" 문자열을 날짜로 파싱합니다.
pub fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("data inválida (esperado AAAA-MM-DD): {raw}")))
}

/// `date`(UTC) 하루치 통계를 계산하여 스냅샷으로 저장하고, 저장된 행을 반환합니다.
///
/// 같은 날짜로 다시 호출하면 기존 스냅샷을 덮어씁니다.
/// 값이 없는 평균(종료된 세션이 없는 날 등)은 0.0으로 기록합니다.
pub async fn build_daily_snapshot(
    store: &dyn ChatStore,
    date: NaiveDate,
) -> Result<ChatAnalytics, AppError> {
    let start = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| AppError::Internal(format!("invalid day start for {date}")))?
        .and_utc();
    let end = start + Duration::days(1);
    let (start, end) = (format_timestamp(start), format_timestamp(end));

    let figures = store.daily_figures(&start, &end).await?;
    let contents = store.user_message_contents(&start, Some(&end)).await?;
    let issues = rank_common_issues(contents.iter().map(String::as_str));
    let common_issues = serde_json::to_string(&issues)
        .map_err(|e| AppError::Internal(format!("failed to encode common issues: {e}")))?;

    let snapshot = NewSnapshot {
        date: date.format("%Y-%m-%d").to_string(),
        total_sessions: figures.total_sessions,
        total_messages: figures.total_messages,
        avg_session_duration: round2(figures.avg_session_duration.unwrap_or(0.0)),
        avg_response_time: round2(figures.avg_response_time.unwrap_or(0.0)),
        satisfaction_avg: round2(figures.satisfaction_avg.unwrap_or(0.0)),
        common_issues: Some(common_issues),
    };

    let saved = store.save_snapshot(&snapshot).await?;
    tracing::info!(date = %saved.date, sessions = saved.total_sessions, "analytics snapshot saved");
    Ok(saved)
}

pub async fn list_snapshots(store: &dyn ChatStore) -> Result<Vec<ChatAnalytics>, AppError> {
    store.list_snapshots().await
}
