//! # 채팅 세션 모델 정의
//!
//! 고객 지원 대화 한 건(세션)을 표현하는 데이터 구조체들을 정의합니다.
//!
//! ## 세션 흐름
//! 1. 채팅 위젯을 열면 `POST /api/chat/session`으로 세션 생성 (status = active)
//! 2. 메시지를 주고받음
//! 3. `POST /api/chat/session/{id}/end`로 종료 (status = ended, 만족도 평가 선택)

use serde::{Deserialize, Serialize};

/// 세션 상태
///
/// DB에는 소문자 문자열("active", "ended", "transferred")로 저장되고,
/// JSON에도 같은 문자열로 직렬화됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum SessionStatus {
    /// 진행 중
    Active,
    /// 종료됨
    Ended,
    /// 상담원에게 이관됨
    Transferred,
}

/// 채팅 세션 엔티티: `chat_sessions` 테이블 한 행에 대응합니다.
///
/// `message_count`는 테이블 컬럼이 아니라 조회 시점에 서브쿼리로 계산한
/// 실제 메시지 개수입니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatSession {
    /// 내부 정수 기본키
    pub id: i64,
    /// 외부에 노출되는 세션 토큰 (UUID v4)
    pub session_id: String,
    /// 세션을 만든 클라이언트 주소
    pub user_ip: Option<String>,
    /// 세션을 만든 클라이언트의 User-Agent
    pub user_agent: Option<String>,
    /// 생성 시각 (RFC 3339, UTC)
    pub started_at: String,
    /// 종료 시각: None이면 아직 진행 중
    pub ended_at: Option<String>,
    pub status: SessionStatus,
    /// 만족도 평가 (1~5). 평가하지 않았으면 None
    pub satisfaction_rating: Option<i64>,
    pub message_count: i64,
}

/// 새 세션을 저장할 때 필요한 값들
///
/// 토큰은 서비스 계층에서 생성하고, 시각은 저장소가 기록합니다.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub session_id: String,
    pub user_ip: Option<String>,
    pub user_agent: Option<String>,
}

/// 요청을 보낸 클라이언트 정보
///
/// `middleware::client`의 추출자(extractor)가 요청에서 채워줍니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// 세션 종료 요청: `POST /api/chat/session/{id}/end`의 요청 본문 (선택)
///
/// 본문이 비어 있으면 `Default`로 처리됩니다.
///
/// 평가는 JSON 숫자라면 무엇이든 받습니다. i64에 들어가지 않는 큰 정수나
/// 소수는 `rating()`에서 None이 되어 범위 밖 평가와 같이 무시됩니다.
#[derive(Debug, Default, Deserialize)]
pub struct EndSessionRequest {
    /// 만족도 평가. 1~5 범위를 벗어나면 무시됩니다 (에러 아님).
    pub satisfaction_rating: Option<serde_json::Number>,
}

impl EndSessionRequest {
    /// 정수로 표현되는 평가만 돌려줍니다. 범위 검사는 서비스 계층에서 합니다.
    pub fn rating(&self) -> Option<i64> {
        self.satisfaction_rating.as_ref().and_then(serde_json::Number::as_i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> EndSessionRequest {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn integer_rating_is_kept() {
        assert_eq!(parse(r#"{"satisfaction_rating": 1}"#).rating(), Some(1));
        assert_eq!(parse(r#"{"satisfaction_rating": 5}"#).rating(), Some(5));
        assert_eq!(parse("{}").rating(), None);
    }

    #[test]
    fn oversized_or_fractional_rating_is_not_an_error() {
        let huge = parse(r#"{"satisfaction_rating": 99999999999999999999}"#);
        assert!(huge.satisfaction_rating.is_some());
        assert_eq!(huge.rating(), None);

        assert_eq!(parse(r#"{"satisfaction_rating": 4.5}"#).rating(), None);
    }

    #[test]
    fn non_numeric_rating_is_rejected() {
        assert!(serde_json::from_str::<EndSessionRequest>(r#"{"satisfaction_rating": "cinco"}"#).is_err());
    }
}
