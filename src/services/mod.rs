//! # 서비스 모듈
//!
//! 핸들러와 저장소 사이의 비즈니스 규칙을 담습니다.
//! - `chat`: 세션 생성/종료, 메시지 저장과 자동 응답
//! - `responder`: 키워드 기반 자동 응답기
//! - `analytics`: 통계 계산과 일별 스냅샷

pub mod analytics;
pub mod chat;
pub mod responder;
