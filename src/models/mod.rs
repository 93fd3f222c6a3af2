//! # 데이터 모델 모듈
//!
//! 각 하위 모듈은 특정 도메인의 데이터 타입을 담당합니다:
//! - `session`: 채팅 세션과 세션 관련 요청 본문
//! - `message`: 채팅 메시지와 메시지 유형
//! - `analytics`: 실시간 통계 요약과 일별 스냅샷
//!
//! `pub use X::*;`로 재공개하여 `crate::models::ChatSession`처럼 짧게 접근합니다.

pub mod analytics;
pub mod message;
pub mod session;

pub use analytics::*;
pub use message::*;
pub use session::*;
