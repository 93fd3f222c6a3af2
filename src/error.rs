//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 검증 실패, 세션 없음, 저장소 실패를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 `{ "success": false, "message": ... }` 형태의 HTTP 응답으로 변환
//!
//! 재시도는 어디에서도 하지 않습니다. 모든 에러는 해당 요청에 대해 최종 결과이며,
//! 필요하면 클라이언트가 요청을 다시 보내야 합니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 필수 필드 누락이나 형식 오류 (HTTP 400)
    #[error("{0}")]
    BadRequest(String),

    /// 존재하지 않는 세션 토큰 (HTTP 404)
    #[error("Sessão não encontrada")]
    SessionNotFound,

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// #[from] 덕분에 sqlx 함수 뒤의 `?`가 자동으로 이 variant로 변환됩니다.
    /// 트랜잭션 도중 이 에러로 빠져나가면 커밋되지 않은 `Transaction`이 drop되면서 롤백됩니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(Database, Internal)는 실제 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::SessionNotFound => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro interno".to_string(),
                )
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Erro ao acessar o banco de dados".to_string(),
                )
            }
        };

        // 결과: { "success": false, "message": "Sessão não encontrada" }
        let body = Json(json!({
            "success": false,
            "message": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn bad_request_keeps_its_message() {
        let (status, body) = render(AppError::BadRequest("campo ausente".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "campo ausente");
    }

    #[tokio::test]
    async fn unknown_session_is_404() {
        let (status, body) = render(AppError::SessionNotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Sessão não encontrada");
    }

    #[tokio::test]
    async fn database_errors_hide_details() {
        let (status, body) = render(AppError::Database(sqlx::Error::RowNotFound)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Erro ao acessar o banco de dados");
    }
}
