use std::convert::Infallible;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{header::USER_AGENT, request::Parts},
};

use crate::models::ClientInfo;

// 주소는 `into_make_service_with_connect_info`가 넣어 준 ConnectInfo에서 읽습니다.
// 테스트처럼 ConnectInfo가 없으면 None. 이 추출자는 실패하지 않습니다.
impl<S> FromRequestParts<S> for ClientInfo
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        let user_agent = parts
            .headers
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        Ok(ClientInfo { ip, user_agent })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn reads_address_and_user_agent() {
        let request = Request::builder()
            .header(USER_AGENT, "curl/8.0")
            .extension(ConnectInfo(SocketAddr::from(([192, 168, 0, 7], 4242))))
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let client = ClientInfo::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(client.ip.as_deref(), Some("192.168.0.7"));
        assert_eq!(client.user_agent.as_deref(), Some("curl/8.0"));
    }

    #[tokio::test]
    async fn missing_connect_info_is_not_an_error() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        let client = ClientInfo::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(client, ClientInfo::default());
    }
}
