//! 요청 단위 추출자(extractor) 모음
//!
//! - `client`: 요청을 보낸 클라이언트의 주소와 User-Agent (`ClientInfo`)

pub mod client;
