//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 연결 URL (없으면 `SQLITE_PATH`로 생성)
//! - `SQLITE_PATH`: SQLite 파일 경로 (기본값: "data/chat.db")
//! - `HOST`: 서버 바인딩 주소
//! - `PORT`: 서버 포트 번호
//! - `STATIC_DIR`: 프론트엔드 정적 파일 디렉토리
//! - `RESPONDER_SEED`: 자동 응답 난수 시드 (데모 재현용, 선택)

use std::env;
use std::path::{Path, PathBuf};

/// SQLITE_PATH가 없을 때 사용하는 기본 데이터베이스 파일
const DEFAULT_SQLITE_PATH: &str = "data/chat.db";

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// 애플리케이션 전체에서 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// sqlx SQLite 연결 URL (예: "sqlite://data/chat.db?mode=rwc")
    pub database_url: String,
    /// `DATABASE_URL` 없이 파일 경로로 설정된 경우, 그 파일 경로
    /// 서버 시작 시 부모 디렉토리를 만들어 두기 위해 보관합니다.
    pub sqlite_path: Option<PathBuf>,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 5000)
    pub port: u16,
    /// 정적 파일 디렉토리 (기본값: "static")
    pub static_dir: String,
    /// 자동 응답 난수 시드. None이면 OS 난수로 초기화합니다.
    pub responder_seed: Option<u64>,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// 모든 항목에 기본값이 있으므로 실패하지 않습니다.
    /// `PORT`, `RESPONDER_SEED`가 숫자로 파싱되지 않으면 기본값(없음)으로 처리합니다.
    pub fn from_env() -> Self {
        // DATABASE_URL이 우선이고, 없으면 SQLITE_PATH(또는 기본 경로)로 URL을 만듭니다.
        let (database_url, sqlite_path) = match env::var("DATABASE_URL") {
            Ok(url) => (url, None),
            Err(_) => {
                let path = env::var("SQLITE_PATH")
                    .unwrap_or_else(|_| DEFAULT_SQLITE_PATH.to_string());
                (sqlite_url(Path::new(&path)), Some(PathBuf::from(path)))
            }
        };

        Self {
            database_url,
            sqlite_path,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string()),
            responder_seed: env::var("RESPONDER_SEED")
                .ok()
                .and_then(|seed| seed.parse().ok()),
        }
    }
}

/// 파일 경로를 sqlx SQLite URL로 변환합니다.
///
/// `mode=rwc`: 파일이 없으면 새로 생성합니다 (read/write/create).
pub fn sqlite_url(path: &Path) -> String {
    format!("sqlite://{}?mode=rwc", path.display())
}
