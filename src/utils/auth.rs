use axum::http::{header::AUTHORIZATION, HeaderMap};

use crate::utils::error::AppError;

const BEARER_PREFIX: &str = "Bearer ";

/// Authorization 헤더에서 Bearer 토큰을 추출합니다.
///
/// 토큰 검증은 하지 않습니다. 파이프라인 순서상 요청 본문 검증 뒤에 호출됩니다.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(missing_header)?
        .to_str()
        .map_err(|_| missing_header())?;

    match header.strip_prefix(BEARER_PREFIX) {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(missing_header()),
    }
}

fn missing_header() -> AppError {
    AppError::unauthorized("Missing or invalid Authorization header")
}
