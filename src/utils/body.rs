use axum::body::Bytes;
use serde_json::Value;

use super::error::AppError;

/// 요청 본문을 JSON으로 파싱합니다.
///
/// `Content-Type` 헤더와 관계없이 본문 내용만 봅니다.
pub fn parse_json(body: &Bytes) -> Result<Value, AppError> {
    Ok(serde_json::from_slice(body)?)
}
