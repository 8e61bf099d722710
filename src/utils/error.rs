use axum::{
    http::{header::RETRY_AFTER, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use super::response::ErrorResponse;

/// 업스트림/내부 실패 시 클라이언트에 노출하는 고정 메시지
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to process your request. Please try again.";

/// 애플리케이션 전역 에러 타입
///
/// 저장소 장애(`StoreError`)는 여기에 포함되지 않습니다. Rate Limiter가 fail-open으로 흡수합니다.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 잘못된 클라이언트 입력 (필드명을 포함한 메시지)
    #[error("validation failed: {0}")]
    Validation(String),

    /// 요청 본문이 JSON이 아님
    #[error("malformed request body: {0}")]
    JsonParseFailed(String),

    /// 토큰 누락/위조/만료
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// 윈도우 내 요청 한도 초과
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimitExceeded { retry_after_secs: u64 },

    /// LLM 호출 실패 또는 응답 형식 오류 (상세 내용은 서버 로그에만 남김)
    #[error("upstream failure: {0}")]
    Upstream(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// 클라이언트에 반환할 메시지
    pub fn message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::JsonParseFailed(_) => "Invalid request".to_string(),
            AppError::Unauthorized(msg) => msg.clone(),
            AppError::RateLimitExceeded { retry_after_secs } => format!(
                "Rate limit exceeded. Try again in {} seconds.",
                retry_after_secs
            ),
            AppError::Upstream(_) => UPSTREAM_FAILURE_MESSAGE.to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    /// HTTP 상태 코드 반환
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::JsonParseFailed(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        match &self {
            AppError::Upstream(detail) => error!(detail = %detail, "Upstream failure"),
            AppError::Internal(detail) => error!(detail = %detail, "Internal Server Error"),
            AppError::RateLimitExceeded { retry_after_secs } => {
                warn!(retry_after_secs = retry_after_secs, "Rate limit exceeded")
            }
            _ => warn!(status = status.as_u16(), "{}", self),
        }

        let mut response = (status, Json(ErrorResponse::new(message))).into_response();

        // Retry-After 헤더 추가
        if let AppError::RateLimitExceeded { retry_after_secs } = self {
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(retry_after_secs));
        }

        response
    }
}

/// 요청 본문 JSON 파싱 실패를 AppError로 변환
impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        AppError::JsonParseFailed(error.to_string())
    }
}

/// 편의 함수들
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::Unauthorized(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        AppError::Upstream(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
