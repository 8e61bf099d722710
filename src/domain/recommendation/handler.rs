use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};

use super::validator;
use crate::state::AppState;
use crate::utils::{auth::bearer_token, body::parse_json, error::AppError, response::BaseResponse};

/// 장소 추천 API
///
/// 처리 순서: 본문 검증 → 토큰 검증 → Rate Limit → LLM 호출.
/// 앞 단계가 실패하면 뒤 단계는 실행되지 않습니다.
/// Rate Limiter가 실행된 이후의 응답(200/429/500)에는 `X-RateLimit-*` 헤더가 붙습니다.
#[utoipa::path(
    post,
    path = "/recommendations",
    request_body = super::dto::LocationQuery,
    responses(
        (status = 200, body = super::dto::RecommendationsResponse),
        (status = 400, body = crate::utils::response::ErrorResponse),
        (status = 401, body = crate::utils::response::ErrorResponse),
        (status = 429, body = crate::utils::response::ErrorResponse),
        (status = 500, body = crate::utils::response::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Recommendations"
)]
pub async fn recommendations(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    // 1. 입력값 검증
    let body = parse_json(&body)?;
    let location = validator::validate(&body)?;

    // 2. 토큰 검증
    let device_id = state.token_service.verify(bearer_token(&headers)?)?;

    // 3. Rate Limit
    let decision = state.rate_limiter.admit(device_id.as_str()).await;
    let rate_headers = decision.headers();
    if !decision.allowed {
        let retry_after_secs = decision.retry_after_secs.unwrap_or(1);
        tracing::info!(device_id = %device_id, retry_after_secs, "Request throttled");
        return Ok((rate_headers, AppError::RateLimitExceeded { retry_after_secs }).into_response());
    }

    // 4. 추천 생성
    match state.recommendation_service.recommend(&location).await {
        Ok(places) => Ok((rate_headers, Json(BaseResponse::success(places))).into_response()),
        Err(e) => Ok((rate_headers, e).into_response()),
    }
}
