use axum::{body::Bytes, extract::State, Json};

use super::dto::{AnonymousAuthRequest, AnonymousAuthResponse};
use crate::state::AppState;
use crate::utils::{body::parse_json, error::AppError};

/// 익명 인증 API
///
/// 기기 식별자로 7일 유효 토큰을 발급합니다. 서버에 계정을 만들지 않습니다.
#[utoipa::path(
    post,
    path = "/auth/anonymous",
    request_body = AnonymousAuthRequest,
    responses(
        (status = 200, body = AnonymousAuthResponse),
        (status = 400, body = crate::utils::response::ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn anonymous_auth(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AnonymousAuthResponse>, AppError> {
    let body = parse_json(&body)?;
    let request = AnonymousAuthRequest::from_value(&body)?;

    let token = state.token_service.issue(&request.device_id)?;
    tracing::info!(device_id = %request.device_id, "Anonymous token issued");

    Ok(Json(AnonymousAuthResponse::new(token)))
}
