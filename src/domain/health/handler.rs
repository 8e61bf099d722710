use axum::{extract::State, Json};

use super::dto::HealthStatus;
use crate::state::AppState;

/// 헬스체크 API
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "헬스체크 성공", body = HealthStatus)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus::ok(state.clock.now()))
}
