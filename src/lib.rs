pub mod config;
pub mod domain;
pub mod global;
pub mod shutdown;
pub mod state;
pub mod store;
pub mod utils;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER},
        Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::global::middleware::{request_id_middleware, REQUEST_ID_HEADER};
use crate::global::rate_limit::{
    RATE_LIMIT_LIMIT_HEADER, RATE_LIMIT_REMAINING_HEADER, RATE_LIMIT_RESET_HEADER,
};

pub use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        domain::auth::handler::anonymous_auth,
        domain::recommendation::handler::recommendations,
        domain::health::handler::health_check,
    ),
    components(
        schemas(
            domain::auth::dto::AnonymousAuthRequest,
            domain::auth::dto::AnonymousAuthResponse,
            domain::recommendation::dto::LocationQuery,
            domain::recommendation::dto::PlaceCategory,
            domain::recommendation::dto::PlaceRecommendation,
            domain::recommendation::dto::RecommendationsResponse,
            domain::health::dto::HealthStatus,
            utils::response::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "익명 인증 API"),
        (name = "Recommendations", description = "위치 기반 장소 추천 API"),
        (name = "Health", description = "헬스체크 API")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .expose_headers([
            RATE_LIMIT_LIMIT_HEADER,
            RATE_LIMIT_REMAINING_HEADER,
            RATE_LIMIT_RESET_HEADER,
            RETRY_AFTER,
            REQUEST_ID_HEADER,
        ])
}

/// 애플리케이션 라우터
///
/// 인증/추천 API는 루트와 `/api` 아래에 모두 노출됩니다.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/auth/anonymous",
            post(domain::auth::handler::anonymous_auth),
        )
        .route(
            "/recommendations",
            post(domain::recommendation::handler::recommendations),
        );

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(domain::health::health_check))
        .merge(api.clone())
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
