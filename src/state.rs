use std::sync::Arc;

use crate::config::{AppConfig, ConfigError};
use crate::domain::auth::TokenService;
use crate::domain::recommendation::{build_llm_client, RecommendationService, SharedLlmClient};
use crate::global::rate_limit::RateLimiter;
use crate::store::{MemoryStore, SharedStore};
use crate::utils::clock::{SharedClock, SystemClock};

/// 요청 간 공유되는 불변 상태
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub clock: SharedClock,
    pub token_service: Arc<TokenService>,
    pub rate_limiter: Arc<RateLimiter>,
    pub recommendation_service: Arc<RecommendationService>,
}

impl AppState {
    /// 구성 요소를 직접 주입해 상태 생성 (테스트에서 사용)
    pub fn new(
        config: AppConfig,
        store: SharedStore,
        llm_client: SharedLlmClient,
        clock: SharedClock,
    ) -> Self {
        let token_service = TokenService::new(
            config.jwt_secret.clone(),
            config.token_ttl_secs,
            clock.clone(),
        );
        let rate_limiter = RateLimiter::new(store, config.rate_limit, clock.clone());
        let recommendation_service = RecommendationService::new(llm_client, config.llm.clone());

        Self {
            config: Arc::new(config),
            clock,
            token_service: Arc::new(token_service),
            rate_limiter: Arc::new(rate_limiter),
            recommendation_service: Arc::new(recommendation_service),
        }
    }

    /// 설정으로부터 저장소와 LLM 클라이언트를 만들어 상태 생성
    pub async fn from_config(config: AppConfig) -> Result<Self, ConfigError> {
        let clock: SharedClock = Arc::new(SystemClock);
        let store = build_store(&config, clock.clone()).await;
        let llm_client = build_llm_client(&config.llm)?;

        tracing::info!(
            provider = ?config.llm.provider,
            max_requests = config.rate_limit.max_requests,
            window_secs = config.rate_limit.window_secs,
            "Application state initialized"
        );

        Ok(Self::new(config, store, llm_client, clock))
    }
}

#[cfg(feature = "redis-store")]
async fn build_store(config: &AppConfig, clock: SharedClock) -> SharedStore {
    use crate::store::RedisStore;

    let Some(url) = config.redis_url.as_deref() else {
        tracing::info!("REDIS_URL not set, using in-memory rate limit store");
        return Arc::new(MemoryStore::with_clock(clock));
    };

    match RedisStore::connect(url).await {
        Ok(store) => {
            tracing::info!("Using Redis rate limit store");
            Arc::new(store)
        }
        Err(e) => {
            tracing::error!(error = %e, "Redis connection failed, falling back to in-memory store");
            Arc::new(MemoryStore::with_clock(clock))
        }
    }
}

#[cfg(not(feature = "redis-store"))]
async fn build_store(config: &AppConfig, clock: SharedClock) -> SharedStore {
    if config.redis_url.is_some() {
        tracing::warn!(
            "REDIS_URL is set but the redis-store feature is disabled, using in-memory store"
        );
    }
    Arc::new(MemoryStore::with_clock(clock))
}
