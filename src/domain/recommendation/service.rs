use std::time::{Duration, Instant};

use super::{
    client::{CompletionRequest, SharedLlmClient},
    dto::{LocationQuery, PlaceRecommendation},
    envelope::LlmEnvelope,
    normalizer,
    prompt::RecommendationPrompt,
};
use crate::config::LlmConfig;
use crate::utils::error::AppError;

/// 장소 추천 서비스
///
/// 프롬프트 생성, LLM 호출, 봉투 해석, 정규화를 순서대로 수행합니다.
/// 재시도는 하지 않습니다.
#[derive(Clone)]
pub struct RecommendationService {
    client: SharedLlmClient,
    config: LlmConfig,
}

impl RecommendationService {
    pub fn new(client: SharedLlmClient, config: LlmConfig) -> Self {
        Self { client, config }
    }

    pub async fn recommend(
        &self,
        location: &LocationQuery,
    ) -> Result<Vec<PlaceRecommendation>, AppError> {
        let request = CompletionRequest {
            system: RecommendationPrompt::system_prompt(),
            user: RecommendationPrompt::user_prompt(location),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let started = Instant::now();
        let raw = tokio::time::timeout(
            Duration::from_secs(self.config.timeout_secs),
            self.client.complete(request),
        )
        .await
        .map_err(|_| {
            AppError::upstream(format!(
                "LLM call timed out after {}s",
                self.config.timeout_secs
            ))
        })??;

        tracing::debug!(
            latency_ms = started.elapsed().as_millis() as u64,
            "LLM call completed"
        );

        let document = LlmEnvelope::from_raw(raw).into_document()?;
        let places = normalizer::normalize(&document)?;

        tracing::info!(count = places.len(), "Recommendations normalized");
        Ok(places)
    }
}
