//! Rate Limiting 모듈
//!
//! 디바이스 ID 단위의 고정 윈도우 카운터입니다. 상태는 공유 key-value 저장소에만
//! 존재하며 요청당 읽기 1회, 쓰기 최대 1회를 수행합니다.
//!
//! # 동시성
//!
//! 읽기-수정-쓰기가 원자적이지 않습니다. 같은 디바이스의 동시 요청이 같은 카운트를
//! 읽고 각자 쓰면 실제보다 적게 집계됩니다. 이는 허용된 best-effort 한계이며
//! 잠금으로 보완하지 않습니다. 윈도우 경계에서는 최대 `2 × max` 요청이 통과할 수 있습니다.
//!
//! # 장애 정책
//!
//! 저장소 장애 시 fail-open: 경고 로그만 남기고 해당 요청은 제한 없이 통과시킵니다.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::RateLimitConfig;
use crate::store::{SharedStore, StoreError};
use crate::utils::clock::SharedClock;

pub const RATE_LIMIT_LIMIT_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-limit");
pub const RATE_LIMIT_REMAINING_HEADER: HeaderName =
    HeaderName::from_static("x-ratelimit-remaining");
pub const RATE_LIMIT_RESET_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-reset");

const KEY_PREFIX: &str = "rate_limit:";

/// 윈도우 길이 상한 (1년)
const MAX_WINDOW_SECS: u64 = 365 * 24 * 60 * 60;

/// 저장소에 기록되는 윈도우 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RateWindow {
    count: u32,
    /// epoch millis
    reset_at: i64,
}

/// 요청 허용 여부와 응답 메타데이터
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
    /// 거부된 경우에만 존재
    pub retry_after_secs: Option<u64>,
}

impl RateLimitDecision {
    /// `X-RateLimit-*` 응답 헤더
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(RATE_LIMIT_LIMIT_HEADER, HeaderValue::from(self.limit));
        headers.insert(RATE_LIMIT_REMAINING_HEADER, HeaderValue::from(self.remaining));
        headers.insert(RATE_LIMIT_RESET_HEADER, HeaderValue::from(self.reset_epoch_secs()));
        headers
    }

    /// 리셋 시각 (epoch seconds, 올림)
    pub fn reset_epoch_secs(&self) -> i64 {
        ceil_div(self.reset_at.timestamp_millis(), 1000)
    }
}

/// 저장소 기반 고정 윈도우 Rate Limiter
#[derive(Clone)]
pub struct RateLimiter {
    store: SharedStore,
    config: RateLimitConfig,
    clock: SharedClock,
}

impl RateLimiter {
    pub fn new(store: SharedStore, config: RateLimitConfig, clock: SharedClock) -> Self {
        Self {
            store,
            config,
            clock,
        }
    }

    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    /// 요청을 집계하고 허용 여부를 반환합니다.
    ///
    /// 저장소 에러는 반환하지 않습니다 (fail-open).
    pub async fn admit(&self, identity: &str) -> RateLimitDecision {
        let now = self.clock.now();

        match self.try_admit(identity, now).await {
            Ok(decision) => {
                tracing::debug!(
                    allowed = decision.allowed,
                    remaining = decision.remaining,
                    "Rate limit evaluated"
                );
                decision
            }
            Err(e) => {
                tracing::warn!(error = %e, "Rate limit store failure, failing open");
                RateLimitDecision {
                    allowed: true,
                    limit: self.config.max_requests,
                    remaining: self.config.max_requests,
                    reset_at: now + self.window(),
                    retry_after_secs: None,
                }
            }
        }
    }

    async fn try_admit(
        &self,
        identity: &str,
        now: DateTime<Utc>,
    ) -> Result<RateLimitDecision, StoreError> {
        let key = format!("{}{}", KEY_PREFIX, identity);
        let max = self.config.max_requests;
        let now_ms = now.timestamp_millis();

        let stored = self
            .store
            .get(&key)
            .await?
            .and_then(|raw| match serde_json::from_str::<RateWindow>(&raw) {
                Ok(window) => Some(window),
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding unreadable rate limit record");
                    None
                }
            });

        match stored {
            // 진행 중인 윈도우
            Some(window) if now_ms < window.reset_at => {
                let reset_at = millis_to_datetime(window.reset_at, now);
                let remaining_secs = remaining_window_secs(window.reset_at, now_ms);

                if window.count >= max {
                    return Ok(RateLimitDecision {
                        allowed: false,
                        limit: max,
                        remaining: 0,
                        reset_at,
                        retry_after_secs: Some(remaining_secs),
                    });
                }

                let next = RateWindow {
                    count: window.count + 1,
                    reset_at: window.reset_at,
                };
                self.write(&key, &next, remaining_secs).await?;

                Ok(RateLimitDecision {
                    allowed: true,
                    limit: max,
                    remaining: max.saturating_sub(next.count),
                    reset_at,
                    retry_after_secs: None,
                })
            }
            // 기록 없음 또는 윈도우 만료: 새 윈도우로 교체
            _ => {
                let reset_at = now + self.window();
                let fresh = RateWindow {
                    count: 1,
                    reset_at: reset_at.timestamp_millis(),
                };
                self.write(&key, &fresh, self.config.window_secs.min(MAX_WINDOW_SECS))
                    .await?;

                Ok(RateLimitDecision {
                    allowed: true,
                    limit: max,
                    remaining: max.saturating_sub(1),
                    reset_at,
                    retry_after_secs: None,
                })
            }
        }
    }

    async fn write(&self, key: &str, window: &RateWindow, ttl_secs: u64) -> Result<(), StoreError> {
        let value = serde_json::to_string(window)
            .map_err(|e| StoreError::Operation(format!("serialize rate window: {}", e)))?;
        self.store.put(key, value, ttl_secs).await
    }

    fn window(&self) -> Duration {
        Duration::seconds(self.config.window_secs.min(MAX_WINDOW_SECS) as i64)
    }
}

/// 남은 윈도우 시간 (초, 올림, 최소 1)
fn remaining_window_secs(reset_at_ms: i64, now_ms: i64) -> u64 {
    u64::try_from(ceil_div(reset_at_ms - now_ms, 1000))
        .unwrap_or(0)
        .max(1)
}

fn ceil_div(value: i64, divisor: i64) -> i64 {
    let quotient = value.div_euclid(divisor);
    if value.rem_euclid(divisor) == 0 {
        quotient
    } else {
        quotient + 1
    }
}

fn millis_to_datetime(millis: i64, fallback: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or(fallback)
}
