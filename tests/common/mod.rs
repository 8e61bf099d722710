//! 통합 테스트 공용 헬퍼
#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum::http::{header::AUTHORIZATION, HeaderName, HeaderValue};
use axum_test::TestServer;
use bemyguide_server::{
    app,
    config::AppConfig,
    domain::recommendation::client::{CompletionRequest, LlmClient},
    store::{KvStore, MemoryStore, SharedStore, StoreError},
    utils::{clock::ManualClock, error::AppError},
    AppState,
};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

pub const JWT_SECRET: &str = "integration-test-secret";

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

/// 고정 응답을 돌려주고 호출 횟수를 세는 가짜 LLM
pub struct FakeLlm {
    response: Result<Value, String>,
    calls: AtomicUsize,
}

impl FakeLlm {
    pub fn returning(response: Value) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(response),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(detail: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Err(detail.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl LlmClient for FakeLlm {
    async fn complete(&self, _request: CompletionRequest) -> Result<Value, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone().map_err(AppError::upstream)
    }
}

/// 항상 실패하는 저장소
pub struct UnavailableStore;

#[async_trait::async_trait]
impl KvStore for UnavailableStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn put(&self, _key: &str, _value: String, _ttl_secs: u64) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

/// Workers AI 형태의 정상 응답
pub fn workers_ai_response() -> Value {
    let document = json!({
        "suggestions": [
            {
                "name": "Seoul Forest",
                "description": "A large urban park by the Han River.",
                "category": "Park",
                "distance_km": 2.4,
                "website_url": null,
                "latitude": 37.5444,
                "longitude": 127.0374
            },
            {
                "name": "National Museum of Korea",
                "description": "The flagship museum of Korean history and art.",
                "category": "museum",
                "distance_km": "far",
                "website_url": "https://www.museum.go.kr",
                "latitude": null,
                "longitude": null
            }
        ]
    });
    json!({ "response": document.to_string() })
}

pub struct TestApp {
    pub server: TestServer,
    pub clock: ManualClock,
    pub llm: Arc<FakeLlm>,
}

impl TestApp {
    pub fn new(llm: Arc<FakeLlm>) -> Self {
        let clock = ManualClock::new(start_time());
        let store: SharedStore = Arc::new(MemoryStore::with_clock(Arc::new(clock.clone())));
        Self::with_store(llm, store, clock)
    }

    pub fn with_store(llm: Arc<FakeLlm>, store: SharedStore, clock: ManualClock) -> Self {
        let config = AppConfig {
            jwt_secret: JWT_SECRET.to_string(),
            ..AppConfig::default()
        };
        let state = AppState::new(config, store, llm.clone(), Arc::new(clock.clone()));
        let server = TestServer::new(app(state)).unwrap();

        Self { server, clock, llm }
    }

    /// 익명 토큰 발급
    pub async fn token_for(&self, device_id: &str) -> String {
        let response = self
            .server
            .post("/auth/anonymous")
            .json(&json!({ "deviceId": device_id }))
            .await;
        response.assert_status_ok();
        response.json::<Value>()["token"]
            .as_str()
            .unwrap()
            .to_string()
    }
}

pub fn bearer(token: &str) -> (HeaderName, HeaderValue) {
    (
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    )
}

pub fn seoul_query() -> Value {
    json!({ "query": "parks and museums", "latitude": 37.5665, "longitude": 126.978 })
}
