//! Rate Limit 상태를 보관하는 공유 key-value 저장소
//!
//! 저장소가 제공해야 하는 계약은 두 가지뿐입니다.
//! - `get(key)`: 값이 없거나 만료되었으면 `None`
//! - `put(key, value, ttl)`: 덮어쓰기(last-write-wins), TTL이 지나면 자동 만료
//!
//! 조건부 쓰기나 잠금은 요구하지 않습니다. 동시 요청 간 경합은 호출 측에서 허용합니다.

use std::sync::Arc;

pub mod memory;
#[cfg(feature = "redis-store")]
pub mod redis;

pub use memory::MemoryStore;
#[cfg(feature = "redis-store")]
pub use self::redis::{RedisStore, RedisStoreConfig};

/// 저장소 접근 실패
///
/// 클라이언트에 노출되지 않습니다. Rate Limiter가 로그만 남기고 요청을 통과시킵니다.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store operation failed: {0}")]
    Operation(String),
}

/// 공유 key-value 저장소 인터페이스
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait KvStore: Send + Sync {
    /// 키에 저장된 값 조회
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// 값 저장 (ttl_secs 이후 만료)
    async fn put(&self, key: &str, value: String, ttl_secs: u64) -> Result<(), StoreError>;
}

/// Arc로 래핑된 저장소 (Clone 지원)
pub type SharedStore = Arc<dyn KvStore>;
