//! Redis 기반 저장소
//!
//! 여러 서버 인스턴스가 같은 Rate Limit 윈도우를 공유할 때 사용합니다.
//! `GET` / `SET EX` 두 명령만 사용하며, 키 만료는 Redis TTL에 맡깁니다.

use std::fmt;

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisError};

use super::{KvStore, StoreError};

/// Redis 저장소 설정
#[derive(Debug, Clone)]
pub struct RedisStoreConfig {
    /// 모든 키 앞에 붙는 접두사
    pub key_prefix: String,
}

impl Default for RedisStoreConfig {
    fn default() -> Self {
        Self {
            key_prefix: "bemyguide:".to_string(),
        }
    }
}

/// Redis 저장소
///
/// `ConnectionManager`가 재연결을 처리하며 복제본은 같은 연결을 공유합니다.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
    config: RedisStoreConfig,
}

impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RedisStore {
    /// 기본 설정으로 연결
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        Self::connect_with_config(url, RedisStoreConfig::default()).await
    }

    pub async fn connect_with_config(
        url: &str,
        config: RedisStoreConfig,
    ) -> Result<Self, StoreError> {
        let client = Client::open(url).map_err(unavailable)?;
        let connection = ConnectionManager::new(client).await.map_err(unavailable)?;

        Ok(Self { connection, config })
    }

    fn key(&self, key: &str) -> String {
        format!("{}{}", self.config.key_prefix, key)
    }
}

fn unavailable(error: RedisError) -> StoreError {
    StoreError::Unavailable(error.to_string())
}

fn operation(error: RedisError) -> StoreError {
    if error.is_io_error() || error.is_connection_dropped() || error.is_timeout() {
        StoreError::Unavailable(error.to_string())
    } else {
        StoreError::Operation(error.to_string())
    }
}

#[async_trait::async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection.clone();
        conn.get(self.key(key)).await.map_err(operation)
    }

    async fn put(&self, key: &str, value: String, ttl_secs: u64) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();
        // Redis는 0초 TTL을 거부함
        conn.set_ex::<_, _, ()>(self.key(key), value, ttl_secs.max(1))
            .await
            .map_err(operation)
    }
}
