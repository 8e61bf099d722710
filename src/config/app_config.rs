use std::env;
use std::str::FromStr;

/// 토큰 기본 유효 기간 (7일)
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// 애플리케이션 설정
///
/// 기동 시 한 번 로드되어 각 컴포넌트 생성자에 주입되며 이후 변경되지 않습니다.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub rate_limit: RateLimitConfig,
    /// 설정 시 Redis 저장소 사용 (`redis-store` feature 필요)
    pub redis_url: Option<String>,
    pub llm: LlmConfig,
}

/// 고정 윈도우 Rate Limit 설정
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// 윈도우당 최대 요청 수
    pub max_requests: u32,
    /// 윈도우 길이 (초)
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 30,
            window_secs: 60 * 60,
        }
    }
}

/// LLM 제공자
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAi,
    WorkersAi,
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(LlmProvider::OpenAi),
            "workers-ai" | "workers_ai" | "cloudflare" => Ok(LlmProvider::WorkersAi),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

/// LLM 호출 설정
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub openai_api_key: String,
    pub openai_model: String,
    pub cf_account_id: String,
    pub cf_api_token: String,
    pub workers_ai_model: String,
    /// 응답 최대 토큰 수
    pub max_tokens: u32,
    /// 낮을수록 스키마 준수가 안정적
    pub temperature: f32,
    /// LLM 호출 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::OpenAi,
            openai_api_key: String::new(),
            openai_model: "gpt-4o-mini".to_string(),
            cf_account_id: String::new(),
            cf_api_token: String::new(),
            workers_ai_model: "@cf/meta/llama-3.1-8b-instruct".to_string(),
            max_tokens: 800,
            temperature: 0.3,
            timeout_secs: 25,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_port: 8080,
            jwt_secret: "secret".to_string(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            rate_limit: RateLimitConfig::default(),
            redis_url: None,
            llm: LlmConfig::default(),
        }
    }
}

impl AppConfig {
    /// 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = AppConfig::default();

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| defaults.server_port.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!(
                "JWT_SECRET 환경변수가 설정되지 않았습니다. 프로덕션 환경에서는 반드시 설정하세요."
            );
            defaults.jwt_secret.clone()
        });

        let token_ttl_secs = parse_var("TOKEN_TTL_SECS", defaults.token_ttl_secs)?;
        if token_ttl_secs <= 0 {
            return Err(ConfigError::InvalidNumber("TOKEN_TTL_SECS"));
        }

        let rate_limit = RateLimitConfig {
            max_requests: parse_var("RATE_LIMIT_MAX_REQUESTS", defaults.rate_limit.max_requests)?,
            window_secs: parse_var("RATE_LIMIT_WINDOW_SECS", defaults.rate_limit.window_secs)?,
        };
        if rate_limit.max_requests == 0 {
            return Err(ConfigError::InvalidNumber("RATE_LIMIT_MAX_REQUESTS"));
        }
        if rate_limit.window_secs == 0 {
            return Err(ConfigError::InvalidNumber("RATE_LIMIT_WINDOW_SECS"));
        }

        let redis_url = env::var("REDIS_URL").ok().filter(|url| !url.is_empty());

        Ok(Self {
            server_port,
            jwt_secret,
            token_ttl_secs,
            rate_limit,
            redis_url,
            llm: LlmConfig::from_env(defaults.llm)?,
        })
    }
}

impl LlmConfig {
    fn from_env(defaults: LlmConfig) -> Result<Self, ConfigError> {
        let provider = match env::var("LLM_PROVIDER") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.provider,
        };

        let openai_api_key = env::var("OPENAI_API_KEY").unwrap_or_default();
        let cf_account_id = env::var("CF_ACCOUNT_ID").unwrap_or_default();
        let cf_api_token = env::var("CF_API_TOKEN").unwrap_or_default();

        match provider {
            LlmProvider::OpenAi if openai_api_key.is_empty() => {
                tracing::warn!(
                    "OPENAI_API_KEY 환경변수가 설정되지 않았습니다. 프로덕션 환경에서는 반드시 설정하세요."
                );
            }
            LlmProvider::WorkersAi if cf_account_id.is_empty() => {
                return Err(ConfigError::MissingVar("CF_ACCOUNT_ID"));
            }
            LlmProvider::WorkersAi if cf_api_token.is_empty() => {
                return Err(ConfigError::MissingVar("CF_API_TOKEN"));
            }
            _ => {}
        }

        let temperature: f32 = parse_var("LLM_TEMPERATURE", defaults.temperature)?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::InvalidNumber("LLM_TEMPERATURE"));
        }

        Ok(Self {
            provider,
            openai_api_key,
            openai_model: env::var("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            cf_account_id,
            cf_api_token,
            workers_ai_model: env::var("WORKERS_AI_MODEL").unwrap_or(defaults.workers_ai_model),
            max_tokens: parse_var("LLM_MAX_TOKENS", defaults.max_tokens)?,
            temperature,
            timeout_secs: parse_var("LLM_TIMEOUT_SECS", defaults.timeout_secs)?,
        })
    }
}

/// 설정되지 않은 변수는 기본값, 설정되었으나 파싱 불가한 값은 에러
fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidNumber(name)),
        Err(_) => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,
    #[error("Invalid numeric value for {0}")]
    InvalidNumber(&'static str),
    #[error("Unknown LLM provider: {0}")]
    UnknownProvider(String),
    #[error("{0} environment variable is required for the selected LLM provider")]
    MissingVar(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rate_limit_should_be_30_per_hour() {
        let config = RateLimitConfig::default();

        assert_eq!(config.max_requests, 30);
        assert_eq!(config.window_secs, 3600);
    }

    #[test]
    fn default_token_ttl_should_be_seven_days() {
        assert_eq!(AppConfig::default().token_ttl_secs, 604_800);
    }

    #[test]
    fn default_llm_config_should_favor_determinism() {
        let config = LlmConfig::default();

        assert_eq!(config.max_tokens, 800);
        assert!(config.temperature <= 0.3);
        assert_eq!(config.timeout_secs, 25);
    }

    #[test]
    fn should_parse_provider_names() {
        assert_eq!("openai".parse::<LlmProvider>().unwrap(), LlmProvider::OpenAi);
        assert_eq!(
            "Workers-AI".parse::<LlmProvider>().unwrap(),
            LlmProvider::WorkersAi
        );
        assert!(matches!(
            "bard".parse::<LlmProvider>(),
            Err(ConfigError::UnknownProvider(_))
        ));
    }
}
