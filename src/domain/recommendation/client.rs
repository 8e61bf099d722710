//! LLM 공급자 클라이언트
//!
//! 클라이언트는 공급자 원본 응답을 `serde_json::Value`로 그대로 돌려줍니다.
//! 봉투 해석은 `envelope` 모듈이 담당합니다.

use std::sync::Arc;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use serde_json::{json, Value};

use crate::config::{ConfigError, LlmConfig, LlmProvider};
use crate::utils::error::AppError;

const WORKERS_AI_BASE_URL: &str = "https://api.cloudflare.com/client/v4/accounts";

/// 단일 채팅 완성 요청
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// LLM 클라이언트 인터페이스
///
/// 테스트에서 Mock 또는 가짜 구현으로 대체합니다.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// 채팅 완성 요청 후 공급자 원본 응답 반환
    async fn complete(&self, request: CompletionRequest) -> Result<Value, AppError>;
}

/// Arc로 래핑된 LlmClient (Clone 지원)
pub type SharedLlmClient = Arc<dyn LlmClient>;

/// 설정된 공급자에 맞는 클라이언트 생성
pub fn build_llm_client(config: &LlmConfig) -> Result<SharedLlmClient, ConfigError> {
    match config.provider {
        // 키가 비어 있으면 호출 시점에 업스트림 인증 에러로 처리됨
        LlmProvider::OpenAi => Ok(Arc::new(OpenAiClient::new(
            &config.openai_api_key,
            &config.openai_model,
        ))),
        LlmProvider::WorkersAi => {
            if config.cf_account_id.is_empty() {
                return Err(ConfigError::MissingVar("CF_ACCOUNT_ID"));
            }
            if config.cf_api_token.is_empty() {
                return Err(ConfigError::MissingVar("CF_API_TOKEN"));
            }
            Ok(Arc::new(WorkersAiClient::new(
                &config.cf_account_id,
                &config.cf_api_token,
                &config.workers_ai_model,
            )))
        }
    }
}

/// OpenAI 에러를 업스트림 에러로 변환 (분류는 로그용)
fn classify_openai_error(error: OpenAIError) -> AppError {
    match &error {
        OpenAIError::ApiError(api_err) => {
            let err_type = api_err.r#type.as_deref().unwrap_or("");
            let err_code = api_err.code.as_deref().unwrap_or("");
            let message = &api_err.message;

            let kind = if err_code == "invalid_api_key" || message.contains("API key") {
                "auth"
            } else if err_type == "rate_limit_error" || err_code == "rate_limit_exceeded" {
                "rate_limit"
            } else if err_type == "server_error" {
                "server"
            } else {
                "api"
            };
            AppError::upstream(format!("openai {} error: {}", kind, message))
        }
        OpenAIError::Reqwest(req_err) => {
            let kind = if req_err.is_timeout() || req_err.is_connect() {
                "transport"
            } else {
                "http"
            };
            AppError::upstream(format!("openai {} error: {}", kind, req_err))
        }
        OpenAIError::JSONDeserialize(e) => {
            AppError::upstream(format!("openai response decode error: {}", e))
        }
        _ => AppError::upstream(format!("openai error: {}", error)),
    }
}

/// OpenAI Chat Completions 클라이언트
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: &str, model: &str) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Client::with_config(config),
            model: model.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<Value, AppError> {
        let messages = vec![
            build_system_message(&request.system)?,
            build_user_message(&request.user)?,
        ];

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .max_tokens(request.max_tokens)
            .temperature(request.temperature)
            .response_format(ResponseFormat::JsonObject)
            .build()
            .map_err(request_build_failed)?;

        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(classify_openai_error)?;

        serde_json::to_value(response)
            .map_err(|e| AppError::upstream(format!("failed to re-encode completion: {}", e)))
    }
}

/// 요청 조립 실패도 추천 경로의 500 응답 메시지를 따름
fn request_build_failed(error: OpenAIError) -> AppError {
    AppError::upstream(format!("failed to build openai request: {}", error))
}

fn build_system_message(content: &str) -> Result<ChatCompletionRequestMessage, AppError> {
    Ok(ChatCompletionRequestMessage::System(
        ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()
            .map_err(request_build_failed)?,
    ))
}

fn build_user_message(content: &str) -> Result<ChatCompletionRequestMessage, AppError> {
    Ok(ChatCompletionRequestMessage::User(
        ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()
            .map_err(request_build_failed)?,
    ))
}

/// Cloudflare Workers AI REST 클라이언트
#[derive(Clone)]
pub struct WorkersAiClient {
    http: reqwest::Client,
    endpoint: String,
    api_token: String,
}

impl WorkersAiClient {
    pub fn new(account_id: &str, api_token: &str, model: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/{}/ai/run/{}", WORKERS_AI_BASE_URL, account_id, model),
            api_token: api_token.to_string(),
        }
    }

    fn request_body(request: &CompletionRequest) -> Value {
        json!({
            "messages": [
                {"role": "system", "content": request.system},
                {"role": "user", "content": request.user},
            ],
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
        })
    }
}

#[async_trait::async_trait]
impl LlmClient for WorkersAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<Value, AppError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .json(&Self::request_body(&request))
            .send()
            .await
            .map_err(|e| AppError::upstream(format!("workers ai request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AppError::upstream(format!(
                "workers ai returned {}: {}",
                status, body
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AppError::upstream(format!("workers ai response is not JSON: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::UPSTREAM_FAILURE_MESSAGE;
    use async_openai::error::ApiError;

    fn request() -> CompletionRequest {
        CompletionRequest {
            system: "system".to_string(),
            user: "user".to_string(),
            max_tokens: 800,
            temperature: 0.3,
        }
    }

    #[test]
    fn should_build_messages() {
        assert!(build_system_message("test prompt").is_ok());
        assert!(build_user_message("test content").is_ok());
    }

    #[test]
    fn request_build_failure_should_render_upstream_message() {
        let error = request_build_failed(OpenAIError::InvalidArgument("model".to_string()));

        assert!(matches!(error, AppError::Upstream(_)));
        assert_eq!(error.message(), UPSTREAM_FAILURE_MESSAGE);
    }

    #[test]
    fn should_classify_api_error_by_code() {
        let error = classify_openai_error(OpenAIError::ApiError(ApiError {
            message: "Incorrect key provided".to_string(),
            r#type: Some("invalid_request_error".to_string()),
            param: None,
            code: Some("invalid_api_key".to_string()),
        }));

        assert!(matches!(error, AppError::Upstream(msg) if msg.starts_with("openai auth error")));
    }

    #[test]
    fn workers_ai_endpoint_should_include_account_and_model() {
        let client = WorkersAiClient::new("acc", "token", "@cf/meta/llama-3.1-8b-instruct");
        assert_eq!(
            client.endpoint,
            "https://api.cloudflare.com/client/v4/accounts/acc/ai/run/@cf/meta/llama-3.1-8b-instruct"
        );
    }

    #[test]
    fn workers_ai_body_should_carry_bounds() {
        let body = WorkersAiClient::request_body(&request());

        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "user");
        assert_eq!(body["max_tokens"], 800);
        assert!((body["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn build_should_require_workers_ai_credentials() {
        let workers = LlmConfig {
            provider: LlmProvider::WorkersAi,
            cf_account_id: "acc".to_string(),
            ..LlmConfig::default()
        };
        assert!(matches!(
            build_llm_client(&workers),
            Err(ConfigError::MissingVar("CF_API_TOKEN"))
        ));
    }

    #[test]
    fn build_should_create_client_when_configured() {
        let config = LlmConfig {
            openai_api_key: "sk-test".to_string(),
            ..LlmConfig::default()
        };
        assert!(build_llm_client(&config).is_ok());
    }
}
