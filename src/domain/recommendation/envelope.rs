//! LLM 응답 봉투(envelope) 해석
//!
//! 공급자마다 모델 출력을 감싸는 형태가 달라 경계에서 한 번만 태그드 유니온으로
//! 정리합니다. 이후 단계는 `LlmEnvelope`만 다룹니다.

use serde_json::Value;

use crate::utils::error::AppError;

/// 해석된 LLM 응답
#[derive(Debug, Clone, PartialEq)]
pub enum LlmEnvelope {
    /// 이미 JSON 객체로 파싱된 문서
    Parsed(Value),
    /// JSON으로 파싱해야 하는 모델 출력 텍스트
    Text(String),
    /// 알 수 없는 형태
    Unrecognized(Value),
}

impl LlmEnvelope {
    /// 공급자 원본 응답을 해석합니다.
    ///
    /// 지원 형태:
    /// - `{"response": <string|object>}` (Workers AI)
    /// - `{"choices": [{"message": {"content": <string>}}]}` (OpenAI 호환)
    /// - `{"result": {...}}` (Workers AI REST, 위 두 형태를 한 번 감쌈)
    /// - `suggestions`를 가진 객체, 또는 문자열 그대로
    pub fn from_raw(raw: Value) -> Self {
        Self::resolve(raw, true)
    }

    fn resolve(raw: Value, unwrap_result: bool) -> Self {
        let object = match raw {
            Value::String(text) => return LlmEnvelope::Text(text),
            Value::Object(ref object) => object,
            other => return LlmEnvelope::Unrecognized(other),
        };

        if let Some(response) = object.get("response") {
            return match response {
                Value::String(text) => LlmEnvelope::Text(text.clone()),
                Value::Object(_) => LlmEnvelope::Parsed(response.clone()),
                _ => LlmEnvelope::Unrecognized(raw),
            };
        }

        if let Some(choices) = object.get("choices") {
            return match choices
                .get(0)
                .and_then(|choice| choice.get("message"))
                .and_then(|message| message.get("content"))
                .and_then(Value::as_str)
            {
                Some(content) => LlmEnvelope::Text(content.to_string()),
                None => LlmEnvelope::Unrecognized(raw),
            };
        }

        if unwrap_result {
            if let Some(result) = object.get("result").filter(|result| result.is_object()) {
                return Self::resolve(result.clone(), false);
            }
        }

        if object.contains_key("suggestions") {
            return LlmEnvelope::Parsed(raw);
        }

        LlmEnvelope::Unrecognized(raw)
    }

    /// 모델 출력 문서를 JSON 값으로 꺼냅니다.
    pub fn into_document(self) -> Result<Value, AppError> {
        match self {
            LlmEnvelope::Parsed(document) => Ok(document),
            LlmEnvelope::Text(text) => serde_json::from_str(strip_code_fence(&text))
                .map_err(|e| AppError::upstream(format!("model output is not valid JSON: {}", e))),
            LlmEnvelope::Unrecognized(raw) => Err(AppError::upstream(format!(
                "unexpected LLM response format: {}",
                truncate(&raw.to_string(), 200)
            ))),
        }
    }
}

/// 마크다운 코드 블록(```json ... ```)으로 감싼 출력 처리
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    // 언어 태그 줄 제거
    match inner.split_once('\n') {
        Some((tag, body)) if !tag.trim_start().starts_with('{') => body.trim(),
        _ => inner.trim(),
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
