use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::utils::error::AppError;

const DEVICE_ID_REQUIRED: &str = "deviceId is required";

/// 익명 인증 요청 DTO
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnonymousAuthRequest {
    /// 클라이언트가 생성한 기기 식별자
    #[validate(length(min = 1, message = "deviceId is required"))]
    #[schema(example = "device_123")]
    pub device_id: String,
}

impl AnonymousAuthRequest {
    /// JSON 본문에서 요청을 추출합니다.
    ///
    /// `deviceId`가 없거나 문자열이 아니거나 비어 있으면 같은 메시지로 거부합니다.
    pub fn from_value(body: &Value) -> Result<Self, AppError> {
        let device_id = body
            .get("deviceId")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::validation(DEVICE_ID_REQUIRED))?;

        let request = Self {
            device_id: device_id.to_string(),
        };
        request
            .validate()
            .map_err(|_| AppError::validation(DEVICE_ID_REQUIRED))?;

        Ok(request)
    }
}

/// 익명 인증 응답 DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct AnonymousAuthResponse {
    #[schema(example = true)]
    pub success: bool,
    /// 7일 유효 Bearer 토큰
    pub token: String,
}

impl AnonymousAuthResponse {
    pub fn new(token: String) -> Self {
        Self {
            success: true,
            token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn should_extract_device_id() {
        let request = AnonymousAuthRequest::from_value(&json!({"deviceId": "abc"})).unwrap();
        assert_eq!(request.device_id, "abc");
    }

    #[test]
    fn should_reject_missing_device_id() {
        let result = AnonymousAuthRequest::from_value(&json!({}));
        assert!(matches!(result, Err(AppError::Validation(msg)) if msg == DEVICE_ID_REQUIRED));
    }

    #[test]
    fn should_reject_non_string_device_id() {
        let result = AnonymousAuthRequest::from_value(&json!({"deviceId": 42}));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn should_reject_empty_device_id() {
        let result = AnonymousAuthRequest::from_value(&json!({"deviceId": ""}));
        assert!(matches!(result, Err(AppError::Validation(msg)) if msg == DEVICE_ID_REQUIRED));
    }

    #[test]
    fn should_reject_non_object_body() {
        let result = AnonymousAuthRequest::from_value(&json!(["abc"]));
        assert!(result.is_err());
    }

    #[test]
    fn response_should_serialize_with_success_flag() {
        let json = serde_json::to_value(AnonymousAuthResponse::new("t".into())).unwrap();
        assert_eq!(json, json!({"success": true, "token": "t"}));
    }
}
