//! 추천 요청 본문 검증
//!
//! 검사 순서: query → 좌표 타입 → latitude 범위 → longitude 범위.
//! 처음 실패한 규칙의 메시지만 반환합니다.

use serde_json::Value;
use validator::Validate;

use super::dto::LocationQuery;
use crate::utils::error::AppError;

const QUERY_REQUIRED: &str = "Query is required and must be a string";
const COORDINATES_REQUIRED: &str = "Valid latitude and longitude are required";

/// JSON 본문을 `LocationQuery`로 검증
pub fn validate(body: &Value) -> Result<LocationQuery, AppError> {
    let query = body
        .get("query")
        .and_then(Value::as_str)
        .filter(|query| !query.is_empty())
        .ok_or_else(|| AppError::validation(QUERY_REQUIRED))?;

    let latitude = body.get("latitude").and_then(Value::as_f64);
    let longitude = body.get("longitude").and_then(Value::as_f64);
    let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
        return Err(AppError::validation(COORDINATES_REQUIRED));
    };

    let location = LocationQuery {
        query: query.to_string(),
        latitude,
        longitude,
    };

    if let Err(errors) = location.validate() {
        let field_errors = errors.field_errors();
        let message = ["query", "latitude", "longitude"]
            .into_iter()
            .find_map(|field| field_errors.get(field).and_then(|errs| errs.first()))
            .and_then(|error| error.message.as_ref())
            .map(|message| message.to_string())
            .unwrap_or_else(|| errors.to_string());
        return Err(AppError::validation(message));
    }

    Ok(location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message_of(body: Value) -> String {
        match validate(&body) {
            Err(AppError::Validation(message)) => message,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn should_accept_valid_query() {
        let location =
            validate(&json!({"query": "parks", "latitude": 37.5, "longitude": 127.0})).unwrap();

        assert_eq!(location.query, "parks");
        assert_eq!(location.latitude, 37.5);
        assert_eq!(location.longitude, 127.0);
    }

    #[test]
    fn should_accept_integer_coordinates_and_boundaries() {
        assert!(validate(&json!({"query": "q", "latitude": 90, "longitude": -180})).is_ok());
        assert!(validate(&json!({"query": "q", "latitude": -90.0, "longitude": 180.0})).is_ok());
    }

    #[test]
    fn should_reject_missing_or_empty_query() {
        assert_eq!(message_of(json!({"latitude": 0, "longitude": 0})), QUERY_REQUIRED);
        assert_eq!(
            message_of(json!({"query": "", "latitude": 0, "longitude": 0})),
            QUERY_REQUIRED
        );
        assert_eq!(
            message_of(json!({"query": 7, "latitude": 0, "longitude": 0})),
            QUERY_REQUIRED
        );
    }

    #[test]
    fn should_report_query_before_coordinates() {
        assert_eq!(message_of(json!({})), QUERY_REQUIRED);
    }

    #[test]
    fn should_reject_non_numeric_coordinates() {
        assert_eq!(
            message_of(json!({"query": "q", "latitude": "37.5", "longitude": 127})),
            COORDINATES_REQUIRED
        );
        assert_eq!(
            message_of(json!({"query": "q", "latitude": 37.5})),
            COORDINATES_REQUIRED
        );
        assert_eq!(
            message_of(json!({"query": "q", "latitude": null, "longitude": 0})),
            COORDINATES_REQUIRED
        );
    }

    #[test]
    fn should_reject_latitude_out_of_range() {
        assert_eq!(
            message_of(json!({"query": "q", "latitude": 90.0001, "longitude": 0})),
            "Latitude must be between -90 and 90"
        );
    }

    #[test]
    fn should_reject_longitude_out_of_range() {
        assert_eq!(
            message_of(json!({"query": "q", "latitude": 0, "longitude": -180.5})),
            "Longitude must be between -180 and 180"
        );
    }

    #[test]
    fn should_report_latitude_before_longitude() {
        assert_eq!(
            message_of(json!({"query": "q", "latitude": 100, "longitude": 200})),
            "Latitude must be between -90 and 90"
        );
    }
}
