//! 모델 출력 문서를 `PlaceRecommendation` 목록으로 정규화
//!
//! 필드 규칙은 `coerce_place` 한 곳에 모여 있습니다. 모델이 잘못된 타입을 주면
//! 실패 대신 기본값으로 대체합니다.

use serde_json::{Map, Value};

use super::dto::{PlaceCategory, PlaceRecommendation};
use crate::utils::error::AppError;

const MAP_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1&query=";

/// `suggestions` 배열을 정규화합니다.
///
/// 배열이 없거나 배열이 아니면 `Upstream` 에러입니다. 빈 배열은 정상입니다.
pub fn normalize(document: &Value) -> Result<Vec<PlaceRecommendation>, AppError> {
    let suggestions = document
        .get("suggestions")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            AppError::upstream("model output does not contain a suggestions array")
        })?;

    Ok(suggestions.iter().map(coerce_place).collect())
}

/// 항목 하나를 스키마에 맞게 변환
///
/// 객체가 아닌 항목은 모든 필드가 기본값인 레코드가 됩니다.
pub fn coerce_place(item: &Value) -> PlaceRecommendation {
    let empty = Map::new();
    let fields = item.as_object().unwrap_or(&empty);

    let name = string_or_empty(fields.get("name"));
    let description = string_or_empty(fields.get("description"));
    let category = fields
        .get("category")
        .and_then(Value::as_str)
        .map(PlaceCategory::from_loose)
        .unwrap_or(PlaceCategory::Other);
    let distance_km = fields
        .get("distance_km")
        .or_else(|| fields.get("distanceKm"))
        .and_then(Value::as_f64);
    let website_url = fields
        .get("website_url")
        .or_else(|| fields.get("websiteUrl"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string);
    let latitude = coordinate(fields.get("latitude"), 90.0);
    let longitude = coordinate(fields.get("longitude"), 180.0);

    PlaceRecommendation {
        map_link: map_link(&name),
        name,
        description,
        category,
        distance_km,
        website_url,
        latitude,
        longitude,
    }
}

/// 장소 이름으로 지도 검색 링크 생성
pub fn map_link(name: &str) -> String {
    format!("{}{}", MAP_SEARCH_URL, urlencoding::encode(name))
}

fn string_or_empty(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

fn coordinate(value: Option<&Value>, bound: f64) -> Option<f64> {
    value
        .and_then(Value::as_f64)
        .filter(|v| (-bound..=bound).contains(v))
}
