use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// 장소 카테고리
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub enum PlaceCategory {
    Park,
    Restaurant,
    Museum,
    Activity,
    Landmark,
    Shopping,
    Other,
}

impl PlaceCategory {
    pub const ALL: [PlaceCategory; 7] = [
        PlaceCategory::Park,
        PlaceCategory::Restaurant,
        PlaceCategory::Museum,
        PlaceCategory::Activity,
        PlaceCategory::Landmark,
        PlaceCategory::Shopping,
        PlaceCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceCategory::Park => "Park",
            PlaceCategory::Restaurant => "Restaurant",
            PlaceCategory::Museum => "Museum",
            PlaceCategory::Activity => "Activity",
            PlaceCategory::Landmark => "Landmark",
            PlaceCategory::Shopping => "Shopping",
            PlaceCategory::Other => "Other",
        }
    }

    /// 대소문자 무시 매칭, 목록에 없으면 `Other`
    pub fn from_loose(value: &str) -> Self {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(value))
            .unwrap_or(PlaceCategory::Other)
    }
}

/// 검증을 통과한 위치 기반 질의
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Validate, ToSchema)]
pub struct LocationQuery {
    /// 자연어 질의
    #[validate(length(min = 1, message = "Query is required and must be a string"))]
    #[schema(example = "quiet coffee shops")]
    pub query: String,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    #[schema(example = 37.5665)]
    pub latitude: f64,

    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    #[schema(example = 126.978)]
    pub longitude: f64,
}

/// 정규화된 장소 추천
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRecommendation {
    pub name: String,
    /// 한 문장 요약
    pub description: String,
    pub category: PlaceCategory,
    /// 사용자 위치로부터의 대략적인 거리 (km)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    /// 지도 검색 링크
    pub map_link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// 추천 성공 응답 (OpenAPI 스키마용)
#[derive(Debug, Serialize, ToSchema)]
pub struct RecommendationsResponse {
    #[schema(example = true)]
    pub success: bool,
    pub data: Vec<PlaceRecommendation>,
}
