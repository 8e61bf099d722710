use super::dto::{LocationQuery, PlaceCategory};

/// 장소 추천 프롬프트 템플릿
pub struct RecommendationPrompt;

impl RecommendationPrompt {
    /// 시스템 프롬프트 (출력 스키마와 카테고리 목록 고정)
    pub fn system_prompt() -> String {
        let categories = PlaceCategory::ALL
            .iter()
            .map(|category| format!("'{}'", category.as_str()))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "You are a local guide assistant named 'bemyguide'. \
Your task is to find relevant places for the user based on their query and location. \
ALWAYS respond with a valid JSON object containing a single key 'suggestions' which is an array of places. \
Each place must have the following keys: 'name', 'description', 'category', 'distance_km', 'website_url', 'latitude', and 'longitude'. \
The 'description' should be a concise, one-sentence summary. \
The 'distance_km' should be the approximate distance in kilometers from the user's location to the suggested place. \
If you cannot find a website, set 'website_url' to null. \
If you cannot find the exact coordinates, set 'latitude' and 'longitude' to null. \
The 'category' should be one of: {}. \
Do not include any text outside of the JSON object.",
            categories
        )
    }

    /// 사용자 프롬프트 (질의 원문과 좌표)
    pub fn user_prompt(location: &LocationQuery) -> String {
        format!(
            "User query: '{}'. My current location is latitude {} and longitude {}.",
            location.query, location.latitude, location.longitude
        )
    }
}
