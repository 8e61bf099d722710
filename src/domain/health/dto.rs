use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// 헬스체크 응답
#[derive(Serialize, Debug, ToSchema)]
pub struct HealthStatus {
    #[schema(example = "ok")]
    pub status: &'static str,
    /// ISO-8601 (UTC)
    #[schema(example = "2026-01-01T00:00:00.000Z")]
    pub timestamp: String,
}

impl HealthStatus {
    pub fn ok(now: DateTime<Utc>) -> Self {
        Self {
            status: "ok",
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn should_format_timestamp_as_iso8601_utc() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap();

        let json = serde_json::to_value(HealthStatus::ok(now)).unwrap();

        assert_eq!(json["status"], "ok");
        assert_eq!(json["timestamp"], "2026-03-01T12:30:00.000Z");
    }
}
