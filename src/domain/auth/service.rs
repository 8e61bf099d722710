use std::fmt;

use chrono::Duration;

use crate::utils::clock::SharedClock;
use crate::utils::error::AppError;
use crate::utils::jwt::{decode_token, encode_token, Claims};

/// 검증을 통과한 기기 식별자
///
/// Rate Limit과 인증의 유일한 주체입니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 익명 토큰 발급/검증 서비스
///
/// 만료 판단은 주입된 시계 기준입니다 (`now >= exp`이면 만료, 유예 없음).
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    ttl_secs: i64,
    clock: SharedClock,
}

impl TokenService {
    pub fn new(secret: impl Into<String>, ttl_secs: i64, clock: SharedClock) -> Self {
        Self {
            secret: secret.into(),
            ttl_secs,
            clock,
        }
    }

    /// 기기 식별자에 대한 토큰 발급
    pub fn issue(&self, device_id: &str) -> Result<String, AppError> {
        if device_id.is_empty() {
            return Err(AppError::validation("deviceId is required"));
        }

        let now = self.clock.now();
        let exp = Duration::try_seconds(self.ttl_secs)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| AppError::internal("token expiry out of range"))?;

        let claims = Claims {
            sub: device_id.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        let token = encode_token(&claims, &self.secret)?;
        tracing::debug!(device_id = %device_id, exp = claims.exp, "Token issued");
        Ok(token)
    }

    /// 토큰 검증 후 기기 식별자 반환
    pub fn verify(&self, token: &str) -> Result<DeviceId, AppError> {
        let claims = decode_token(token, &self.secret)?;

        if self.clock.now().timestamp() >= claims.exp {
            tracing::debug!(device_id = %claims.sub, "Token expired");
            return Err(AppError::unauthorized("Invalid or expired token"));
        }
        if claims.sub.is_empty() {
            return Err(AppError::unauthorized("Invalid or expired token"));
        }

        Ok(DeviceId(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::config::app_config::DEFAULT_TOKEN_TTL_SECS;
    use crate::utils::clock::{Clock, ManualClock};

    const SECRET: &str = "test-secret";

    fn service() -> (TokenService, ManualClock) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        let service = TokenService::new(SECRET, DEFAULT_TOKEN_TTL_SECS, Arc::new(clock.clone()));
        (service, clock)
    }

    #[test]
    fn should_issue_token_that_verifies_to_same_identity() {
        // Arrange
        let (service, _) = service();

        // Act
        let token = service.issue("device-1").unwrap();
        let device_id = service.verify(&token).unwrap();

        // Assert
        assert_eq!(device_id.as_str(), "device-1");
    }

    #[test]
    fn issued_token_should_expire_seven_days_after_issuance() {
        let (service, clock) = service();
        let token = service.issue("device-1").unwrap();

        let claims = decode_token(&token, SECRET).unwrap();
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
        assert_eq!(claims.iat, clock.now().timestamp());
    }

    #[test]
    fn should_reject_empty_identity() {
        let (service, _) = service();
        assert!(matches!(service.issue(""), Err(AppError::Validation(_))));
    }

    #[test]
    fn should_accept_token_one_second_before_expiry() {
        let (service, clock) = service();
        let token = service.issue("device-1").unwrap();

        clock.advance(Duration::seconds(DEFAULT_TOKEN_TTL_SECS - 1));

        assert!(service.verify(&token).is_ok());
    }

    #[test]
    fn should_reject_token_at_expiry() {
        let (service, clock) = service();
        let token = service.issue("device-1").unwrap();

        clock.advance(Duration::seconds(DEFAULT_TOKEN_TTL_SECS));

        let result = service.verify(&token);
        assert!(matches!(result, Err(AppError::Unauthorized(msg)) if msg == "Invalid or expired token"));
    }

    #[test]
    fn should_reject_token_signed_with_other_secret() {
        let (service, clock) = service();
        let other = TokenService::new("other", DEFAULT_TOKEN_TTL_SECS, Arc::new(clock));
        let token = other.issue("device-1").unwrap();

        assert!(matches!(service.verify(&token), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn should_reject_malformed_token() {
        let (service, _) = service();
        assert!(matches!(service.verify("not.a.jwt"), Err(AppError::Unauthorized(_))));
    }
}
