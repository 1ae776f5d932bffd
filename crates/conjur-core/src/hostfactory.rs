//! Host factory token requests

use crate::{CoreError, Result};
use chrono::{DateTime, Duration, Utc};
use conjur_api::TokenRequest;

/// Token lifetime applied when no duration is given
pub const DEFAULT_TOKEN_LIFETIME_HOURS: i64 = 1;

/// Requested token lifetime; the parts are added together
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenDuration {
    pub minutes: Option<u32>,
    pub hours: Option<u32>,
    pub days: Option<u32>,
}

impl TokenDuration {
    /// Sum of all parts, or one hour if that sum is zero
    pub fn total(&self) -> Duration {
        let total = Duration::minutes(i64::from(self.minutes.unwrap_or(0)))
            + Duration::hours(i64::from(self.hours.unwrap_or(0)))
            + Duration::days(i64::from(self.days.unwrap_or(0)));

        if total == Duration::zero() {
            Duration::hours(DEFAULT_TOKEN_LIFETIME_HOURS)
        } else {
            total
        }
    }
}

/// Parse a `--cidr` argument.
///
/// `all` clears any restriction, `None` leaves it unset, anything else is a
/// comma-separated list.
pub fn format_cidr(cidr: Option<&str>) -> Option<Vec<String>> {
    match cidr {
        None => None,
        Some("all") => Some(Vec::new()),
        Some(list) => Some(
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        ),
    }
}

/// Build a token request expiring `duration` after `now`
pub fn token_request(
    duration: TokenDuration,
    count: Option<u32>,
    cidr: Option<&str>,
    now: DateTime<Utc>,
) -> Result<TokenRequest> {
    let count = count.unwrap_or(1);
    if count == 0 {
        return Err(CoreError::InvalidArgument(
            "token count must be at least 1".to_string(),
        ));
    }

    let expiration = now
        .checked_add_signed(duration.total())
        .ok_or_else(|| CoreError::InvalidArgument("token duration is too long".to_string()))?;

    Ok(TokenRequest {
        expiration,
        count,
        cidr: format_cidr(cidr),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_default_duration_is_one_hour() {
        assert_eq!(TokenDuration::default().total(), Duration::hours(1));
        let zero = TokenDuration {
            minutes: Some(0),
            ..Default::default()
        };
        assert_eq!(zero.total(), Duration::hours(1));
    }

    #[test]
    fn test_durations_add_up() {
        let duration = TokenDuration {
            minutes: Some(30),
            hours: Some(2),
            days: Some(1),
        };
        assert_eq!(
            duration.total(),
            Duration::days(1) + Duration::hours(2) + Duration::minutes(30)
        );
    }

    #[test]
    fn test_format_cidr() {
        assert_eq!(format_cidr(None), None);
        assert_eq!(format_cidr(Some("all")), Some(Vec::new()));
        assert_eq!(
            format_cidr(Some("10.0.0.0/8, 192.168.1.0/24")),
            Some(vec!["10.0.0.0/8".to_string(), "192.168.1.0/24".to_string()])
        );
    }

    #[test]
    fn test_token_request() {
        let request = token_request(
            TokenDuration {
                hours: Some(3),
                ..Default::default()
            },
            None,
            Some("all"),
            now(),
        )
        .unwrap();

        assert_eq!(request.count, 1);
        assert_eq!(request.expiration, now() + Duration::hours(3));
        assert_eq!(request.cidr, Some(Vec::new()));
    }

    #[test]
    fn test_zero_count_rejected() {
        assert!(matches!(
            token_request(TokenDuration::default(), Some(0), None, now()),
            Err(CoreError::InvalidArgument(_))
        ));
    }
}
