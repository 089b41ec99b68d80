//! The CMPP `CONNECT` authenticator.
//!
//! `AuthenticatorSource = MD5(gatewayUsername + 9 zero bytes + gatewayPassword + Timestamp)`,
//! where `Timestamp` is the ASCII digits of `MMddHHmmss` folded into the digest as those 10
//! ASCII bytes, not as a binary `u32`.

use time::OffsetDateTime;

/// Computes the 16-byte `CONNECT` authenticator.
///
/// `username` is the gateway logon name (`SourceAddress`), `password` is the gateway password,
/// and `timestamp` is the `MMddHHmmss` value also carried verbatim in the `CONNECT` body.
pub fn compute_digest(username: &str, password: &str, timestamp: u32) -> [u8; 16] {
    let mut input = Vec::with_capacity(username.len() + 9 + password.len() + 10);
    input.extend_from_slice(username.as_bytes());
    input.extend_from_slice(&[0u8; 9]);
    input.extend_from_slice(password.as_bytes());
    input.extend_from_slice(format!("{timestamp:010}").as_bytes());
    md5::compute(&input).0
}

/// The current local time, falling back to UTC if the platform cannot determine a local offset
/// (e.g. a multithreaded process on a Unix host with no cached offset available).
pub fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Formats `now` as the `MMddHHmmss` timestamp `CONNECT` requires, using the month, day, hour,
/// minute and second of whatever offset `now` already carries (see [`local_now`]).
pub fn format_timestamp(now: OffsetDateTime) -> u32 {
    u32::from(u8::from(now.month())) * 100_000_000
        + u32::from(now.day()) * 1_000_000
        + u32::from(now.hour()) * 10_000
        + u32::from(now.minute()) * 100
        + u32::from(now.second())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn digest_is_stable_for_fixed_input() {
        let a = compute_digest("106575", "password", 1_231_120_000);
        let b = compute_digest("106575", "password", 1_231_120_000);
        assert_eq!(a, b);
    }

    #[test]
    fn digest_changes_with_timestamp() {
        let a = compute_digest("106575", "password", 1_231_120_000);
        let b = compute_digest("106575", "password", 1_231_120_001);
        assert_ne!(a, b);
    }

    #[test]
    fn digest_changes_with_secret() {
        let a = compute_digest("106575", "password", 1_231_120_000);
        let b = compute_digest("106575", "different", 1_231_120_000);
        assert_ne!(a, b);
    }

    #[test]
    fn format_timestamp_matches_mmddhhmmss() {
        let now = datetime!(2023-12-31 09:08:07);
        assert_eq!(format_timestamp(now), 1_231_090_807);
    }

    #[test]
    fn timestamp_components_stay_in_range() {
        let ts = format_timestamp(local_now());
        let month = ts / 100_000_000;
        let day = (ts / 1_000_000) % 100;
        let hour = (ts / 10_000) % 100;
        let minute = (ts / 100) % 100;
        let second = ts % 100;
        assert!((1..=12).contains(&month));
        assert!((1..=31).contains(&day));
        assert!(hour < 24);
        assert!(minute < 60);
        assert!(second < 60);
    }
}
