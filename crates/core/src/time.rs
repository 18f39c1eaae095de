use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// A simple clock abstraction for deterministic time in workflows and tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// If this is a fixed clock, advance it by the given duration.
    ///
    /// Has no effect on `Clock::Default`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }

    #[must_use]
    pub fn is_fixed(&self) -> bool {
        matches!(self, Clock::Fixed(_))
    }
}

/// Wall-clock seconds between `since` and `now`, never negative.
#[must_use]
pub fn elapsed_secs(since: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let millis = (now - since).num_milliseconds().max(0);
    #[allow(clippy::cast_precision_loss)]
    let secs = millis as f64 / 1000.0;
    secs
}

/// Parses a backend timestamp.
///
/// Accepts RFC 3339 as well as the offset-less ISO form the analysis backend
/// emits (`2024-05-01T10:00:00.123456`), which is read as UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Serde adapter for optional backend timestamps in either accepted form.
pub mod flexible_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// # Errors
    ///
    /// Propagates serializer errors.
    #[allow(clippy::ref_option)]
    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(at) => serializer.serialize_some(&at.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    /// Unparseable strings become `None` instead of failing the whole payload.
    ///
    /// # Errors
    ///
    /// Returns an error only if the value is neither null nor a string.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(super::parse_timestamp))
    }
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_is_never_negative() {
        let now = fixed_now();
        assert!((elapsed_secs(now, now - Duration::seconds(3)) - 0.0).abs() < f64::EPSILON);
        assert!((elapsed_secs(now, now + Duration::milliseconds(1500)) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn parses_naive_backend_timestamps_as_utc() {
        let parsed = parse_timestamp("2023-11-14T22:13:20.000001").unwrap();
        assert_eq!(parsed.timestamp(), FIXED_TEST_TIMESTAMP);

        let rfc = parse_timestamp("2023-11-14T23:13:20+01:00").unwrap();
        assert_eq!(rfc, fixed_now());

        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn fixed_clock_advances() {
        let mut clock = fixed_clock();
        clock.advance(Duration::seconds(2));
        assert_eq!(clock.now(), fixed_now() + Duration::seconds(2));
        assert!(clock.is_fixed());
    }
}
