//! Timestamp value generators and the shared time window.

use crate::document::GeneratedValue;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use rand::Rng;

/// Input format for explicit window bounds.
pub const WINDOW_INPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Output format for `tstxt` values and range queries.
pub const ISO_OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.000Z";

/// Days either side of "now" covered by the rolling window.
pub const ROLLING_WINDOW_DAYS: i64 = 30;

/// Error type for time window configuration.
#[derive(Debug, thiserror::Error)]
pub enum TimeWindowError {
    /// A bound did not match [`WINDOW_INPUT_FORMAT`].
    #[error("Invalid time '{value}', expected '%Y-%m-%d %H:%M:%S': {source}")]
    InvalidFormat {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A start time was given without a finish time.
    #[error("start_time is set but finish_time is missing")]
    MissingFinish,
}

/// Time range that timestamps are drawn from and range queries cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    /// Thirty days before to thirty days after the moment of use.
    #[default]
    Rolling,
    /// Explicit bounds.
    Fixed {
        start: DateTime<Utc>,
        finish: DateTime<Utc>,
    },
}

impl TimeWindow {
    /// Build a window from optional `start_time` / `finish_time` settings.
    ///
    /// Whether the window is fixed is decided by `start_time` alone: without
    /// it the rolling window is used and any `finish_time` is ignored. With it,
    /// `finish_time` is required.
    pub fn from_options(
        start_time: Option<&str>,
        finish_time: Option<&str>,
    ) -> Result<Self, TimeWindowError> {
        let Some(start) = start_time else {
            if let Some(finish) = finish_time {
                tracing::warn!(
                    "finish_time '{}' ignored because start_time is not set",
                    finish
                );
            }
            return Ok(Self::Rolling);
        };
        let finish = finish_time.ok_or(TimeWindowError::MissingFinish)?;

        Ok(Self::Fixed {
            start: parse_window_time(start)?,
            finish: parse_window_time(finish)?,
        })
    }

    /// Resolve the bounds, evaluating the rolling window against `now`.
    pub fn bounds_at(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        match *self {
            Self::Rolling => (
                now - Duration::days(ROLLING_WINDOW_DAYS),
                now + Duration::days(ROLLING_WINDOW_DAYS),
            ),
            Self::Fixed { start, finish } => (start, finish),
        }
    }

    /// Resolve the bounds against the current time.
    pub fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        self.bounds_at(Utc::now())
    }
}

/// Parse a `%Y-%m-%d %H:%M:%S` time as UTC.
pub fn parse_window_time(value: &str) -> Result<DateTime<Utc>, TimeWindowError> {
    NaiveDateTime::parse_from_str(value.trim(), WINDOW_INPUT_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|source| TimeWindowError::InvalidFormat {
            value: value.to_string(),
            source,
        })
}

/// Format an instant as `%Y-%m-%dT%H:%M:%S.000Z`.
pub fn format_iso(dt: &DateTime<Utc>) -> String {
    dt.format(ISO_OUTPUT_FORMAT).to_string()
}

/// Pick a second-resolution instant uniformly inside the window.
pub fn random_instant<R: Rng>(rng: &mut R, window: &TimeWindow) -> DateTime<Utc> {
    let (start, finish) = window.bounds();
    let start_ts = start.timestamp();
    let finish_ts = finish.timestamp();

    if start_ts >= finish_ts {
        return start;
    }

    let ts = rng.gen_range(start_ts..=finish_ts);
    DateTime::from_timestamp(ts, 0).unwrap_or(start)
}

/// `ts`: epoch milliseconds inside the window.
pub fn generate_timestamp_millis<R: Rng>(rng: &mut R, window: &TimeWindow) -> GeneratedValue {
    GeneratedValue::Int(random_instant(rng, window).timestamp() * 1000)
}

/// `tstxt`: ISO-8601 text inside the window.
pub fn generate_timestamp_text<R: Rng>(rng: &mut R, window: &TimeWindow) -> GeneratedValue {
    GeneratedValue::String(format_iso(&random_instant(rng, window)))
}
