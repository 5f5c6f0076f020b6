//! Human-readable `Duration` fields for config structs.
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use std::time::Duration;
//!
//! #[derive(Serialize, Deserialize)]
//! struct Upstream {
//!     #[serde(with = "elis_utils::humantime_serde")]
//!     timeout: Duration,
//! }
//! ```
//!
//! Accepts `"10s"`, `"1m 30s"`, `"250ms"` and also a bare integer, read as
//! milliseconds, so environment overrides like `ELIS__SERVER__REQUEST_TIMEOUT=500`
//! keep working.

use std::fmt;
use std::time::Duration;

use serde::{Deserializer, Serializer, de};

/// Serializes a `Duration` as a humantime string such as `"10s"`.
///
/// # Errors
/// Returns the serializer's error.
#[allow(clippy::trivially_copy_pass_by_ref)] // serde requires &T signature
pub fn serialize<S>(d: &Duration, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.collect_str(&humantime::format_duration(*d))
}

/// Deserializes a `Duration` from a humantime string or integer milliseconds.
///
/// # Errors
/// Returns an error when the value is neither.
pub fn deserialize<'de, D>(d: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    d.deserialize_any(DurationVisitor)
}

struct DurationVisitor;

impl de::Visitor<'_> for DurationVisitor {
    type Value = Duration;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a duration like \"10s\" or integer milliseconds")
    }

    fn visit_str<E>(self, v: &str) -> Result<Duration, E>
    where
        E: de::Error,
    {
        if let Ok(ms) = v.trim().parse::<u64>() {
            return Ok(Duration::from_millis(ms));
        }
        humantime::parse_duration(v).map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Duration, E>
    where
        E: de::Error,
    {
        Ok(Duration::from_millis(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Duration, E>
    where
        E: de::Error,
    {
        u64::try_from(v)
            .map(Duration::from_millis)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }
}
