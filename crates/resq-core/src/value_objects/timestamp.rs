//! Store timestamp - whole seconds plus a nanosecond remainder
//!
//! Alerts are written by external producers that store timestamps as a
//! `{ seconds, nanoseconds }` pair. Ordering compares seconds first, then
//! nanoseconds, which the derived `Ord` gives us from the field order.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A point in time as stored on an alert record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AlertTimestamp {
    pub seconds: i64,
    pub nanoseconds: i32,
}

impl AlertTimestamp {
    /// Create from raw parts
    #[inline]
    pub const fn new(seconds: i64, nanoseconds: i32) -> Self {
        Self {
            seconds,
            nanoseconds,
        }
    }

    /// Current service clock
    pub fn now() -> Self {
        Self::from(Utc::now())
    }

    /// Milliseconds since the Unix epoch, `None` on overflow
    pub fn as_millis(&self) -> Option<i64> {
        self.seconds
            .checked_mul(1000)?
            .checked_add(i64::from(self.nanoseconds) / 1_000_000)
    }

    /// Convert to a chrono timestamp, `None` if out of range
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let nanos = u32::try_from(self.nanoseconds).ok()?;
        Utc.timestamp_opt(self.seconds, nanos).single()
    }
}

impl From<DateTime<Utc>> for AlertTimestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self {
            seconds: dt.timestamp(),
            nanoseconds: dt.timestamp_subsec_nanos() as i32,
        }
    }
}
