//! Hour offsets applied to timestamp triples

use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use timesync_fs::FileTimes;

use crate::{Error, Result};

/// Shift every field of `times` by `hours`.
///
/// Arithmetic is on absolute instants, so daylight-saving transitions and
/// date boundaries need no special handling. Any `hours` is accepted; a
/// result beyond the representable range saturates at the range limit.
/// Bounds are enforced by [`ShiftHours`], not here.
pub fn shift(times: &FileTimes, hours: i64) -> FileTimes {
    let delta = TimeDelta::try_hours(hours).unwrap_or(if hours < 0 {
        TimeDelta::MIN
    } else {
        TimeDelta::MAX
    });
    times.map(|t| shift_instant(t, delta))
}

fn shift_instant(t: DateTime<Utc>, delta: TimeDelta) -> DateTime<Utc> {
    t.checked_add_signed(delta).unwrap_or(if delta < TimeDelta::zero() {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

/// An hour shift within the accepted range of -24 to 24.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct ShiftHours(i64);

impl ShiftHours {
    pub const MIN: i64 = -24;
    pub const MAX: i64 = 24;

    /// Validate `hours` against the accepted range.
    pub fn new(hours: i64) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&hours) {
            Ok(Self(hours))
        } else {
            Err(Error::validation(format!(
                "shift must be between {} and {} hours, got {}",
                Self::MIN,
                Self::MAX,
                hours
            )))
        }
    }

    pub fn get(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Apply this shift to a triple.
    pub fn apply(&self, times: &FileTimes) -> FileTimes {
        shift(times, self.0)
    }
}

impl TryFrom<i64> for ShiftHours {
    type Error = Error;

    fn try_from(hours: i64) -> Result<Self> {
        Self::new(hours)
    }
}

impl From<ShiftHours> for i64 {
    fn from(shift: ShiftHours) -> Self {
        shift.0
    }
}

impl FromStr for ShiftHours {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let hours: i64 = trimmed.parse().map_err(|_| {
            Error::validation(format!(
                "shift must be a whole number of hours, got {:?}",
                trimmed
            ))
        })?;
        Self::new(hours)
    }
}

impl std::fmt::Display for ShiftHours {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:+}h", self.0)
    }
}
