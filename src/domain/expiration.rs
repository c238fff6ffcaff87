//! Expiration status classification.
//!
//! Maps an optional expiration instant to one of four labels relative to a
//! reference "now" and a day window:
//!
//! | Condition                          | Status    |
//! |------------------------------------|-----------|
//! | no expiration date                 | `unknown` |
//! | date strictly before now           | `expired` |
//! | date within `soon_within_days`     | `soon`    |
//! | anything later                     | `ok`      |
//!
//! The window is always passed in. Inventory statistics and listings use
//! [`SERVER_SOON_DAYS`]; the mobile app's "expiring this week" filter uses
//! [`CLIENT_SOON_DAYS`]. The two are intentionally kept apart.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Window used by inventory statistics and listings.
pub const SERVER_SOON_DAYS: i64 = 3;

/// Window used by the mobile client's "expiring soon" filter.
pub const CLIENT_SOON_DAYS: i64 = 7;

/// Expiration label for an inventory item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpirationStatus {
    Unknown,
    Expired,
    Soon,
    Ok,
}

impl ExpirationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ExpirationStatus::Unknown => "unknown",
            ExpirationStatus::Expired => "expired",
            ExpirationStatus::Soon => "soon",
            ExpirationStatus::Ok => "ok",
        }
    }
}

impl fmt::Display for ExpirationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpirationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unknown" => Ok(ExpirationStatus::Unknown),
            "expired" => Ok(ExpirationStatus::Expired),
            "soon" => Ok(ExpirationStatus::Soon),
            "ok" => Ok(ExpirationStatus::Ok),
            other => Err(format!(
                "unknown expiration status '{other}', expected one of: unknown, expired, soon, ok"
            )),
        }
    }
}

/// Classifies an expiration instant relative to `now`.
pub fn classify(
    expiration: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    soon_within_days: i64,
) -> ExpirationStatus {
    let Some(expiration) = expiration else {
        return ExpirationStatus::Unknown;
    };

    if expiration < now {
        ExpirationStatus::Expired
    } else if expiration - now <= Duration::days(soon_within_days) {
        ExpirationStatus::Soon
    } else {
        ExpirationStatus::Ok
    }
}

/// Whole days until `expiration`, rounded up. Negative once the date has passed.
pub fn days_until(expiration: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

    let millis = (expiration - now).num_milliseconds();
    // ceil for integer division, including negative values
    millis.div_euclid(MILLIS_PER_DAY) + i64::from(millis.rem_euclid(MILLIS_PER_DAY) != 0)
}
