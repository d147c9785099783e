//! Wall-clock access and run identifiers

use chrono::{Local, NaiveDateTime};
use rand::Rng;
use serde::Serialize;
use std::fmt;

/// Source of the current local time
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// The system's local clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Identifier shared by every file written during one run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RunId(String);

impl RunId {
    /// `YYYYMMDD_HHMMSS` of the given instant
    pub fn from_time(time: NaiveDateTime) -> Self {
        RunId(time.format("%Y%m%d_%H%M%S").to_string())
    }

    /// Timestamp followed by a random suffix, distinct within the same second
    pub fn unique(time: NaiveDateTime) -> Self {
        let suffix: u32 = rand::thread_rng().gen_range(0..0x100_0000);
        RunId(format!("{}_{:06x}", time.format("%Y%m%d_%H%M%S"), suffix))
    }

    /// Build a run id from a clock
    pub fn new(clock: &dyn Clock, unique: bool) -> Self {
        let now = clock.now();
        if unique {
            Self::unique(now)
        } else {
            Self::from_time(now)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
