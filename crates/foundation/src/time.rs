use std::fmt;

use chrono::{Datelike, Local, NaiveDateTime, Timelike};

pub const HOURS_PER_DAY: u8 = 24;
pub const HOURS_PER_WEEK: usize = 7 * 24;

/// Day names indexed the way the hour-of-week encoding counts days (Sunday first).
pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Hour-of-week: `day * 24 + hour`, with Sunday as day 0.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HourOfWeek(u8);

impl HourOfWeek {
    pub const MAX: u8 = (HOURS_PER_WEEK - 1) as u8;

    pub fn new(hour: i64) -> Result<Self, TimeRangeError> {
        if (0..=Self::MAX as i64).contains(&hour) {
            Ok(HourOfWeek(hour as u8))
        } else {
            Err(TimeRangeError { requested: hour })
        }
    }

    pub fn from_day_hour(day: u8, hour: u8) -> Result<Self, TimeRangeError> {
        if hour >= HOURS_PER_DAY {
            return Err(TimeRangeError {
                requested: day as i64 * HOURS_PER_DAY as i64 + hour as i64,
            });
        }
        Self::new(day as i64 * HOURS_PER_DAY as i64 + hour as i64)
    }

    pub fn from_datetime(at: NaiveDateTime) -> Self {
        let day = at.weekday().num_days_from_sunday() as u8;
        let hour = at.hour() as u8;
        HourOfWeek(day * HOURS_PER_DAY + hour)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn as_index(self) -> usize {
        self.0 as usize
    }

    pub fn day(self) -> u8 {
        self.0 / HOURS_PER_DAY
    }

    pub fn hour_of_day(self) -> u8 {
        self.0 % HOURS_PER_DAY
    }

    pub fn day_name(self) -> &'static str {
        DAY_NAMES[self.day() as usize]
    }
}

impl fmt::Display for HourOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TimeRangeError {
    pub requested: i64,
}

impl fmt::Display for TimeRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hour-of-week out of range: requested={} valid=0..={}",
            self.requested,
            HourOfWeek::MAX
        )
    }
}

impl std::error::Error for TimeRangeError {}

/// Source of local wall-clock time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Default, Copy, Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Copy, Clone)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Currently displayed slot of every per-cell series.
///
/// Out-of-range input is rejected and the previous value is kept.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct TimeState {
    current: HourOfWeek,
}

impl TimeState {
    pub fn new(initial: HourOfWeek) -> Self {
        Self { current: initial }
    }

    pub fn at_now(clock: &impl Clock) -> Self {
        Self::new(HourOfWeek::from_datetime(clock.now()))
    }

    pub fn current(&self) -> HourOfWeek {
        self.current
    }

    pub fn set(&mut self, hour: i64) -> Result<HourOfWeek, TimeRangeError> {
        self.current = HourOfWeek::new(hour)?;
        Ok(self.current)
    }

    pub fn set_to_now(&mut self, clock: &impl Clock) -> HourOfWeek {
        self.current = HourOfWeek::from_datetime(clock.now());
        self.current
    }
}
