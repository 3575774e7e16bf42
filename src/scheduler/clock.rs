//! Exchange-local time-of-day predicates

use crate::config::{ConfigError, ScheduleConfig};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Evaluates the daily square-off and summary times in the exchange timezone
#[derive(Debug, Clone, Copy)]
pub struct SessionClock {
    offset: FixedOffset,
    square_off: NaiveTime,
    summary: NaiveTime,
}

impl SessionClock {
    pub fn new(
        utc_offset_minutes: i32,
        square_off: NaiveTime,
        summary: NaiveTime,
    ) -> Result<Self, ConfigError> {
        let offset = FixedOffset::east_opt(utc_offset_minutes * 60).ok_or_else(|| {
            ConfigError::InvalidTime(format!("utc offset of {utc_offset_minutes} minutes"))
        })?;
        Ok(Self {
            offset,
            square_off,
            summary,
        })
    }

    pub fn from_config(config: &ScheduleConfig) -> Result<Self, ConfigError> {
        Self::new(
            config.utc_offset_minutes,
            config.square_off_time,
            config.summary_time,
        )
    }

    pub fn local(&self, now: DateTime<Utc>) -> DateTime<FixedOffset> {
        now.with_timezone(&self.offset)
    }

    /// Wall-clock time at the exchange, for log lines
    pub fn local_naive(&self, now: DateTime<Utc>) -> NaiveDateTime {
        self.local(now).naive_local()
    }

    /// Exchange-local calendar date
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        self.local(now).date_naive()
    }

    /// At or past the square-off time today
    pub fn is_square_off(&self, now: DateTime<Utc>) -> bool {
        self.local(now).time() >= self.square_off
    }

    /// At or past the summary time, and no summary written yet today
    pub fn summary_due(&self, now: DateTime<Utc>, last_summary: Option<NaiveDate>) -> bool {
        let local = self.local(now);
        local.time() >= self.summary && last_summary.map_or(true, |d| d < local.date_naive())
    }
}
