//! Rendering of a single stop as a pango-markup fragment.
//!
//! `Düren at <span fgcolor="#ff0000">15:38+5</span>`

use chrono::{DateTime, FixedOffset, Local, TimeZone};
use std::fmt;

/// Signed arrival delay in minutes. Zero or negative means on time.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct DelayMinutes(pub f64);

impl DelayMinutes {
    /// Delay between two Unix timestamps (seconds).
    pub fn between(scheduled: i64, predicted: i64) -> Self {
        DelayMinutes((predicted - scheduled) as f64 / 60.0)
    }

    pub fn severity(self) -> Severity {
        match self.0 {
            d if d > 2.0 => Severity::Major,
            d if d > 0.0 => Severity::Minor,
            _ => Severity::OnTime,
        }
    }

    /// `+N` with zero decimals, or empty when not delayed.
    pub fn suffix(self) -> String {
        if self.0 > 0.0 {
            format!("{:+.0}", self.0)
        } else {
            String::new()
        }
    }
}

impl From<f64> for DelayMinutes {
    fn from(minutes: f64) -> Self {
        DelayMinutes(minutes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    OnTime,
    Minor,
    Major,
}

impl Severity {
    pub fn color(self) -> &'static str {
        match self {
            Severity::OnTime => "#ffffff",
            Severity::Minor => "#ffff00",
            Severity::Major => "#ff0000",
        }
    }
}

/// An arrival time as delivered by either upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalInstant {
    /// Unix seconds.
    Epoch(i64),
    DateTime(DateTime<FixedOffset>),
}

impl ArrivalInstant {
    fn wall_clock<Tz>(self, tz: &Tz) -> Option<DateTime<Tz>>
    where
        Tz: TimeZone,
    {
        match self {
            ArrivalInstant::Epoch(secs) => tz.timestamp_opt(secs, 0).single(),
            ArrivalInstant::DateTime(dt) => Some(dt.with_timezone(tz)),
        }
    }
}

impl From<i64> for ArrivalInstant {
    fn from(secs: i64) -> Self {
        ArrivalInstant::Epoch(secs)
    }
}

impl From<DateTime<FixedOffset>> for ArrivalInstant {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        ArrivalInstant::DateTime(dt)
    }
}

/// Formats a stop in the local timezone.
pub fn format_stop(
    stop_name: &str,
    arrival: impl Into<ArrivalInstant>,
    delay: impl Into<DelayMinutes>,
) -> String {
    format_stop_in(stop_name, arrival, delay, &Local)
}

/// Formats a stop with its arrival shown in `tz`.
pub fn format_stop_in<Tz>(
    stop_name: &str,
    arrival: impl Into<ArrivalInstant>,
    delay: impl Into<DelayMinutes>,
    tz: &Tz,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let delay = delay.into();
    let time = match arrival.into().wall_clock(tz) {
        Some(dt) => dt.format("%H:%M").to_string(),
        None => "??:??".to_string(),
    };

    format!(
        r#"{stop_name} at <span fgcolor="{}">{time}{}</span>"#,
        delay.severity().color(),
        delay.suffix()
    )
}
