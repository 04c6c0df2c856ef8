//! Submission window checks.
//!
//! The core never reads the clock; the caller passes the current time. A
//! survey accepts submissions when it is not a draft and `now` lies in the
//! half-open interval `[start, end)`, either bound being optional.

use std::fmt;

use chrono::{DateTime, Utc};
use survey_model::Configuration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowStatus {
    Open,
    Draft,
    NotYetOpen { start: DateTime<Utc> },
    Closed { end: DateTime<Utc> },
}

impl WindowStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for WindowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("open"),
            Self::Draft => f.write_str("survey is a draft"),
            Self::NotYetOpen { start } => write!(f, "survey opens at {}", start.to_rfc3339()),
            Self::Closed { end } => write!(f, "survey closed at {}", end.to_rfc3339()),
        }
    }
}

pub fn check_window(configuration: &Configuration, now: DateTime<Utc>) -> WindowStatus {
    if configuration.is_draft() {
        return WindowStatus::Draft;
    }
    if let Some(start) = configuration.start()
        && now < start
    {
        return WindowStatus::NotYetOpen { start };
    }
    if let Some(end) = configuration.end()
        && now >= end
    {
        return WindowStatus::Closed { end };
    }
    WindowStatus::Open
}
