// src/dates.rs

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::DateError;

/// Display dates carry no year, so validation runs against a leap year to admit 29/02.
const VALIDATION_YEAR: i32 = 2000;

fn display_date_regex() -> &'static Regex {
    static DISPLAY_DATE_REGEX: OnceLock<Regex> = OnceLock::new();
    DISPLAY_DATE_REGEX
        .get_or_init(|| Regex::new(r"^(\d{2})/(\d{2})$").expect("Invalid display date regex"))
}

/// A zero-padded `DD/MM` calendar day without a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayDate {
    day: u32,
    month: u32,
}

impl DisplayDate {
    pub fn new(day: u32, month: u32) -> Result<Self, DateError> {
        if NaiveDate::from_ymd_opt(VALIDATION_YEAR, month, day).is_none() {
            return Err(DateError::InvalidDisplayDate(format!("{:02}/{:02}", day, month)));
        }
        Ok(DisplayDate { day, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        DisplayDate {
            day: date.day(),
            month: date.month(),
        }
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The calendar date this display date names in `year`.
    ///
    /// Counted forward from the first of the month, so 29/02 in a common
    /// year lands on 01/03.
    pub fn date_in(&self, year: i32) -> Result<NaiveDate, DateError> {
        let first = NaiveDate::from_ymd_opt(year, self.month, 1)
            .ok_or_else(|| DateError::OutOfRange(format!("{}/{}", self, year)))?;
        first
            .checked_add_signed(Duration::days(i64::from(self.day) - 1))
            .ok_or_else(|| DateError::OutOfRange(format!("{}/{}", self, year)))
    }

    /// UTC midnight at the start of this day in `year`.
    pub fn midnight_in(&self, year: i32) -> Result<DateTime<Utc>, DateError> {
        let date = self.date_in(year)?;
        midnight(date)
    }

    /// The display date one calendar day later, with month and year rollover.
    pub fn day_after_in(&self, year: i32) -> Result<DisplayDate, DateError> {
        let next = self
            .date_in(year)?
            .succ_opt()
            .ok_or_else(|| DateError::OutOfRange(format!("{}/{}", self, year)))?;
        Ok(DisplayDate::from_date(next))
    }
}

impl fmt::Display for DisplayDate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.day, self.month)
    }
}

impl FromStr for DisplayDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = display_date_regex()
            .captures(s)
            .ok_or_else(|| DateError::InvalidDisplayDate(s.to_string()))?;
        let day = caps[1].parse::<u32>().map_err(|_| DateError::InvalidDisplayDate(s.to_string()))?;
        let month = caps[2].parse::<u32>().map_err(|_| DateError::InvalidDisplayDate(s.to_string()))?;
        DisplayDate::new(day, month).map_err(|_| DateError::InvalidDisplayDate(s.to_string()))
    }
}

impl TryFrom<String> for DisplayDate {
    type Error = DateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DisplayDate> for String {
    fn from(date: DisplayDate) -> Self {
        date.to_string()
    }
}

/// A `{startDate, endDate}` pair in display format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateWindow {
    pub start_date: DisplayDate,
    pub end_date: DisplayDate,
}

impl DateWindow {
    pub fn new(start_date: DisplayDate, end_date: DisplayDate) -> Self {
        DateWindow { start_date, end_date }
    }

    pub fn parse(start_date: &str, end_date: &str) -> Result<Self, DateError> {
        Ok(DateWindow {
            start_date: start_date.parse()?,
            end_date: end_date.parse()?,
        })
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -> {}", self.start_date, self.end_date)
    }
}

/// A window pinned to absolute instants. `end` is exclusive: midnight after the last day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// The coarse relative window a mock was saved with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DateFilterSelection {
    Last7Days,
    Last14Days,
    Last30Days,
    #[default]
    #[serde(rename = "None")]
    NoFilter,
}

impl DateFilterSelection {
    /// Days between the window start and today; today itself is included.
    pub fn days_back(&self) -> i64 {
        match self {
            DateFilterSelection::Last7Days => 6,
            DateFilterSelection::Last14Days => 13,
            DateFilterSelection::Last30Days => 29,
            DateFilterSelection::NoFilter => 0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DateFilterSelection::Last7Days => "Last7Days",
            DateFilterSelection::Last14Days => "Last14Days",
            DateFilterSelection::Last30Days => "Last30Days",
            DateFilterSelection::NoFilter => "None",
        }
    }
}

impl fmt::Display for DateFilterSelection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DateFilterSelection {
    type Err = DateError;

    /// Accepts the stored labels ("Last7Days") as well as spaced forms ("last 7 days").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "last7days" => Ok(DateFilterSelection::Last7Days),
            "last14days" => Ok(DateFilterSelection::Last14Days),
            "last30days" => Ok(DateFilterSelection::Last30Days),
            "none" | "" => Ok(DateFilterSelection::NoFilter),
            _ => Err(DateError::InvalidFilter(s.to_string())),
        }
    }
}

/// Computes the window for `selection`, ending on `today`.
pub fn compute_window_at(selection: DateFilterSelection, today: NaiveDate) -> DateWindow {
    let start = today - Duration::days(selection.days_back());
    let window = DateWindow::new(DisplayDate::from_date(start), DisplayDate::from_date(today));
    debug!("computed {} window for {}: {}", selection, today, window);
    window
}

/// Computes the window for `selection`, ending today (UTC).
pub fn compute_window(selection: DateFilterSelection) -> DateWindow {
    compute_window_at(selection, Utc::now().date_naive())
}

/// Pins `window` to instants in `year`.
///
/// The end boundary is midnight after `end_date`. When that is not after the
/// start, the end is moved into `year + 1`.
pub fn resolve_window_in(window: &DateWindow, year: i32) -> Result<ResolvedWindow, DateError> {
    let start = window.start_date.midnight_in(year)?;
    let mut end = exclusive_end(&window.end_date, year)?;

    if end <= start {
        end = exclusive_end(&window.end_date, year + 1)?;
    }
    // Any day of year + 1 ends after midnight of any day of year.
    debug_assert!(end > start, "{} resolved to an inverted range", window);

    Ok(ResolvedWindow { start, end })
}

/// Pins `window` to instants in the current UTC year.
pub fn resolve_window(window: &DateWindow) -> Result<ResolvedWindow, DateError> {
    resolve_window_in(window, Utc::now().year())
}

// --- Helpers ---

fn exclusive_end(date: &DisplayDate, year: i32) -> Result<DateTime<Utc>, DateError> {
    let next = date
        .date_in(year)?
        .succ_opt()
        .ok_or_else(|| DateError::OutOfRange(format!("{}/{}", date, year)))?;
    midnight(next)
}

fn midnight(date: NaiveDate) -> Result<DateTime<Utc>, DateError> {
    let naive = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| DateError::OutOfRange(date.to_string()))?;
    Ok(Utc.from_utc_datetime(&naive))
}
