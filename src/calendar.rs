use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::Error;
use crate::error::Error::InvalidUnit;

/// Granularity of a report, sent to the API as its `date type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarUnit {
    Day,
    Week,
    Month,
    Year,
}

impl CalendarUnit {
    pub fn wire_name(self) -> &'static str {
        match self {
            CalendarUnit::Day => "Daily",
            CalendarUnit::Week => "Weekly",
            CalendarUnit::Month => "Monthly",
            CalendarUnit::Year => "Yearly",
        }
    }

    /// Human readable shape of a date token of this unit.
    pub fn pattern(self) -> &'static str {
        match self {
            CalendarUnit::Day | CalendarUnit::Week => "YYYYMMDD",
            CalendarUnit::Month => "YYYYMM",
            CalendarUnit::Year => "YYYY",
        }
    }

    pub fn strftime(self) -> &'static str {
        match self {
            CalendarUnit::Day | CalendarUnit::Week => "%Y%m%d",
            CalendarUnit::Month => "%Y%m",
            CalendarUnit::Year => "%Y",
        }
    }

    pub fn format(self, date: NaiveDate) -> String {
        date.format(self.strftime()).to_string()
    }

    /// Parses a date token of this unit. Month and year tokens resolve to the first day
    /// of their period.
    pub fn parse_token(self, token: &str) -> Option<NaiveDate> {
        if token.len() != self.pattern().len() || !token.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let full_date = match self {
            CalendarUnit::Day | CalendarUnit::Week => token.to_string(),
            CalendarUnit::Month => format!("{token}01"),
            CalendarUnit::Year => format!("{token}0101"),
        };
        NaiveDate::parse_from_str(&full_date, "%Y%m%d").ok()
    }

    fn advance(self, date: NaiveDate) -> Option<NaiveDate> {
        let days = match self {
            CalendarUnit::Day => 1,
            CalendarUnit::Week => 7,
            CalendarUnit::Month => days_in_month(date),
            CalendarUnit::Year => days_in_year(date.year()),
        };
        date.checked_add_signed(Duration::days(days))
    }

    // The period a date falls into at this granularity, comparable in calendar order.
    fn period(self, date: NaiveDate) -> (i32, u32, u32) {
        match self {
            CalendarUnit::Day | CalendarUnit::Week => (date.year(), date.month(), date.day()),
            CalendarUnit::Month => (date.year(), date.month(), 0),
            CalendarUnit::Year => (date.year(), 0, 0),
        }
    }
}

impl Display for CalendarUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for CalendarUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "Daily" => Ok(CalendarUnit::Day),
            "Weekly" => Ok(CalendarUnit::Week),
            "Monthly" => Ok(CalendarUnit::Month),
            "Yearly" => Ok(CalendarUnit::Year),
            invalid => Err(InvalidUnit(invalid.to_string())),
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_year(year: i32) -> i64 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

fn days_in_month(date: NaiveDate) -> i64 {
    match date.month() {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(date.year()) => 29,
        2 => 28,
        _ => 31,
    }
}

/// An inclusive range of dates to be requested at the granularity of `unit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub unit: CalendarUnit,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate, unit: CalendarUnit) -> DateRange {
        DateRange { start, end, unit }
    }

    /// Date tokens covering the range in ascending order.
    ///
    /// Weekly ranges are aligned to Sundays first: `start` moves forward to the closest
    /// Sunday (or stays if it is one), `end` moves back to the closest Sunday. Monthly and
    /// yearly ranges step by the length of the current month or year, starting at `start`,
    /// and include the period `end` falls into. A range whose start lies after its end
    /// yields nothing.
    pub fn tokens(&self) -> DateTokens {
        let (start, end) = match self.unit {
            CalendarUnit::Week => (closest_future_sunday(self.start), closest_past_sunday(self.end)),
            _ => (self.start, self.end),
        };

        DateTokens {
            next: Some(start).filter(|start| *start <= end),
            end,
            unit: self.unit,
        }
    }
}

impl IntoIterator for DateRange {
    type Item = String;
    type IntoIter = DateTokens;

    fn into_iter(self) -> DateTokens {
        self.tokens()
    }
}

/// Lazy iterator over the date tokens of a [`DateRange`].
#[derive(Debug, Clone)]
pub struct DateTokens {
    next: Option<NaiveDate>,
    end: NaiveDate,
    unit: CalendarUnit,
}

impl Iterator for DateTokens {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let current = self.next?;
        let end = self.unit.period(self.end);
        self.next = self
            .unit
            .advance(current)
            .filter(|next| self.unit.period(*next) <= end);
        Some(self.unit.format(current))
    }
}

// Monday = 0 ... Sunday = 6
fn closest_future_sunday(date: NaiveDate) -> NaiveDate {
    let weekday = date.weekday().num_days_from_monday();
    date + Duration::days(i64::from(6 - weekday))
}

fn closest_past_sunday(date: NaiveDate) -> NaiveDate {
    let weekday = date.weekday().num_days_from_monday();
    date - Duration::days(i64::from((weekday + 1) % 7))
}
