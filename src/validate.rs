//! Checks on command arguments that have to pass before anything is sent to iTunes Connect.

use chrono::NaiveDate;

use crate::calendar::CalendarUnit;
use crate::error::Error;
use crate::error::Error::Validation;

pub fn account(command: &str, account: Option<u64>) -> Result<(), Error> {
    match account {
        Some(account) if account != 0 => Ok(()),
        _ => Err(Validation(format!("Argument -a/--account is needed for command '{command}'"))),
    }
}

pub fn fiscal_year(year: &str) -> Result<(), Error> {
    CalendarUnit::Year
        .parse_token(year)
        .map(|_| ())
        .ok_or_else(|| Validation("Fiscal year must be specified as YYYY".to_string()))
}

pub fn fiscal_period(period: &str) -> Result<(), Error> {
    match period.parse::<u8>() {
        Ok(1..=12) => Ok(()),
        _ => Err(Validation("Fiscal period must be a value between 1 and 12".to_string())),
    }
}

/// Checks that `date` is a valid date token for reports of `unit`.
pub fn report_date(unit: CalendarUnit, date: &str) -> Result<NaiveDate, Error> {
    unit.parse_token(date).ok_or_else(|| {
        Validation(match unit {
            CalendarUnit::Day => "Date must be specified as YYYYMMDD for daily reports".to_string(),
            CalendarUnit::Week => "Date must be specified as YYYYMMDD for weekly reports, \
                                   where the day used is the Sunday that week ends"
                .to_string(),
            CalendarUnit::Month => "Date must be specified as YYYYMM for monthly reports".to_string(),
            CalendarUnit::Year => "Date must be specified as YYYY for yearly reports".to_string(),
        })
    })
}

pub fn newsstand_unit(unit: CalendarUnit) -> Result<(), Error> {
    match unit {
        CalendarUnit::Day | CalendarUnit::Week => Ok(()),
        CalendarUnit::Month | CalendarUnit::Year => Err(Validation(
            "Newsstand reports are only available as Daily or Weekly".to_string(),
        )),
    }
}

/// Parses the bounds of a multi report download, both given as `YYYYMMDD`.
pub fn date_range(start: &str, end: &str) -> Result<(NaiveDate, NaiveDate), Error> {
    let parse = |date: &str| {
        CalendarUnit::Day
            .parse_token(date)
            .ok_or_else(|| Validation(format!("Range bound `{date}` must be specified as YYYYMMDD")))
    };
    let (start, end) = (parse(start)?, parse(end)?);
    if start > end {
        return Err(Validation(format!("Range start {start} lies after its end {end}")));
    }
    Ok((start, end))
}
