use std::fmt;
use std::str::FromStr;

use chrono::Datelike;
use chrono::Months;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

pub mod customer;
pub mod equipment;
pub mod technician;
pub mod work_order;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MonthRefError
{
    #[error("month {month} of year {year} does not exist")]
    InvalidMonth
    {
        year: i32,
        month: u32,
    },
    #[error("expected a month formatted as YYYY-MM, got `{0}`")]
    Unparsable(String),
}

/// The calendar month a view is displaying.
///
/// Stored as the first day of the month so that ordering and hashing
/// follow the calendar.
#[derive(Hash, Copy, Clone, Debug, PartialEq, PartialOrd, Ord, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthRef(NaiveDate);

impl MonthRef
{
    pub fn new(year: i32, month: u32) -> Result<Self, MonthRefError>
    {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or(MonthRefError::InvalidMonth { year, month })
    }

    /// The month the given date falls in.
    pub fn of(date: NaiveDate) -> Self
    {
        Self(date.with_day(1).unwrap_or(date))
    }

    pub fn year(&self) -> i32
    {
        self.0.year()
    }

    pub fn month(&self) -> u32
    {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate
    {
        self.0
    }

    pub fn last_day(&self) -> NaiveDate
    {
        self.next().first_day().pred_opt().unwrap_or(self.0)
    }

    pub fn contains(&self, date: NaiveDate) -> bool
    {
        date.year() == self.year() && date.month() == self.month()
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate>
    {
        let month = *self;
        self.0.iter_days().take_while(move |day| month.contains(*day))
    }

    pub fn number_of_days(&self) -> u32
    {
        self.last_day().day()
    }

    pub fn next(&self) -> Self
    {
        Self(self.0.checked_add_months(Months::new(1)).unwrap_or(self.0))
    }

    pub fn previous(&self) -> Self
    {
        Self(self.0.checked_sub_months(Months::new(1)).unwrap_or(self.0))
    }
}

impl fmt::Display for MonthRef
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for MonthRef
{
    type Err = MonthRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        let (year, month) = s.trim().split_once('-').ok_or_else(|| MonthRefError::Unparsable(s.to_string()))?;

        let year = year.parse::<i32>().map_err(|_| MonthRefError::Unparsable(s.to_string()))?;
        let month = month.parse::<u32>().map_err(|_| MonthRefError::Unparsable(s.to_string()))?;

        Self::new(year, month)
    }
}

impl TryFrom<String> for MonthRef
{
    type Error = MonthRefError;

    fn try_from(value: String) -> Result<Self, Self::Error>
    {
        value.parse()
    }
}

impl From<MonthRef> for String
{
    fn from(value: MonthRef) -> Self
    {
        value.to_string()
    }
}
