use crate::error::{CalendarError, CalendarResult};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub type UserId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HolidayKind {
    National,
    Company,
    Special,
}

/// A holiday declared outside the national calendar (or mirrored from it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyHoliday {
    pub date: NaiveDate,
    pub name: String,
    pub kind: HolidayKind,
}

impl CompanyHoliday {
    pub fn new(date: NaiveDate, name: impl Into<String>, kind: HolidayKind) -> Self {
        Self {
            date,
            name: name.into(),
            kind,
        }
    }

    /// Holidays stored with a timestamp are matched by calendar date only.
    pub fn from_datetime(at: NaiveDateTime, name: impl Into<String>, kind: HolidayKind) -> Self {
        Self::new(at.date(), name, kind)
    }
}

/// One appointment or absence in a worker's personal schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalScheduleEntry {
    pub user_id: UserId,
    pub date: NaiveDate,
    /// "HH:mm", 24h clock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    pub title: String,
    #[serde(default)]
    pub all_day: bool,
}

impl PersonalScheduleEntry {
    pub fn new(
        user_id: impl Into<UserId>,
        date: NaiveDate,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            date,
            start_time: Some(start_time.into()),
            end_time: Some(end_time.into()),
            title: title.into(),
            all_day: false,
        }
    }

    pub fn all_day(user_id: impl Into<UserId>, date: NaiveDate, title: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            date,
            start_time: None,
            end_time: None,
            title: title.into(),
            all_day: true,
        }
    }

    pub fn is_full_day(&self) -> bool {
        self.all_day || (self.start_time.is_none() && self.end_time.is_none())
    }
}

/// A worker and their overall capacity rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignee {
    pub user_id: UserId,
    pub name: String,
    /// 0 means unavailable on every day; 0.8 means part-time.
    pub working_rate: f64,
}

impl Assignee {
    pub fn new(user_id: impl Into<UserId>, name: impl Into<String>, working_rate: f64) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            working_rate,
        }
    }

    pub fn validate(&self) -> CalendarResult<()> {
        if !self.working_rate.is_finite() || !(0.0..=1.0).contains(&self.working_rate) {
            return Err(CalendarError::InvalidWorkingRate {
                user_id: self.user_id.clone(),
                rate: self.working_rate,
            });
        }
        Ok(())
    }
}

/// The scheduling view of a WBS task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i32,
    /// Hierarchical number such as "1.2.3"; ordering is lexicographic.
    pub task_no: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<UserId>,
    pub planned_start: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_end: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_hours: Option<f64>,
}

impl Task {
    pub fn new(
        id: i32,
        task_no: impl Into<String>,
        name: impl Into<String>,
        planned_start: NaiveDate,
    ) -> Self {
        Self {
            id,
            task_no: task_no.into(),
            name: name.into(),
            assignee_id: None,
            planned_start,
            planned_end: None,
            planned_hours: None,
        }
    }

    pub fn with_assignee(mut self, assignee_id: impl Into<UserId>) -> Self {
        self.assignee_id = Some(assignee_id.into());
        self
    }

    pub fn with_hours(mut self, planned_hours: f64) -> Self {
        self.planned_hours = Some(planned_hours);
        self
    }

    pub fn with_end(mut self, planned_end: NaiveDate) -> Self {
        self.planned_end = Some(planned_end);
        self
    }

    /// The inclusive planned range; a missing end collapses to the start day.
    pub fn planned_range(&self) -> (NaiveDate, NaiveDate) {
        (self.planned_start, self.planned_end.unwrap_or(self.planned_start))
    }

    pub fn validate(&self) -> CalendarResult<()> {
        if let Some(hours) = self.planned_hours {
            if !hours.is_finite() || hours < 0.0 {
                return Err(CalendarError::InvalidHours(hours));
            }
        }
        if let Some(end) = self.planned_end {
            if end < self.planned_start {
                return Err(CalendarError::EndBeforeStart {
                    start: self.planned_start,
                    end,
                });
            }
        }
        Ok(())
    }
}

/// Outcome of scheduling one task. Failures are carried in `error_message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub task_id: i32,
    pub task_no: String,
    pub task_name: String,
    pub assignee_id: Option<UserId>,
    pub assignee_name: Option<String>,
    pub planned_start: Option<NaiveDate>,
    pub planned_end: Option<NaiveDate>,
    pub planned_hours: Option<f64>,
    pub has_assignee: bool,
    pub error_message: Option<String>,
}

impl ScheduleResult {
    fn blank(task: &Task) -> Self {
        Self {
            task_id: task.id,
            task_no: task.task_no.clone(),
            task_name: task.name.clone(),
            assignee_id: task.assignee_id.clone(),
            assignee_name: None,
            planned_start: None,
            planned_end: None,
            planned_hours: task.planned_hours,
            has_assignee: task.assignee_id.is_some(),
            error_message: None,
        }
    }

    pub fn failed(task: &Task, message: impl Into<String>) -> Self {
        Self {
            error_message: Some(message.into()),
            ..Self::blank(task)
        }
    }

    pub fn scheduled(
        task: &Task,
        assignee: &Assignee,
        start: NaiveDate,
        end: NaiveDate,
        hours: f64,
    ) -> Self {
        Self {
            assignee_id: Some(assignee.user_id.clone()),
            assignee_name: Some(assignee.name.clone()),
            planned_start: Some(start),
            planned_end: Some(end),
            planned_hours: Some(hours),
            has_assignee: true,
            ..Self::blank(task)
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.error_message.is_none() && self.planned_start.is_some()
    }
}

/// The date range a project runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ProjectPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> CalendarResult<Self> {
        if end < start {
            return Err(CalendarError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        days_inclusive(self.start, self.end)
    }
}

/// Every calendar date from `start` through `end`.
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |date| *date <= end)
}

/// A calendar month, rendered as "YYYY/MM". Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMonthKeyError(String);

impl fmt::Display for ParseMonthKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid month key '{}' (expected YYYY/MM)", self.0)
    }
}

impl std::error::Error for ParseMonthKeyError {}

impl FromStr for MonthKey {
    type Err = ParseMonthKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMonthKeyError(s.to_string());
        let (year, month) = s.split_once('/').ok_or_else(err)?;
        let year = year.trim().parse::<i32>().map_err(|_| err())?;
        let month = month.trim().parse::<u32>().map_err(|_| err())?;
        if !(1..=12).contains(&month) {
            return Err(err());
        }
        Ok(Self::new(year, month))
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
