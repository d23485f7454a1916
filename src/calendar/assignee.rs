use super::company::CompanyCalendar;
use super::matcher::ScheduleMatcher;
use super::policy::{CapacityCalendar, HolidayOnlyCalendar};
use crate::config::CalculationOptions;
use crate::error::CalendarResult;
use crate::model::{Assignee, PersonalScheduleEntry, UserId};
use chrono::{NaiveDate, NaiveTime};
use std::collections::HashMap;
use tracing::warn;

/// Shared inputs for every worker calendar built during one invocation.
#[derive(Debug, Clone)]
pub struct CalendarContext {
    company: CompanyCalendar,
    options: CalculationOptions,
    matcher: ScheduleMatcher,
}

impl CalendarContext {
    pub fn new(company: CompanyCalendar, options: CalculationOptions) -> CalendarResult<Self> {
        options.validate()?;
        let matcher = ScheduleMatcher::new(&options);
        Ok(Self {
            company,
            options,
            matcher,
        })
    }

    pub fn company(&self) -> &CompanyCalendar {
        &self.company
    }

    pub fn company_mut(&mut self) -> &mut CompanyCalendar {
        &mut self.company
    }

    pub fn options(&self) -> &CalculationOptions {
        &self.options
    }

    pub fn matcher(&self) -> &ScheduleMatcher {
        &self.matcher
    }

    pub fn standard_working_hours(&self) -> f64 {
        self.options.standard_working_hours
    }

    /// Calendar for `assignee`; entries belonging to other users are ignored.
    pub fn assignee_calendar<'a>(
        &'a self,
        assignee: &Assignee,
        entries: &[PersonalScheduleEntry],
    ) -> CalendarResult<AssigneeWorkingCalendar<'a>> {
        assignee.validate()?;

        let mut by_date: HashMap<NaiveDate, Vec<PersonalScheduleEntry>> = HashMap::new();
        for entry in entries.iter().filter(|e| e.user_id == assignee.user_id) {
            by_date.entry(entry.date).or_default().push(entry.clone());
        }

        Ok(AssigneeWorkingCalendar {
            context: self,
            user_id: assignee.user_id.clone(),
            working_rate: assignee.working_rate,
            entries: by_date,
        })
    }

    pub fn holiday_only_calendar(&self, assignee: &Assignee) -> CalendarResult<HolidayOnlyCalendar<'_>> {
        assignee.validate()?;
        Ok(HolidayOnlyCalendar::new(
            &self.company,
            self.standard_working_hours(),
            assignee.working_rate,
        ))
    }
}

/// Per-day availability of one worker.
#[derive(Debug, Clone)]
pub struct AssigneeWorkingCalendar<'a> {
    context: &'a CalendarContext,
    user_id: UserId,
    working_rate: f64,
    entries: HashMap<NaiveDate, Vec<PersonalScheduleEntry>>,
}

impl AssigneeWorkingCalendar<'_> {
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn working_rate(&self) -> f64 {
        self.working_rate
    }

    /// A personal absence does not make a day non-working; it only removes hours.
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !self.context.company.is_company_holiday(date) && self.working_rate != 0.0
    }

    pub fn available_hours(&self, date: NaiveDate) -> f64 {
        if !self.is_working_day(date) {
            return 0.0;
        }
        let standard = self.context.standard_working_hours();
        (standard - self.deduction(date)).clamp(0.0, standard)
    }

    /// Hours removed from `date` by considered personal-schedule entries.
    pub fn deduction(&self, date: NaiveDate) -> f64 {
        if !self.context.options.consider_personal_schedule {
            return 0.0;
        }
        let Some(entries) = self.entries.get(&date) else {
            return 0.0;
        };
        entries
            .iter()
            .filter(|entry| self.context.matcher.is_considered(&entry.title))
            .map(|entry| self.entry_deduction(entry))
            .sum()
    }

    fn entry_deduction(&self, entry: &PersonalScheduleEntry) -> f64 {
        if entry.is_full_day() {
            return self.context.standard_working_hours();
        }
        match entry_duration_hours(entry) {
            Some(hours) => hours.max(0.0),
            None => {
                warn!(
                    user_id = %entry.user_id,
                    date = %entry.date,
                    title = %entry.title,
                    "unparsable personal schedule times, treating as no deduction"
                );
                0.0
            }
        }
    }
}

impl CapacityCalendar for AssigneeWorkingCalendar<'_> {
    fn is_working_day(&self, date: NaiveDate) -> bool {
        AssigneeWorkingCalendar::is_working_day(self, date)
    }

    fn available_hours(&self, date: NaiveDate) -> f64 {
        AssigneeWorkingCalendar::available_hours(self, date)
    }

    fn standard_working_hours(&self) -> f64 {
        self.context.standard_working_hours()
    }
}

fn parse_clock(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()
}

fn entry_duration_hours(entry: &PersonalScheduleEntry) -> Option<f64> {
    let start = parse_clock(entry.start_time.as_deref()?)?;
    let end = parse_clock(entry.end_time.as_deref()?)?;
    Some((end - start).num_minutes() as f64 / 60.0)
}
