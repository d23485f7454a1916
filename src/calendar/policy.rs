use super::company::CompanyCalendar;
use chrono::NaiveDate;

/// Per-day capacity of one worker.
///
/// Two policies implement this and they are not interchangeable:
/// [`AssigneeWorkingCalendar`](super::AssigneeWorkingCalendar) honours company
/// holidays and personal-schedule deductions, while [`HolidayOnlyCalendar`]
/// looks at weekends and national holidays only and scales by working rate.
pub trait CapacityCalendar {
    fn is_working_day(&self, date: NaiveDate) -> bool;

    /// Hours that can be scheduled on `date`, within `[0, standard_working_hours]`.
    fn available_hours(&self, date: NaiveDate) -> f64;

    fn standard_working_hours(&self) -> f64;
}

impl<C: CapacityCalendar + ?Sized> CapacityCalendar for &C {
    fn is_working_day(&self, date: NaiveDate) -> bool {
        (**self).is_working_day(date)
    }

    fn available_hours(&self, date: NaiveDate) -> f64 {
        (**self).available_hours(date)
    }

    fn standard_working_hours(&self) -> f64 {
        (**self).standard_working_hours()
    }
}

/// Weekend/national-holiday calendar used by the daily capacity scheduler.
#[derive(Debug, Clone, Copy)]
pub struct HolidayOnlyCalendar<'a> {
    company: &'a CompanyCalendar,
    standard_working_hours: f64,
    working_rate: f64,
}

impl<'a> HolidayOnlyCalendar<'a> {
    pub(crate) fn new(
        company: &'a CompanyCalendar,
        standard_working_hours: f64,
        working_rate: f64,
    ) -> Self {
        Self {
            company,
            standard_working_hours,
            working_rate,
        }
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.company.is_public_holiday(date)
    }

    /// Standard hours scaled by the worker's rate.
    pub fn rated_hours(&self) -> f64 {
        self.standard_working_hours * self.working_rate
    }

    pub fn working_rate(&self) -> f64 {
        self.working_rate
    }
}

impl CapacityCalendar for HolidayOnlyCalendar<'_> {
    fn is_working_day(&self, date: NaiveDate) -> bool {
        !self.is_holiday(date) && self.working_rate > 0.0
    }

    fn available_hours(&self, date: NaiveDate) -> f64 {
        if self.is_holiday(date) {
            return 0.0;
        }
        self.rated_hours().clamp(0.0, self.standard_working_hours)
    }

    fn standard_working_hours(&self) -> f64 {
        self.standard_working_hours
    }
}
