use super::national::NationalHolidays;
use crate::config::DEFAULT_STANDARD_WORKING_HOURS;
use crate::model::CompanyHoliday;
use bdays::HolidayCalendar;
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashMap;

/// Holiday classification shared by every worker of a company.
#[derive(Debug, Clone)]
pub struct CompanyCalendar {
    national: NationalHolidays,
    company_holidays: HashMap<NaiveDate, CompanyHoliday>,
    standard_working_hours: f64,
}

impl Default for CompanyCalendar {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl CompanyCalendar {
    pub fn new<I>(company_holidays: I) -> Self
    where
        I: IntoIterator<Item = CompanyHoliday>,
    {
        Self::with_national_holidays(NationalHolidays::default(), company_holidays)
    }

    pub fn with_national_holidays<I>(national: NationalHolidays, company_holidays: I) -> Self
    where
        I: IntoIterator<Item = CompanyHoliday>,
    {
        let mut calendar = Self {
            national,
            company_holidays: HashMap::new(),
            standard_working_hours: DEFAULT_STANDARD_WORKING_HOURS,
        };
        calendar.add_company_holidays(company_holidays);
        calendar
    }

    pub fn with_standard_working_hours(mut self, hours: f64) -> Self {
        self.standard_working_hours = hours;
        self
    }

    /// Add a single holiday; a later entry for the same date replaces the earlier one.
    pub fn add_company_holiday(&mut self, holiday: CompanyHoliday) {
        self.company_holidays.insert(holiday.date, holiday);
    }

    pub fn add_company_holidays<I>(&mut self, holidays: I)
    where
        I: IntoIterator<Item = CompanyHoliday>,
    {
        for holiday in holidays {
            self.add_company_holiday(holiday);
        }
    }

    pub fn company_holidays(&self) -> Vec<&CompanyHoliday> {
        let mut holidays: Vec<&CompanyHoliday> = self.company_holidays.values().collect();
        holidays.sort_by_key(|holiday| holiday.date);
        holidays
    }

    pub fn national_holidays(&self) -> &NationalHolidays {
        &self.national
    }

    pub fn is_weekend(date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    pub fn is_national_holiday(&self, date: NaiveDate) -> bool {
        self.national.is_holiday(date)
    }

    /// Weekend or national holiday; company-declared days are not consulted.
    pub fn is_public_holiday(&self, date: NaiveDate) -> bool {
        !self.national.is_bday(date)
    }

    pub fn is_company_holiday(&self, date: NaiveDate) -> bool {
        self.is_public_holiday(date) || self.company_holidays.contains_key(&date)
    }

    /// Name of the national or company holiday on `date`, if any.
    pub fn holiday_name(&self, date: NaiveDate) -> Option<&str> {
        if let Some(holiday) = self.company_holidays.get(&date) {
            return Some(holiday.name.as_str());
        }
        self.national.name(date)
    }

    pub fn standard_working_hours(&self) -> f64 {
        self.standard_working_hours
    }
}
