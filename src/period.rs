use crate::calendar::CapacityCalendar;
use crate::error::{CalendarError, CalendarResult};
use crate::model::{MonthKey, days_inclusive};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// One month's slice of a task's hours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAllocation {
    pub planned_hours: f64,
    pub actual_hours: f64,
    pub working_days: u32,
    pub available_hours: f64,
    pub allocation_ratio: f64,
}

pub(crate) fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

/// An inclusive date range evaluated against one worker's calendar.
#[derive(Debug, Clone)]
pub struct BusinessDayPeriod<C> {
    calendar: C,
    start: NaiveDate,
    end: NaiveDate,
}

impl<C: CapacityCalendar> BusinessDayPeriod<C> {
    pub fn new(calendar: C, start: NaiveDate, end: NaiveDate) -> CalendarResult<Self> {
        if end < start {
            return Err(CalendarError::EndBeforeStart { start, end });
        }
        Ok(Self {
            calendar,
            start,
            end,
        })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn calendar(&self) -> &C {
        &self.calendar
    }

    pub fn working_days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        days_inclusive(self.start, self.end).filter(|date| self.calendar.is_working_day(*date))
    }

    pub fn business_days_count(&self) -> usize {
        self.working_days().count()
    }

    pub fn business_days_by_month(&self) -> BTreeMap<MonthKey, u32> {
        let mut counts = BTreeMap::new();
        for date in self.working_days() {
            *counts.entry(MonthKey::of(date)).or_insert(0) += 1;
        }
        counts
    }

    /// Available hours per month; months without any positive day are absent.
    pub fn available_hours_by_month(&self) -> BTreeMap<MonthKey, f64> {
        let mut hours = BTreeMap::new();
        for date in days_inclusive(self.start, self.end) {
            let available = self.calendar.available_hours(date);
            if available > 0.0 {
                *hours.entry(MonthKey::of(date)).or_insert(0.0) += available;
            }
        }
        hours
    }

    pub fn total_available_hours(&self) -> f64 {
        self.available_hours_by_month().values().sum()
    }

    /// Each month's share of the period's available hours.
    pub fn allocation_ratios(&self) -> BTreeMap<MonthKey, f64> {
        let available = self.available_hours_by_month();
        let total: f64 = available.values().sum();
        if total <= 0.0 {
            return BTreeMap::from([(MonthKey::of(self.start), 1.0)]);
        }
        available
            .into_iter()
            .map(|(month, hours)| (month, hours / total))
            .collect()
    }

    /// Split `total_hours` across months in proportion to available hours.
    ///
    /// Shares are rounded to two decimals, except the chronologically last
    /// month, which receives `total_hours` minus the other months.
    /// With no available hours at all, everything lands in the start month.
    pub fn distribute_hours_by_business_days(
        &self,
        total_hours: f64,
    ) -> CalendarResult<BTreeMap<MonthKey, f64>> {
        if !total_hours.is_finite() || total_hours < 0.0 {
            return Err(CalendarError::InvalidHours(total_hours));
        }

        let available = self.available_hours_by_month();
        let period_total: f64 = available.values().sum();
        if period_total <= 0.0 {
            debug!(start = %self.start, end = %self.end, total_hours, "no available hours, allocating to start month");
            return Ok(BTreeMap::from([(MonthKey::of(self.start), total_hours)]));
        }

        let mut allocated: BTreeMap<MonthKey, f64> = available
            .iter()
            .map(|(month, hours)| (*month, round_hours(total_hours * hours / period_total)))
            .collect();

        // Last month absorbs the rounding residual.
        if let Some((_, last)) = allocated.iter_mut().next_back() {
            *last = 0.0;
        }
        let others: f64 = allocated.values().sum();
        if let Some((_, last)) = allocated.iter_mut().next_back() {
            *last = total_hours - others;
        }
        Ok(allocated)
    }

    /// Full per-month breakdown for `total_hours`, merged with recorded actuals.
    pub fn monthly_allocation(
        &self,
        total_hours: f64,
        actual_hours: &BTreeMap<MonthKey, f64>,
    ) -> CalendarResult<BTreeMap<MonthKey, MonthlyAllocation>> {
        let planned = self.distribute_hours_by_business_days(total_hours)?;
        let available = self.available_hours_by_month();
        let ratios = self.allocation_ratios();

        let mut months: BTreeMap<MonthKey, MonthlyAllocation> = BTreeMap::new();
        for (month, days) in self.business_days_by_month() {
            months.entry(month).or_default().working_days = days;
        }
        for (month, hours) in available {
            months.entry(month).or_default().available_hours = hours;
        }
        for (month, ratio) in ratios {
            months.entry(month).or_default().allocation_ratio = ratio;
        }
        for (month, hours) in planned {
            months.entry(month).or_default().planned_hours = hours;
        }
        for (month, hours) in actual_hours {
            months.entry(*month).or_default().actual_hours = *hours;
        }
        Ok(months)
    }
}
