use crate::calendar::{CalendarContext, CapacityCalendar};
use crate::error::CalendarResult;
use crate::model::{Assignee, ProjectPeriod, Task};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

const HOURS_EPSILON: f64 = 1e-9;

/// Schedulable hours per date for one worker.
pub type DailyCapacity = BTreeMap<NaiveDate, f64>;

/// Hours of one task placed on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAllocationRow {
    pub task_id: i32,
    pub task_no: String,
    pub task_name: String,
    pub date: NaiveDate,
    pub hours: f64,
}

/// Hours of a task that did not fit before the project end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shortfall {
    pub task_id: i32,
    pub task_no: String,
    pub unallocated_hours: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySchedule {
    pub rows: Vec<DailyAllocationRow>,
    pub shortfalls: Vec<Shortfall>,
}

impl DailySchedule {
    pub fn hours_for_task(&self, task_id: i32) -> f64 {
        self.rows
            .iter()
            .filter(|row| row.task_id == task_id)
            .map(|row| row.hours)
            .sum()
    }

    pub fn hours_on(&self, date: NaiveDate) -> f64 {
        self.rows
            .iter()
            .filter(|row| row.date == date)
            .map(|row| row.hours)
            .sum()
    }
}

/// Greedy day-level allocator for batch scheduling of one worker's tasks.
///
/// Capacity comes from the holiday-only calendar: company holidays and
/// personal schedules are not consulted.
pub struct DailyCapacityScheduler<'a> {
    context: &'a CalendarContext,
}

impl<'a> DailyCapacityScheduler<'a> {
    pub fn new(context: &'a CalendarContext) -> Self {
        Self { context }
    }

    pub fn compute_daily_capacity(
        &self,
        project: &ProjectPeriod,
        worker: &Assignee,
    ) -> CalendarResult<DailyCapacity> {
        let calendar = self.context.holiday_only_calendar(worker)?;
        let standard = calendar.standard_working_hours();

        let mut capacity = DailyCapacity::new();
        for date in project.days() {
            let hours = if calendar.is_holiday(date) {
                0.0
            } else {
                // `date` is only inserted below, so within one pass this reads zero.
                let reserved = capacity.get(&date).copied().unwrap_or(0.0);
                (standard - reserved).min(calendar.rated_hours())
            };
            capacity.insert(date, hours);
        }
        Ok(capacity)
    }

    /// Consume `daily_capacity` task by task, in input order.
    ///
    /// Every task walks the project range from its first day, so later tasks
    /// fill whatever earlier tasks left on each date.
    pub fn generate_schedule(
        &self,
        project: &ProjectPeriod,
        daily_capacity: &DailyCapacity,
        tasks: &[Task],
    ) -> DailySchedule {
        let mut pool = daily_capacity.clone();
        let mut schedule = DailySchedule::default();

        for task in tasks {
            let hours = match task.planned_hours {
                Some(hours) if hours.is_finite() && hours > 0.0 => hours,
                _ => {
                    debug!(task_no = %task.task_no, "skipping task without planned hours");
                    continue;
                }
            };

            let mut remaining = hours;
            for date in project.days() {
                if remaining <= HOURS_EPSILON {
                    break;
                }
                let Some(available) = pool.get_mut(&date) else {
                    continue;
                };
                if *available <= 0.0 {
                    continue;
                }
                let used = remaining.min(*available);
                *available -= used;
                remaining -= used;
                schedule.rows.push(DailyAllocationRow {
                    task_id: task.id,
                    task_no: task.task_no.clone(),
                    task_name: task.name.clone(),
                    date,
                    hours: used,
                });
            }

            if remaining > HOURS_EPSILON {
                warn!(task_no = %task.task_no, remaining, "task does not fit in project range");
                schedule.shortfalls.push(Shortfall {
                    task_id: task.id,
                    task_no: task.task_no.clone(),
                    unallocated_hours: remaining,
                });
            }
        }

        schedule
    }

    /// Capacity computation followed by allocation for one worker.
    pub fn schedule_worker(
        &self,
        project: &ProjectPeriod,
        worker: &Assignee,
        tasks: &[Task],
    ) -> CalendarResult<DailySchedule> {
        let capacity = self.compute_daily_capacity(project, worker)?;
        Ok(self.generate_schedule(project, &capacity, tasks))
    }
}
