use crate::calendar::CapacityCalendar;
use crate::error::CalendarResult;
use crate::model::{MonthKey, Task};
use crate::period::{BusinessDayPeriod, MonthlyAllocation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAllocation {
    pub task_id: i32,
    pub task_no: String,
    pub months: BTreeMap<MonthKey, MonthlyAllocation>,
}

impl TaskAllocation {
    pub fn planned_total(&self) -> f64 {
        self.months.values().map(|m| m.planned_hours).sum()
    }
}

/// Combined totals of several tasks for one month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub planned_hours: f64,
    pub actual_hours: f64,
    pub task_count: u32,
}

/// Applies [`BusinessDayPeriod`] to the tasks of one worker.
#[derive(Debug, Clone)]
pub struct WorkingHoursAllocationService<C> {
    calendar: C,
}

impl<C: CapacityCalendar> WorkingHoursAllocationService<C> {
    pub fn new(calendar: C) -> Self {
        Self { calendar }
    }

    fn period_for(&self, task: &Task) -> CalendarResult<BusinessDayPeriod<&C>> {
        task.validate()?;
        let (start, end) = task.planned_range();
        BusinessDayPeriod::new(&self.calendar, start, end)
    }

    /// Planned hours per month for `task`. Missing hours allocate as zero.
    pub fn allocate_task(&self, task: &Task) -> CalendarResult<BTreeMap<MonthKey, f64>> {
        let period = self.period_for(task)?;
        period.distribute_hours_by_business_days(task.planned_hours.unwrap_or(0.0))
    }

    pub fn allocate_task_with_actuals(
        &self,
        task: &Task,
        actual_hours: &BTreeMap<MonthKey, f64>,
    ) -> CalendarResult<TaskAllocation> {
        let period = self.period_for(task)?;
        let months = period.monthly_allocation(task.planned_hours.unwrap_or(0.0), actual_hours)?;
        debug!(task_id = task.id, months = months.len(), "allocated task hours");
        Ok(TaskAllocation {
            task_id: task.id,
            task_no: task.task_no.clone(),
            months,
        })
    }

    /// Allocate every task; the first invalid task aborts the batch.
    pub fn allocate_tasks(&self, tasks: &[Task]) -> CalendarResult<Vec<TaskAllocation>> {
        let no_actuals = BTreeMap::new();
        tasks
            .iter()
            .map(|task| self.allocate_task_with_actuals(task, &no_actuals))
            .collect()
    }

    /// Planned hours of all `tasks` merged into one total per month.
    pub fn allocate_for_worker(&self, tasks: &[Task]) -> CalendarResult<BTreeMap<MonthKey, f64>> {
        let allocations = self.allocate_tasks(tasks)?;
        Ok(summarize_by_month(&allocations)
            .into_iter()
            .map(|(month, summary)| (month, summary.planned_hours))
            .collect())
    }
}

/// Merge per-task allocations into per-month totals. Slices are already
/// rounded, so they are summed as-is.
pub fn summarize_by_month(allocations: &[TaskAllocation]) -> BTreeMap<MonthKey, MonthlySummary> {
    let mut summary: BTreeMap<MonthKey, MonthlySummary> = BTreeMap::new();
    for allocation in allocations {
        for (month, slice) in &allocation.months {
            if slice.planned_hours == 0.0 && slice.actual_hours == 0.0 {
                continue;
            }
            let entry = summary.entry(*month).or_default();
            entry.planned_hours += slice.planned_hours;
            entry.actual_hours += slice.actual_hours;
            entry.task_count += 1;
        }
    }
    summary
}
