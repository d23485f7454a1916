use crate::calendar::{AssigneeWorkingCalendar, CalendarContext, CapacityCalendar};
use crate::error::CalendarResult;
use crate::model::{Assignee, PersonalScheduleEntry, ScheduleResult, Task, UserId};
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;
use tracing::{debug, warn};

pub const NO_ASSIGNEE_MESSAGE: &str = "担当者が設定されていません";
pub const NO_PLANNED_HOURS_MESSAGE: &str = "予定工数が設定されていません";
pub const NO_WORKING_DAY_MESSAGE: &str = "稼働可能日が見つかりません";

const HOURS_EPSILON: f64 = 1e-9;

pub fn assignee_not_found_message(user_id: &str) -> String {
    format!("担当者が見つかりません: {user_id}")
}

/// Last assigned end date per worker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulingCursor {
    last_end: HashMap<UserId, NaiveDate>,
}

impl SchedulingCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_end(&self, user_id: &str) -> Option<NaiveDate> {
        self.last_end.get(user_id).copied()
    }

    pub fn advanced(mut self, user_id: &str, end: NaiveDate) -> Self {
        self.last_end.insert(user_id.to_string(), end);
        self
    }
}

/// First date on or after `from` with capacity, looking at most `horizon` days ahead.
pub fn next_available_day<C: CapacityCalendar>(
    calendar: &C,
    from: NaiveDate,
    horizon: u32,
) -> Option<NaiveDate> {
    let mut date = from;
    for _ in 0..horizon {
        if calendar.available_hours(date) > 0.0 {
            return Some(date);
        }
        date = date + Duration::days(1);
    }
    None
}

/// Date on which `hours` of work started on `start` is used up.
///
/// Days without capacity are skipped without consuming anything.
pub fn consume_hours<C: CapacityCalendar>(
    calendar: &C,
    start: NaiveDate,
    hours: f64,
    horizon: u32,
) -> Option<NaiveDate> {
    let mut remaining = hours;
    let mut date = start;
    for _ in 0..horizon {
        let available = calendar.available_hours(date);
        if available > 0.0 {
            remaining -= available;
            if remaining <= HOURS_EPSILON {
                return Some(date);
            }
        }
        date = date + Duration::days(1);
    }
    None
}

/// Forward scheduler that lays each worker's tasks end to end.
///
/// Workers are independent; for one worker a task starts on the first day
/// with capacity after the previous task's end, so ranges never overlap.
pub struct TaskSchedulingService<'a> {
    context: &'a CalendarContext,
    assignees: HashMap<UserId, Assignee>,
    calendars: HashMap<UserId, AssigneeWorkingCalendar<'a>>,
}

impl<'a> TaskSchedulingService<'a> {
    pub fn new(
        context: &'a CalendarContext,
        assignees: &[Assignee],
        personal_schedule: &[PersonalScheduleEntry],
    ) -> CalendarResult<Self> {
        let mut calendars = HashMap::with_capacity(assignees.len());
        let mut by_id = HashMap::with_capacity(assignees.len());
        for assignee in assignees {
            let calendar = context.assignee_calendar(assignee, personal_schedule)?;
            calendars.insert(assignee.user_id.clone(), calendar);
            by_id.insert(assignee.user_id.clone(), assignee.clone());
        }
        Ok(Self {
            context,
            assignees: by_id,
            calendars,
        })
    }

    pub fn calendar(&self, user_id: &str) -> Option<&AssigneeWorkingCalendar<'a>> {
        self.calendars.get(user_id)
    }

    /// Schedule `tasks` in `task_no` order starting from `project_start`.
    ///
    /// One result is returned per task; failures never stop the batch.
    pub fn schedule(&self, tasks: &[Task], project_start: NaiveDate) -> Vec<ScheduleResult> {
        let mut ordered: Vec<&Task> = tasks.iter().collect();
        ordered.sort_by(|a, b| a.task_no.cmp(&b.task_no));

        let (results, _) = ordered.into_iter().fold(
            (Vec::with_capacity(tasks.len()), SchedulingCursor::new()),
            |(mut results, cursor), task| {
                let (result, cursor) = self.schedule_task(task, project_start, cursor);
                results.push(result);
                (results, cursor)
            },
        );
        results
    }

    /// Schedule a single task against `cursor`, returning the advanced cursor.
    pub fn schedule_task(
        &self,
        task: &Task,
        project_start: NaiveDate,
        cursor: SchedulingCursor,
    ) -> (ScheduleResult, SchedulingCursor) {
        let Some(user_id) = task.assignee_id.as_deref() else {
            debug!(task_no = %task.task_no, "task has no assignee");
            return (ScheduleResult::failed(task, NO_ASSIGNEE_MESSAGE), cursor);
        };

        let assignee = self.assignees.get(user_id);
        let hours = match task.planned_hours {
            Some(hours) if hours.is_finite() && hours > 0.0 => hours,
            _ => {
                let mut result = ScheduleResult::failed(task, NO_PLANNED_HOURS_MESSAGE);
                result.assignee_name = assignee.map(|a| a.name.clone());
                return (result, cursor);
            }
        };

        let (Some(assignee), Some(calendar)) = (assignee, self.calendars.get(user_id)) else {
            return (
                ScheduleResult::failed(task, assignee_not_found_message(user_id)),
                cursor,
            );
        };

        let horizon = self.context.options().max_scan_days;
        let scan_from = match cursor.last_end(user_id) {
            Some(previous_end) => previous_end + Duration::days(1),
            None => project_start,
        };

        let span = next_available_day(calendar, scan_from, horizon)
            .and_then(|start| consume_hours(calendar, start, hours, horizon).map(|end| (start, end)));
        let Some((start, end)) = span else {
            warn!(
                task_no = %task.task_no,
                user_id,
                from = %scan_from,
                horizon,
                "no schedulable days within scan horizon"
            );
            let mut result = ScheduleResult::failed(task, NO_WORKING_DAY_MESSAGE);
            result.assignee_name = Some(assignee.name.clone());
            return (result, cursor);
        };

        debug!(task_no = %task.task_no, user_id, %start, %end, hours, "scheduled task");
        (
            ScheduleResult::scheduled(task, assignee, start, end, hours),
            cursor.advanced(user_id, end),
        )
    }
}
