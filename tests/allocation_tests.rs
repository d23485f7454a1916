use chrono::NaiveDate;
use std::collections::BTreeMap;
use wbs_capacity::{
    Assignee, CalculationOptions, CalendarContext, CalendarError, CompanyCalendar, MonthKey, Task,
    WorkingHoursAllocationService, summarize_by_month,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn month(y: i32, m: u32) -> MonthKey {
    MonthKey::new(y, m)
}

fn context() -> CalendarContext {
    let options = CalculationOptions {
        standard_working_hours: 5.0,
        ..CalculationOptions::default()
    };
    CalendarContext::new(CompanyCalendar::default(), options).unwrap()
}

#[test]
fn missing_end_date_defaults_to_start() {
    let ctx = context();
    let cal = ctx
        .assignee_calendar(&Assignee::new("u1", "Sato", 1.0), &[])
        .unwrap();
    let service = WorkingHoursAllocationService::new(&cal);

    let task = Task::new(1, "1", "Review", d(2025, 9, 30)).with_hours(8.0);
    assert_eq!(
        service.allocate_task(&task).unwrap(),
        BTreeMap::from([(month(2025, 9), 8.0)])
    );
}

#[test]
fn task_hours_follow_monthly_capacity() {
    let ctx = context();
    let cal = ctx
        .assignee_calendar(&Assignee::new("u1", "Sato", 1.0), &[])
        .unwrap();
    let service = WorkingHoursAllocationService::new(&cal);

    let task = Task::new(1, "1", "Build", d(2025, 9, 29))
        .with_end(d(2025, 10, 6))
        .with_hours(30.0);
    assert_eq!(
        service.allocate_task(&task).unwrap(),
        BTreeMap::from([(month(2025, 9), 10.0), (month(2025, 10), 20.0)])
    );
}

#[test]
fn missing_hours_allocate_as_zero() {
    let ctx = context();
    let cal = ctx
        .assignee_calendar(&Assignee::new("u1", "Sato", 1.0), &[])
        .unwrap();
    let service = WorkingHoursAllocationService::new(&cal);

    let task = Task::new(1, "1", "Idle", d(2025, 9, 29)).with_end(d(2025, 10, 6));
    let allocated = service.allocate_task(&task).unwrap();
    assert!(allocated.values().all(|hours| *hours == 0.0));
}

#[test]
fn actuals_are_merged_into_the_breakdown() {
    let ctx = context();
    let cal = ctx
        .assignee_calendar(&Assignee::new("u1", "Sato", 1.0), &[])
        .unwrap();
    let service = WorkingHoursAllocationService::new(&cal);

    let task = Task::new(7, "1.2", "Build", d(2025, 9, 29))
        .with_end(d(2025, 10, 6))
        .with_hours(30.0);
    let actuals = BTreeMap::from([(month(2025, 9), 12.5)]);
    let allocation = service.allocate_task_with_actuals(&task, &actuals).unwrap();

    assert_eq!(allocation.task_id, 7);
    assert_eq!(allocation.task_no, "1.2");
    assert_eq!(allocation.planned_total(), 30.0);
    assert_eq!(allocation.months[&month(2025, 9)].actual_hours, 12.5);
    assert_eq!(allocation.months[&month(2025, 10)].working_days, 4);
}

#[test]
fn worker_totals_merge_all_tasks() {
    let ctx = context();
    let cal = ctx
        .assignee_calendar(&Assignee::new("u1", "Sato", 1.0), &[])
        .unwrap();
    let service = WorkingHoursAllocationService::new(&cal);

    let tasks = vec![
        Task::new(1, "1", "Build", d(2025, 9, 29))
            .with_end(d(2025, 10, 6))
            .with_hours(30.0),
        Task::new(2, "2", "Test", d(2025, 10, 1)).with_hours(6.0),
    ];
    assert_eq!(
        service.allocate_for_worker(&tasks).unwrap(),
        BTreeMap::from([(month(2025, 9), 10.0), (month(2025, 10), 26.0)])
    );

    let summary = summarize_by_month(&service.allocate_tasks(&tasks).unwrap());
    assert_eq!(summary[&month(2025, 9)].task_count, 1);
    assert_eq!(summary[&month(2025, 10)].task_count, 2);
    assert_eq!(summary[&month(2025, 10)].planned_hours, 26.0);
}

#[test]
fn merged_month_is_the_plain_sum_of_task_slices() {
    let ctx = context();
    let cal = ctx
        .assignee_calendar(&Assignee::new("u1", "Sato", 1.0), &[])
        .unwrap();
    let service = WorkingHoursAllocationService::new(&cal);

    let tasks = vec![
        Task::new(1, "1", "Check", d(2025, 10, 1)).with_hours(0.1),
        Task::new(2, "2", "Sign-off", d(2025, 10, 1)).with_hours(0.2),
    ];
    let allocations = service.allocate_tasks(&tasks).unwrap();
    let task_total: f64 = allocations.iter().map(|a| a.planned_total()).sum();

    let summary = summarize_by_month(&allocations);
    assert_eq!(summary[&month(2025, 10)].planned_hours, task_total);
    assert_eq!(
        service.allocate_for_worker(&tasks).unwrap()[&month(2025, 10)],
        0.1 + 0.2
    );
}

#[test]
fn invalid_task_aborts_batch() {
    let ctx = context();
    let cal = ctx
        .assignee_calendar(&Assignee::new("u1", "Sato", 1.0), &[])
        .unwrap();
    let service = WorkingHoursAllocationService::new(&cal);

    let tasks = vec![
        Task::new(1, "1", "Build", d(2025, 9, 1)).with_hours(4.0),
        Task::new(2, "2", "Broken", d(2025, 9, 1)).with_hours(-4.0),
    ];
    let err = service.allocate_tasks(&tasks).unwrap_err();
    assert!(matches!(err, CalendarError::InvalidHours(_)));
}

#[test]
fn allocation_serializes_with_month_keys() {
    let ctx = context();
    let cal = ctx
        .assignee_calendar(&Assignee::new("u1", "Sato", 1.0), &[])
        .unwrap();
    let service = WorkingHoursAllocationService::new(&cal);
    let task = Task::new(1, "1", "Review", d(2025, 9, 30)).with_hours(2.0);

    let allocation = service
        .allocate_task_with_actuals(&task, &BTreeMap::new())
        .unwrap();
    let json = serde_json::to_value(&allocation).unwrap();
    assert_eq!(json["months"]["2025/09"]["plannedHours"], 2.0);
    assert_eq!(json["months"]["2025/09"]["workingDays"], 1);
}
