use chrono::NaiveDate;
use wbs_capacity::{
    Assignee, CalculationOptions, CalendarContext, CalendarError, CompanyCalendar, CompanyHoliday,
    DailyCapacityScheduler, HolidayKind, ProjectPeriod, Task,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn context() -> CalendarContext {
    CalendarContext::new(CompanyCalendar::default(), CalculationOptions::default()).unwrap()
}

fn task(id: i32, hours: Option<f64>) -> Task {
    let mut task = Task::new(id, format!("1.{id}"), format!("Task {id}"), d(2025, 9, 1));
    task.assignee_id = Some("u1".into());
    task.planned_hours = hours;
    task
}

#[test]
fn capacity_is_zero_on_weekends_and_national_holidays() {
    let ctx = context();
    let scheduler = DailyCapacityScheduler::new(&ctx);
    let project = ProjectPeriod::new(d(2025, 9, 12), d(2025, 9, 16)).unwrap();

    let capacity = scheduler
        .compute_daily_capacity(&project, &Assignee::new("u1", "佐藤", 1.0))
        .unwrap();
    assert_eq!(capacity.len(), 5);
    assert_eq!(capacity[&d(2025, 9, 12)], 7.5);
    assert_eq!(capacity[&d(2025, 9, 13)], 0.0);
    assert_eq!(capacity[&d(2025, 9, 14)], 0.0);
    assert_eq!(capacity[&d(2025, 9, 15)], 0.0);
    assert_eq!(capacity[&d(2025, 9, 16)], 7.5);
}

#[test]
fn capacity_scales_with_working_rate() {
    let ctx = context();
    let scheduler = DailyCapacityScheduler::new(&ctx);
    let project = ProjectPeriod::new(d(2025, 9, 1), d(2025, 9, 5)).unwrap();

    let capacity = scheduler
        .compute_daily_capacity(&project, &Assignee::new("u1", "佐藤", 0.8))
        .unwrap();
    assert!(capacity.values().all(|hours| *hours == 6.0));
}

#[test]
fn company_holidays_are_not_consulted() {
    let company = CompanyCalendar::new(vec![CompanyHoliday::new(
        d(2025, 9, 2),
        "創立記念日",
        HolidayKind::Company,
    )]);
    let ctx = CalendarContext::new(company, CalculationOptions::default()).unwrap();
    let scheduler = DailyCapacityScheduler::new(&ctx);
    let project = ProjectPeriod::new(d(2025, 9, 1), d(2025, 9, 5)).unwrap();
    let worker = Assignee::new("u1", "佐藤", 1.0);

    let capacity = scheduler.compute_daily_capacity(&project, &worker).unwrap();
    assert_eq!(capacity[&d(2025, 9, 2)], 7.5);

    let personal = ctx.assignee_calendar(&worker, &[]).unwrap();
    assert_eq!(personal.available_hours(d(2025, 9, 2)), 0.0);
}

#[test]
fn tasks_share_one_daily_pool_in_input_order() {
    let ctx = context();
    let scheduler = DailyCapacityScheduler::new(&ctx);
    let project = ProjectPeriod::new(d(2025, 9, 1), d(2025, 9, 5)).unwrap();
    let worker = Assignee::new("u1", "佐藤", 1.0);

    let capacity = scheduler.compute_daily_capacity(&project, &worker).unwrap();
    let tasks = [task(1, Some(10.0)), task(2, Some(10.0))];
    let schedule = scheduler.generate_schedule(&project, &capacity, &tasks);

    let rows: Vec<(i32, NaiveDate, f64)> = schedule
        .rows
        .iter()
        .map(|row| (row.task_id, row.date, row.hours))
        .collect();
    assert_eq!(
        rows,
        vec![
            (1, d(2025, 9, 1), 7.5),
            (1, d(2025, 9, 2), 2.5),
            (2, d(2025, 9, 2), 5.0),
            (2, d(2025, 9, 3), 5.0),
        ]
    );
    assert_eq!(schedule.hours_on(d(2025, 9, 2)), 7.5);
    assert_eq!(schedule.hours_for_task(2), 10.0);
    assert!(schedule.shortfalls.is_empty());
    // The caller's map is left untouched.
    assert_eq!(capacity[&d(2025, 9, 1)], 7.5);
}

#[test]
fn overflow_is_reported_as_shortfall() {
    let ctx = context();
    let scheduler = DailyCapacityScheduler::new(&ctx);
    let project = ProjectPeriod::new(d(2025, 9, 1), d(2025, 9, 2)).unwrap();

    let schedule = scheduler
        .schedule_worker(&project, &Assignee::new("u1", "佐藤", 1.0), &[task(1, Some(20.0))])
        .unwrap();
    assert_eq!(schedule.rows.len(), 2);
    assert_eq!(schedule.hours_for_task(1), 15.0);
    assert_eq!(schedule.shortfalls.len(), 1);
    assert_eq!(schedule.shortfalls[0].task_id, 1);
    assert_eq!(schedule.shortfalls[0].unallocated_hours, 5.0);
}

#[test]
fn tasks_without_hours_emit_no_rows() {
    let ctx = context();
    let scheduler = DailyCapacityScheduler::new(&ctx);
    let project = ProjectPeriod::new(d(2025, 9, 1), d(2025, 9, 5)).unwrap();

    let schedule = scheduler
        .schedule_worker(
            &project,
            &Assignee::new("u1", "佐藤", 1.0),
            &[task(1, None), task(2, Some(0.0)), task(3, Some(3.0))],
        )
        .unwrap();
    assert_eq!(schedule.rows.len(), 1);
    assert_eq!(schedule.rows[0].task_id, 3);
    assert!(schedule.shortfalls.is_empty());
}

#[test]
fn daily_capacity_is_never_exceeded() {
    let ctx = context();
    let scheduler = DailyCapacityScheduler::new(&ctx);
    let project = ProjectPeriod::new(d(2025, 9, 1), d(2025, 12, 31)).unwrap();
    let worker = Assignee::new("u1", "佐藤", 0.6);

    let capacity = scheduler.compute_daily_capacity(&project, &worker).unwrap();
    let tasks: Vec<Task> = (1..=12).map(|i| task(i, Some(3.7 * f64::from(i)))).collect();
    let schedule = scheduler.generate_schedule(&project, &capacity, &tasks);

    for (date, limit) in &capacity {
        assert!(schedule.hours_on(*date) <= limit + 1e-9, "{date} over capacity");
    }
    for task in &tasks {
        let placed = schedule.hours_for_task(task.id);
        assert!((placed - task.planned_hours.unwrap()).abs() < 1e-9);
    }
}

#[test]
fn zero_rate_worker_has_no_capacity() {
    let ctx = context();
    let scheduler = DailyCapacityScheduler::new(&ctx);
    let project = ProjectPeriod::new(d(2025, 9, 1), d(2025, 9, 5)).unwrap();

    let schedule = scheduler
        .schedule_worker(&project, &Assignee::new("u1", "佐藤", 0.0), &[task(1, Some(1.0))])
        .unwrap();
    assert!(schedule.rows.is_empty());
    assert_eq!(schedule.shortfalls[0].unallocated_hours, 1.0);
}

#[test]
fn inverted_project_range_is_rejected() {
    let err = ProjectPeriod::new(d(2025, 9, 5), d(2025, 9, 1)).unwrap_err();
    assert!(matches!(err, CalendarError::EndBeforeStart { .. }));
}
