//! Calendar-aware capacity and task scheduling for WBS projects.
//!
//! Workers' daily capacity is derived from a company calendar, their working
//! rate and their personal schedule; on top of that the crate distributes
//! planned hours across months and assigns dates to tasks.

pub mod allocation;
pub mod calendar;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod period;
pub mod scheduling;

pub use allocation::{MonthlySummary, TaskAllocation, WorkingHoursAllocationService, summarize_by_month};
pub use calendar::{
    AssigneeWorkingCalendar, CalendarContext, CapacityCalendar, CompanyCalendar,
    HolidayOnlyCalendar, NationalHolidays, ScheduleMatcher,
};
pub use config::{CalculationOptions, MatchType};
pub use error::{CalendarError, CalendarResult, ExportError, ExportResult};
pub use export::{convert_to_tsv, save_daily_rows_to_csv, save_tsv, write_daily_rows_csv, write_tsv};
pub use model::{
    Assignee, CompanyHoliday, HolidayKind, MonthKey, PersonalScheduleEntry, ProjectPeriod,
    ScheduleResult, Task,
};
pub use period::{BusinessDayPeriod, MonthlyAllocation};
pub use scheduling::{
    DailyAllocationRow, DailyCapacity, DailyCapacityScheduler, DailySchedule, SchedulingCursor,
    Shortfall, TaskSchedulingService,
};
