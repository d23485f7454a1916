pub mod daily;
pub mod sequential;

pub use daily::{DailyAllocationRow, DailyCapacity, DailyCapacityScheduler, DailySchedule, Shortfall};
pub use sequential::{SchedulingCursor, TaskSchedulingService};
