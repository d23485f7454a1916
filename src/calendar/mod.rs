pub mod assignee;
pub mod company;
pub mod matcher;
pub mod national;
pub mod policy;

pub use assignee::{AssigneeWorkingCalendar, CalendarContext};
pub use company::CompanyCalendar;
pub use matcher::ScheduleMatcher;
pub use national::NationalHolidays;
pub use policy::{CapacityCalendar, HolidayOnlyCalendar};
