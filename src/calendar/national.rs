use bdays::HolidayCalendar;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::{BTreeMap, HashMap};
use std::ops::RangeInclusive;

const SUBSTITUTE_HOLIDAY: &str = "振替休日";
const CITIZENS_HOLIDAY: &str = "国民の休日";

/// Japanese national holidays, precomputed for a range of years.
///
/// Dates outside the precomputed range are still answered; they are computed
/// on demand and not cached.
#[derive(Debug, Clone)]
pub struct NationalHolidays {
    years: RangeInclusive<i32>,
    holidays: HashMap<NaiveDate, &'static str>,
}

impl Default for NationalHolidays {
    fn default() -> Self {
        Self::with_year_range(2024, 2030)
    }
}

impl NationalHolidays {
    pub fn with_year_range(start_year: i32, end_year: i32) -> Self {
        let (start, end) = if start_year <= end_year {
            (start_year, end_year)
        } else {
            (end_year, start_year)
        };

        let holidays = (start..=end)
            .flat_map(|year| Self::for_year(year).into_iter())
            .collect();
        Self {
            years: start..=end,
            holidays,
        }
    }

    pub fn name(&self, date: NaiveDate) -> Option<&'static str> {
        if self.years.contains(&date.year()) {
            return self.holidays.get(&date).copied();
        }
        Self::for_year(date.year()).get(&date).copied()
    }

    /// All national holidays of `year`, including substitute and citizens' holidays.
    pub fn for_year(year: i32) -> BTreeMap<NaiveDate, &'static str> {
        let mut days = BTreeMap::new();
        let mut fixed = |month: u32, day: u32, name: &'static str| {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                days.insert(date, name);
            }
        };

        fixed(1, 1, "元日");
        fixed(2, 11, "建国記念の日");
        if year >= 2020 {
            fixed(2, 23, "天皇誕生日");
        } else if (1989..=2018).contains(&year) {
            fixed(12, 23, "天皇誕生日");
        }
        fixed(3, vernal_equinox_day(year), "春分の日");
        if year >= 2007 {
            fixed(4, 29, "昭和の日");
            fixed(5, 4, "みどりの日");
        } else {
            fixed(4, 29, "みどりの日");
        }
        fixed(5, 3, "憲法記念日");
        fixed(5, 5, "こどもの日");
        fixed(9, autumnal_equinox_day(year), "秋分の日");
        fixed(11, 3, "文化の日");
        fixed(11, 23, "勤労感謝の日");

        // Olympic years moved three holidays.
        match year {
            2020 => {
                fixed(7, 23, "海の日");
                fixed(7, 24, "スポーツの日");
                fixed(8, 10, "山の日");
            }
            2021 => {
                fixed(7, 22, "海の日");
                fixed(7, 23, "スポーツの日");
                fixed(8, 8, "山の日");
            }
            _ => {
                if year >= 2016 {
                    fixed(8, 11, "山の日");
                }
                let sports_day = if year >= 2020 { "スポーツの日" } else { "体育の日" };
                for (month, n, name) in [(7, 3, "海の日"), (10, 2, sports_day)] {
                    if let Some(date) = nth_weekday(year, month, Weekday::Mon, n) {
                        fixed(month, date.day(), name);
                    }
                }
            }
        }

        if year == 2019 {
            fixed(5, 1, "天皇の即位の日");
            fixed(10, 22, "即位礼正殿の儀の行われる日");
        }

        for (month, n, name) in [(1, 2, "成人の日"), (9, 3, "敬老の日")] {
            if let Some(date) = nth_weekday(year, month, Weekday::Mon, n) {
                days.insert(date, name);
            }
        }

        // A weekday squeezed between two holidays is itself a holiday.
        let base: Vec<NaiveDate> = days.keys().copied().collect();
        for pair in base.windows(2) {
            if pair[1] - pair[0] == Duration::days(2) {
                let middle = pair[0] + Duration::days(1);
                if middle.weekday() != Weekday::Sun {
                    days.insert(middle, CITIZENS_HOLIDAY);
                }
            }
        }

        // A holiday on Sunday moves to the next day that is not already a holiday.
        let sundays: Vec<NaiveDate> = days
            .keys()
            .copied()
            .filter(|date| date.weekday() == Weekday::Sun)
            .collect();
        for sunday in sundays {
            let mut next = sunday + Duration::days(1);
            while days.contains_key(&next) {
                next = next + Duration::days(1);
            }
            if next.year() == year {
                days.insert(next, SUBSTITUTE_HOLIDAY);
            }
        }

        days
    }
}

impl HolidayCalendar<NaiveDate> for NationalHolidays {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.name(date).is_some()
    }
}

fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u8) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
}

// Approximation published by the National Astronomical Observatory, valid 1980-2099.
fn vernal_equinox_day(year: i32) -> u32 {
    let y = f64::from(year - 1980);
    (20.8431 + 0.242194 * y - (y / 4.0).floor()).floor() as u32
}

fn autumnal_equinox_day(year: i32) -> u32 {
    let y = f64::from(year - 1980);
    (23.2488 + 0.242194 * y - (y / 4.0).floor()).floor() as u32
}
