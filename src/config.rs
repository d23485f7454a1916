use crate::error::{CalendarError, CalendarResult};
use serde::{Deserialize, Serialize};

pub const DEFAULT_STANDARD_WORKING_HOURS: f64 = 7.5;

/// Upper bound for the sequential scheduler's day-by-day scans (about ten years).
pub const DEFAULT_MAX_SCAN_DAYS: u32 = 3660;

/// How a personal-schedule title is compared against include/exclude patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchType {
    Exact,
    #[default]
    Contains,
    Regex,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Exact => "EXACT",
            MatchType::Contains => "CONTAINS",
            MatchType::Regex => "REGEX",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalculationOptions {
    pub standard_working_hours: f64,
    pub consider_personal_schedule: bool,
    pub schedule_include_patterns: Vec<String>,
    pub schedule_exclude_patterns: Vec<String>,
    pub schedule_match_type: MatchType,
    pub max_scan_days: u32,
}

impl Default for CalculationOptions {
    fn default() -> Self {
        Self {
            standard_working_hours: DEFAULT_STANDARD_WORKING_HOURS,
            consider_personal_schedule: false,
            schedule_include_patterns: Vec::new(),
            schedule_exclude_patterns: Vec::new(),
            schedule_match_type: MatchType::default(),
            max_scan_days: DEFAULT_MAX_SCAN_DAYS,
        }
    }
}

impl CalculationOptions {
    /// Options that deduct personal-schedule entries whose titles match `include`.
    pub fn with_personal_schedule<I, S>(include: I, match_type: MatchType) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            consider_personal_schedule: true,
            schedule_include_patterns: include.into_iter().map(Into::into).collect(),
            schedule_match_type: match_type,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> CalendarResult<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> CalendarResult<()> {
        if !self.standard_working_hours.is_finite() || self.standard_working_hours <= 0.0 {
            return Err(CalendarError::InvalidStandardHours(
                self.standard_working_hours,
            ));
        }
        if self.max_scan_days == 0 {
            return Err(CalendarError::InvalidScanHorizon);
        }
        Ok(())
    }
}
