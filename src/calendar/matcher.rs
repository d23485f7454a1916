use crate::config::{CalculationOptions, MatchType};
use regex::{Regex, RegexBuilder};
use tracing::warn;

// Compiled program size cap for configured patterns.
const REGEX_SIZE_LIMIT: usize = 1 << 20;

#[derive(Debug, Clone)]
enum CompiledPattern {
    Exact(String),
    Contains(String),
    Regex(Regex),
}

impl CompiledPattern {
    fn compile(pattern: &str, match_type: MatchType) -> Self {
        match match_type {
            MatchType::Exact => Self::Exact(pattern.to_string()),
            MatchType::Contains => Self::Contains(pattern.to_string()),
            MatchType::Regex => match RegexBuilder::new(pattern)
                .size_limit(REGEX_SIZE_LIMIT)
                .build()
            {
                Ok(regex) => Self::Regex(regex),
                Err(err) => {
                    warn!(pattern, error = %err, "invalid schedule pattern, matching as substring");
                    Self::Contains(pattern.to_string())
                }
            },
        }
    }

    fn matches(&self, title: &str) -> bool {
        match self {
            Self::Exact(pattern) => title == pattern,
            Self::Contains(pattern) => title.contains(pattern.as_str()),
            Self::Regex(regex) => regex.is_match(title),
        }
    }
}

/// Decides whether a personal-schedule title counts toward hour deduction.
///
/// Patterns are compiled once; an exclude hit always wins over an include hit.
#[derive(Debug, Clone)]
pub struct ScheduleMatcher {
    include: Vec<CompiledPattern>,
    exclude: Vec<CompiledPattern>,
}

impl ScheduleMatcher {
    pub fn new(options: &CalculationOptions) -> Self {
        Self::from_patterns(
            &options.schedule_include_patterns,
            &options.schedule_exclude_patterns,
            options.schedule_match_type,
        )
    }

    pub fn from_patterns<S: AsRef<str>>(include: &[S], exclude: &[S], match_type: MatchType) -> Self {
        let compile = |patterns: &[S]| -> Vec<CompiledPattern> {
            patterns
                .iter()
                .map(|pattern| CompiledPattern::compile(pattern.as_ref(), match_type))
                .collect()
        };
        Self {
            include: compile(include),
            exclude: compile(exclude),
        }
    }

    pub fn is_considered(&self, title: &str) -> bool {
        if self.exclude.iter().any(|pattern| pattern.matches(title)) {
            return false;
        }
        self.include.iter().any(|pattern| pattern.matches(title))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_requires_full_equality() {
        let matcher = ScheduleMatcher::from_patterns(&["休暇"], &[], MatchType::Exact);
        assert!(matcher.is_considered("休暇"));
        assert!(!matcher.is_considered("有給休暇"));
    }

    #[test]
    fn contains_matches_substrings() {
        let matcher = ScheduleMatcher::from_patterns(&["休暇"], &[], MatchType::Contains);
        assert!(matcher.is_considered("休暇"));
        assert!(matcher.is_considered("有給休暇"));
        assert!(!matcher.is_considered("定例会議"));
    }

    #[test]
    fn exclude_short_circuits_include() {
        let matcher = ScheduleMatcher::from_patterns(&["休暇"], &["午前"], MatchType::Contains);
        assert!(!matcher.is_considered("午前休暇"));
        assert!(matcher.is_considered("午後休暇"));
    }

    #[test]
    fn regex_patterns_are_anchored_by_the_pattern_itself() {
        let matcher = ScheduleMatcher::from_patterns(&["^(有給|代休)$"], &[], MatchType::Regex);
        assert!(matcher.is_considered("有給"));
        assert!(matcher.is_considered("代休"));
        assert!(!matcher.is_considered("有給休暇"));
    }

    #[test]
    fn invalid_regex_degrades_to_contains() {
        let matcher = ScheduleMatcher::from_patterns(&["休暇("], &[], MatchType::Regex);
        assert!(matcher.is_considered("夏季休暇(前半)"));
        assert!(!matcher.is_considered("夏季休暇"));
    }

    #[test]
    fn empty_include_list_considers_nothing() {
        let matcher = ScheduleMatcher::from_patterns::<&str>(&[], &[], MatchType::Contains);
        assert!(!matcher.is_considered("休暇"));
    }
}
