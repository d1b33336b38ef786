//! Recurrence rules, modeled as data.
//!
//! Each repetition kind is a tagged variant consumed by one expansion
//! function per variant (see [`crate::expansion`]), which keeps the
//! calendar arithmetic out of the placement logic.
//!
//! # Grammar
//!
//! | Keyword | Variant |
//! |---|---|
//! | `daily` | `Daily(1)` |
//! | `weekly` | `Weekly(1)` |
//! | `mondays` … `sundays` | `Weekday(_)` |
//! | `weekdays` | `Weekdays` |
//! | `weekends` | `Weekends` |
//! | `hourly` | `EveryXHours(1)` |
//! | `every N days` / `every N hours` | `EveryXDays(N)` / `EveryXHours(N)` |
//! | `N/day` / `N/week` | `Daily(N)` / `Weekly(N)` |
//! | `N-M/day` / `N-M/week` | `FlexDaily(N, M)` / `FlexWeekly(N, M)` |
//!
//! Anything else is [`SchedulerError::InvalidRepetition`].

use std::fmt;
use std::str::FromStr;

use chrono::Weekday;

use crate::error::{SchedulerError, SchedulerResult};

/// How often a goal repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repetition {
    /// N occurrences per day (`daily` = 1, `3/day` = 3).
    Daily(usize),
    /// N occurrences per week (`weekly` = 1, `3/week` = 3).
    Weekly(usize),
    /// One occurrence on each matching weekday (`wednesdays`).
    Weekday(Weekday),
    /// One occurrence per Monday-to-Friday day.
    Weekdays,
    /// One occurrence per Saturday/Sunday day.
    Weekends,
    /// One occurrence every N days.
    EveryXDays(usize),
    /// Successive occurrences every N hours.
    EveryXHours(usize),
    /// Between min and max occurrences per day; scheduled at min.
    FlexDaily(usize, usize),
    /// Between min and max occurrences per week; scheduled at min.
    FlexWeekly(usize, usize),
}

impl Repetition {
    /// Occurrences generated per period (day or week).
    ///
    /// Flexible counts commit to their minimum; the upper bound is
    /// advisory and never forces placement.
    pub fn per_period(&self) -> usize {
        match self {
            Repetition::Daily(n) | Repetition::Weekly(n) => (*n).max(1),
            Repetition::FlexDaily(min, _) | Repetition::FlexWeekly(min, _) => (*min).max(1),
            _ => 1,
        }
    }
}

fn parse_count(s: &str, original: &str) -> SchedulerResult<usize> {
    s.parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| SchedulerError::InvalidRepetition {
            value: original.to_string(),
        })
}

impl FromStr for Repetition {
    type Err = SchedulerError;

    fn from_str(s: &str) -> SchedulerResult<Self> {
        let invalid = || SchedulerError::InvalidRepetition {
            value: s.to_string(),
        };

        match s {
            "daily" => return Ok(Repetition::Daily(1)),
            "weekly" => return Ok(Repetition::Weekly(1)),
            "hourly" => return Ok(Repetition::EveryXHours(1)),
            "weekdays" => return Ok(Repetition::Weekdays),
            "weekends" => return Ok(Repetition::Weekends),
            "mondays" => return Ok(Repetition::Weekday(Weekday::Mon)),
            "tuesdays" => return Ok(Repetition::Weekday(Weekday::Tue)),
            "wednesdays" => return Ok(Repetition::Weekday(Weekday::Wed)),
            "thursdays" => return Ok(Repetition::Weekday(Weekday::Thu)),
            "fridays" => return Ok(Repetition::Weekday(Weekday::Fri)),
            "saturdays" => return Ok(Repetition::Weekday(Weekday::Sat)),
            "sundays" => return Ok(Repetition::Weekday(Weekday::Sun)),
            _ => {}
        }

        if let Some((counts, period)) = s.split_once('/') {
            // "4/week", "3-5/day"
            if let Some((min, max)) = counts.split_once('-') {
                let min = parse_count(min, s)?;
                let max = parse_count(max, s)?;
                if max < min {
                    return Err(invalid());
                }
                return match period {
                    "day" => Ok(Repetition::FlexDaily(min, max)),
                    "week" => Ok(Repetition::FlexWeekly(min, max)),
                    _ => Err(invalid()),
                };
            }
            let n = parse_count(counts, s)?;
            return match period {
                "day" => Ok(Repetition::Daily(n)),
                "week" => Ok(Repetition::Weekly(n)),
                _ => Err(invalid()),
            };
        }

        // "every 5 days", "every 6 hours"
        let words: Vec<&str> = s.split(' ').collect();
        if let ["every", n, unit] = words.as_slice() {
            let n = parse_count(n, s)?;
            return match *unit {
                "days" => Ok(Repetition::EveryXDays(n)),
                "hours" => Ok(Repetition::EveryXHours(n)),
                _ => Err(invalid()),
            };
        }

        Err(invalid())
    }
}

impl fmt::Display for Repetition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Repetition::Daily(1) => write!(f, "daily"),
            Repetition::Daily(n) => write!(f, "{n}/day"),
            Repetition::Weekly(1) => write!(f, "weekly"),
            Repetition::Weekly(n) => write!(f, "{n}/week"),
            Repetition::Weekday(day) => match day {
                Weekday::Mon => write!(f, "mondays"),
                Weekday::Tue => write!(f, "tuesdays"),
                Weekday::Wed => write!(f, "wednesdays"),
                Weekday::Thu => write!(f, "thursdays"),
                Weekday::Fri => write!(f, "fridays"),
                Weekday::Sat => write!(f, "saturdays"),
                Weekday::Sun => write!(f, "sundays"),
            },
            Repetition::Weekdays => write!(f, "weekdays"),
            Repetition::Weekends => write!(f, "weekends"),
            Repetition::EveryXDays(n) => write!(f, "every {n} days"),
            Repetition::EveryXHours(1) => write!(f, "hourly"),
            Repetition::EveryXHours(n) => write!(f, "every {n} hours"),
            Repetition::FlexDaily(min, max) => write!(f, "{min}-{max}/day"),
            Repetition::FlexWeekly(min, max) => write!(f, "{min}-{max}/week"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keywords() {
        assert_eq!("daily".parse::<Repetition>().unwrap(), Repetition::Daily(1));
        assert_eq!(
            "weekly".parse::<Repetition>().unwrap(),
            Repetition::Weekly(1)
        );
        assert_eq!(
            "wednesdays".parse::<Repetition>().unwrap(),
            Repetition::Weekday(Weekday::Wed)
        );
        assert_eq!(
            "weekends".parse::<Repetition>().unwrap(),
            Repetition::Weekends
        );
        assert_eq!(
            "weekdays".parse::<Repetition>().unwrap(),
            Repetition::Weekdays
        );
        assert_eq!(
            "hourly".parse::<Repetition>().unwrap(),
            Repetition::EveryXHours(1)
        );
    }

    #[test]
    fn test_parse_counted_forms() {
        assert_eq!("4/week".parse::<Repetition>().unwrap(), Repetition::Weekly(4));
        assert_eq!("2/day".parse::<Repetition>().unwrap(), Repetition::Daily(2));
        assert_eq!(
            "every 5 days".parse::<Repetition>().unwrap(),
            Repetition::EveryXDays(5)
        );
        assert_eq!(
            "every 6 hours".parse::<Repetition>().unwrap(),
            Repetition::EveryXHours(6)
        );
        assert_eq!(
            "3-5/week".parse::<Repetition>().unwrap(),
            Repetition::FlexWeekly(3, 5)
        );
        assert_eq!(
            "1-2/day".parse::<Repetition>().unwrap(),
            Repetition::FlexDaily(1, 2)
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        for bad in [
            "invalid-value-AAAAAA",
            "every 5 months",
            "4/month",
            "0/day",
            "5-3/week",
            "every x days",
            "",
        ] {
            let err = bad.parse::<Repetition>().unwrap_err();
            assert!(
                matches!(err, SchedulerError::InvalidRepetition { ref value } if value == bad),
                "expected InvalidRepetition for {bad:?}"
            );
        }
    }

    #[test]
    fn test_display_round_trip() {
        for text in ["daily", "hourly", "3/day", "weekly", "4/week", "mondays",
            "weekends", "every 5 days", "every 6 hours", "3-5/week"] {
            let rep = text.parse::<Repetition>().unwrap();
            assert_eq!(rep.to_string(), text);
        }
    }

    #[test]
    fn test_per_period() {
        assert_eq!(Repetition::Daily(3).per_period(), 3);
        assert_eq!(Repetition::FlexWeekly(2, 5).per_period(), 2);
        assert_eq!(Repetition::Weekends.per_period(), 1);
    }
}
