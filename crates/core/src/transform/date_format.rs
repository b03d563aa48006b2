//! Date and time rendering for [`DateTimeFormat`](super::DateTimeFormat).
//!
//! The AM/PM marker is re-cased on the rendered time string, before it is
//! joined with the date and placed in the file name. A marker that ends up in
//! the middle of the name (time first, or placed at the beginning) is still
//! re-cased, and an `am`/`pm` ending the original name is left alone.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Character placed between the parts of a date, a time, or both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Separator {
    #[default]
    Together,
    WhiteSpaced,
    Underscored,
    Dotted,
    Dashed,
}

impl Separator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Together => "",
            Self::WhiteSpaced => " ",
            Self::Underscored => "_",
            Self::Dotted => ".",
            Self::Dashed => "-",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    #[default]
    Ymd,
    Mdy,
    Dmy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearDigits {
    #[default]
    Full,
    Short,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Clock {
    #[default]
    H24,
    H12,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFormat {
    Unused,
    Pattern {
        order: DateOrder,
        year: YearDigits,
        separator: Separator,
    },
}

impl Default for DateFormat {
    fn default() -> Self {
        Self::Pattern {
            order: DateOrder::Ymd,
            year: YearDigits::Full,
            separator: Separator::Together,
        }
    }
}

impl DateFormat {
    /// strftime pattern, `None` when the date is not used.
    pub fn pattern(&self) -> Option<String> {
        let Self::Pattern {
            order,
            year,
            separator,
        } = *self
        else {
            return None;
        };

        let year = match year {
            YearDigits::Full => "%Y",
            YearDigits::Short => "%y",
        };
        let parts = match order {
            DateOrder::Ymd => [year, "%m", "%d"],
            DateOrder::Mdy => ["%m", "%d", year],
            DateOrder::Dmy => ["%d", "%m", year],
        };
        Some(parts.join(separator.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFormat {
    Unused,
    Pattern {
        clock: Clock,
        seconds: bool,
        separator: Separator,
    },
}

impl Default for TimeFormat {
    fn default() -> Self {
        Self::Pattern {
            clock: Clock::H24,
            seconds: true,
            separator: Separator::Together,
        }
    }
}

impl TimeFormat {
    /// strftime pattern, `None` when the time is not used. 12-hour patterns
    /// end with the AM/PM marker.
    pub fn pattern(&self) -> Option<String> {
        let Self::Pattern {
            clock,
            seconds,
            separator,
        } = *self
        else {
            return None;
        };

        let mut parts = vec![match clock {
            Clock::H24 => "%H",
            Clock::H12 => "%I",
        }];
        parts.push("%M");
        if seconds {
            parts.push("%S");
        }
        if clock == Clock::H12 {
            parts.push("%p");
        }
        Some(parts.join(separator.as_str()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombineOrder {
    #[default]
    DateFirst,
    TimeFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombineFormat {
    Joined {
        order: CombineOrder,
        separator: Separator,
    },
    /// Whole seconds since the Unix epoch.
    EpochSeconds,
}

impl Default for CombineFormat {
    fn default() -> Self {
        Self::Joined {
            order: CombineOrder::DateFirst,
            separator: Separator::Underscored,
        }
    }
}

/// Renders `moment` with the given formats.
///
/// When only one of the date or time is used it is returned on its own and
/// `combine` is ignored. Returns `None` when neither is used.
pub(crate) fn format_moment<Tz>(
    moment: &DateTime<Tz>,
    date: DateFormat,
    time: TimeFormat,
    combine: CombineFormat,
    uppercase_am_pm: bool,
) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let date = date.pattern().map(|p| moment.format(&p).to_string());
    let time = time
        .pattern()
        .map(|p| fix_am_pm(&moment.format(&p).to_string(), uppercase_am_pm));

    match (date, time) {
        (None, None) => None,
        (Some(date), None) => Some(date),
        (None, Some(time)) => Some(time),
        (Some(date), Some(time)) => Some(match combine {
            CombineFormat::Joined { order, separator } => match order {
                CombineOrder::DateFirst => format!("{date}{}{time}", separator.as_str()),
                CombineOrder::TimeFirst => format!("{time}{}{date}", separator.as_str()),
            },
            CombineFormat::EpochSeconds => moment.timestamp().to_string(),
        }),
    }
}

/// Re-cases a trailing AM/PM marker. Only the last two characters are touched.
fn fix_am_pm(value: &str, uppercase: bool) -> String {
    let Some(split) = value.len().checked_sub(2) else {
        return value.to_string();
    };
    if !value.is_char_boundary(split) {
        return value.to_string();
    }

    let (head, tail) = value.split_at(split);
    if tail.eq_ignore_ascii_case("am") || tail.eq_ignore_ascii_case("pm") {
        let tail = if uppercase {
            tail.to_ascii_uppercase()
        } else {
            tail.to_ascii_lowercase()
        };
        format!("{head}{tail}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        fix_am_pm, format_moment, Clock, CombineFormat, CombineOrder, DateFormat, DateOrder,
        Separator, TimeFormat, YearDigits,
    };
    use chrono::{NaiveDate, TimeZone, Utc};

    fn date(order: DateOrder, year: YearDigits, separator: Separator) -> DateFormat {
        DateFormat::Pattern {
            order,
            year,
            separator,
        }
    }

    fn time(clock: Clock, seconds: bool, separator: Separator) -> TimeFormat {
        TimeFormat::Pattern {
            clock,
            seconds,
            separator,
        }
    }

    #[test]
    fn date_patterns_follow_order_year_and_separator() {
        assert_eq!(
            date(DateOrder::Ymd, YearDigits::Full, Separator::Together).pattern(),
            Some("%Y%m%d".to_string())
        );
        assert_eq!(
            date(DateOrder::Mdy, YearDigits::Short, Separator::Dashed).pattern(),
            Some("%m-%d-%y".to_string())
        );
        assert_eq!(
            date(DateOrder::Dmy, YearDigits::Full, Separator::WhiteSpaced).pattern(),
            Some("%d %m %Y".to_string())
        );
        assert_eq!(DateFormat::Unused.pattern(), None);
    }

    #[test]
    fn time_patterns_follow_clock_seconds_and_separator() {
        assert_eq!(
            time(Clock::H24, true, Separator::Underscored).pattern(),
            Some("%H_%M_%S".to_string())
        );
        assert_eq!(
            time(Clock::H12, false, Separator::Dotted).pattern(),
            Some("%I.%M.%p".to_string())
        );
        assert_eq!(
            time(Clock::H12, true, Separator::Together).pattern(),
            Some("%I%M%S%p".to_string())
        );
        assert_eq!(TimeFormat::Unused.pattern(), None);
    }

    #[test]
    fn combines_date_and_time_in_either_order() {
        let moment = Utc
            .with_ymd_and_hms(2015, 5, 1, 22, 3, 1)
            .single()
            .expect("valid moment");
        let forward = format_moment(
            &moment,
            DateFormat::default(),
            TimeFormat::default(),
            CombineFormat::default(),
            true,
        );
        let reverse = format_moment(
            &moment,
            date(DateOrder::Dmy, YearDigits::Short, Separator::Dotted),
            time(Clock::H24, false, Separator::Dashed),
            CombineFormat::Joined {
                order: CombineOrder::TimeFirst,
                separator: Separator::WhiteSpaced,
            },
            true,
        );
        assert_eq!(forward.as_deref(), Some("20150501_220301"));
        assert_eq!(reverse.as_deref(), Some("22-03 01.05.15"));
    }

    #[test]
    fn single_part_is_used_standalone() {
        let moment = Utc
            .with_ymd_and_hms(2015, 5, 1, 22, 3, 1)
            .single()
            .expect("valid moment");
        let only_time = format_moment(
            &moment,
            DateFormat::Unused,
            time(Clock::H12, false, Separator::Underscored),
            CombineFormat::EpochSeconds,
            false,
        );
        let only_date = format_moment(
            &moment,
            DateFormat::default(),
            TimeFormat::Unused,
            CombineFormat::EpochSeconds,
            false,
        );
        assert_eq!(only_time.as_deref(), Some("10_03_pm"));
        assert_eq!(only_date.as_deref(), Some("20150501"));
        assert_eq!(
            format_moment(
                &moment,
                DateFormat::Unused,
                TimeFormat::Unused,
                CombineFormat::default(),
                true
            ),
            None
        );
    }

    #[test]
    fn am_pm_is_recased_when_time_comes_first() {
        let moment = Utc
            .with_ymd_and_hms(2015, 5, 1, 22, 3, 1)
            .single()
            .expect("valid moment");
        let value = format_moment(
            &moment,
            DateFormat::default(),
            time(Clock::H12, false, Separator::Together),
            CombineFormat::Joined {
                order: CombineOrder::TimeFirst,
                separator: Separator::Underscored,
            },
            false,
        );
        assert_eq!(value.as_deref(), Some("1003pm_20150501"));
    }

    #[test]
    fn epoch_seconds_are_whole_seconds() {
        let moment = NaiveDate::from_ymd_opt(2001, 9, 9)
            .and_then(|d| d.and_hms_milli_opt(1, 46, 40, 500))
            .map(|naive| Utc.from_utc_datetime(&naive))
            .expect("valid moment");
        let value = format_moment(
            &moment,
            DateFormat::default(),
            TimeFormat::default(),
            CombineFormat::EpochSeconds,
            true,
        );
        assert_eq!(value.as_deref(), Some("1000000000"));
    }

    #[test]
    fn am_pm_fix_up_touches_only_the_suffix() {
        assert_eq!(fix_am_pm("1003PM", false), "1003pm");
        assert_eq!(fix_am_pm("10 03 am", true), "10 03 AM");
        assert_eq!(fix_am_pm("pm_1003", true), "pm_1003");
        assert_eq!(fix_am_pm("m", true), "m");
        assert_eq!(fix_am_pm("午後", true), "午後");
    }
}
