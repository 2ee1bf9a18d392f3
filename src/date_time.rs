//! Calendar date processing shared by the Julian, Gregorian and Quadcent
//! calendars.

use crate::errors::{DecodeError, Field};

const DAYS_IN_MONTH: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
const DAYS_IN_MONTH_LEAP: [u8; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
const DOY_AT_MONTH: [u32; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];
const DOY_AT_MONTH_LEAP: [u32; 12] = [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335];

/// A calendar date with a time of day.
///
/// The same structure serves the Julian, Gregorian and Quadcent calendars;
/// which one it belongs to is decided by the codec that produced it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalendarDate {
    /// The year, from 0.
    pub year: u64,
    /// The month, from 1 to 12.
    pub month: u8,
    /// The day of the month, from 1.
    pub day: u8,
    /// The hour, from 0 to 23.
    pub hour: u8,
    /// The minute, from 0 to 59.
    pub minute: u8,
    /// The second, from 0 to 59.
    pub second: u8,
}

impl CalendarDate {
    /// Parses `YYYY<sep>MM<sep>DD[Thh:mm[:ss]]`.
    ///
    /// Each field may have any number of digits. The date part must be
    /// present for the text to match; once it matches, a malformed time of
    /// day or an out-of-range field is an error rather than a mismatch. The
    /// number of days in the month is not checked here since it depends on
    /// the calendar.
    pub(crate) fn parse(text: &str, sep: char) -> Result<Self, DecodeError> {
        let (year, rest) = pull_digits(text).ok_or(DecodeError::Unmatched)?;
        let rest = rest.strip_prefix(sep).ok_or(DecodeError::Unmatched)?;
        let (month, rest) = pull_digits(rest).ok_or(DecodeError::Unmatched)?;
        let rest = rest.strip_prefix(sep).ok_or(DecodeError::Unmatched)?;
        let (day, rest) = pull_digits(rest).ok_or(DecodeError::Unmatched)?;

        let time = if rest.is_empty() {
            None
        } else {
            Some(parse_time_of_day(rest).ok_or(DecodeError::OutOfRange(Field::TimeOfDay))?)
        };

        let month = parse_field(month, 1, 12, Field::Month)?;
        let day = parse_field(day, 1, 31, Field::Day)?;
        let (hour, minute, second) = match time {
            None => (0, 0, 0),
            Some((hour, minute, second)) => (
                parse_field(hour, 0, 23, Field::Hour)?,
                parse_field(minute, 0, 59, Field::Minute)?,
                second.map_or(Ok(0), |s| parse_field(s, 0, 59, Field::Second))?,
            ),
        };
        let year = year
            .parse()
            .map_err(|_| DecodeError::OutOfRange(Field::Date))?;

        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    /// Creates a date from a year, a 0-based day of the year counted with the
    /// provided leap-year rule, and a second of the day.
    ///
    /// The day count may run past the end of the year, in which case the
    /// months are walked forward into the following years. This lets callers
    /// start from an underestimated year without scanning year by year.
    pub(crate) fn from_day_count(
        mut year: u64,
        mut days: u64,
        second_of_day: u32,
        is_leap: impl Fn(u64) -> bool,
    ) -> Self {
        let mut month_idx = 0;
        loop {
            let month_len = u64::from(days_in_month(is_leap(year), month_idx as u8 + 1));
            if days < month_len {
                break;
            }
            days -= month_len;
            month_idx += 1;
            if month_idx == 12 {
                month_idx = 0;
                year += 1;
            }
        }

        Self {
            year,
            month: month_idx as u8 + 1,
            day: days as u8 + 1,
            hour: (second_of_day / 3600) as u8,
            minute: (second_of_day % 3600 / 60) as u8,
            second: (second_of_day % 60) as u8,
        }
    }

    /// Checks that the hour, minute and second are within range.
    pub(crate) fn check_time_of_day(&self) -> Result<(), DecodeError> {
        if self.hour > 23 {
            return Err(DecodeError::OutOfRange(Field::Hour));
        }
        if self.minute > 59 {
            return Err(DecodeError::OutOfRange(Field::Minute));
        }
        if self.second > 59 {
            return Err(DecodeError::OutOfRange(Field::Second));
        }

        Ok(())
    }

    /// Returns the number of seconds elapsed since midnight.
    pub(crate) fn second_of_day(&self) -> u32 {
        u32::from(self.hour) * 3600 + u32::from(self.minute) * 60 + u32::from(self.second)
    }

    /// Formats the date as `YYYY<sep>MM<sep>DDThh:mm:ss`, with the year
    /// zero-padded to at least 4 digits.
    pub(crate) fn format(&self, sep: char) -> String {
        format!(
            "{:04}{sep}{:02}{sep}{:02}T{:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Splits a non-empty run of leading ASCII digits from the rest of the text.
pub(crate) fn pull_digits(text: &str) -> Option<(&str, &str)> {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    if end == 0 {
        return None;
    }

    Some(text.split_at(end))
}

/// Splits `Thh:mm[:ss]` (or with a lowercase `t`) into its digit runs.
fn parse_time_of_day(text: &str) -> Option<(&str, &str, Option<&str>)> {
    let rest = text.strip_prefix(|c: char| c == 'T' || c == 't')?;
    let (hour, rest) = pull_digits(rest)?;
    let (minute, rest) = pull_digits(rest.strip_prefix(':')?)?;
    if rest.is_empty() {
        return Some((hour, minute, None));
    }
    let (second, rest) = pull_digits(rest.strip_prefix(':')?)?;

    rest.is_empty().then_some((hour, minute, Some(second)))
}

/// Parses a run of digits and checks it against an inclusive range.
fn parse_field(digits: &str, min: u8, max: u8, field: Field) -> Result<u8, DecodeError> {
    digits
        .parse::<u64>()
        .ok()
        .filter(|value| (u64::from(min)..=u64::from(max)).contains(value))
        .map(|value| value as u8)
        .ok_or(DecodeError::OutOfRange(field))
}

/// Calculates the number of days in a month.
pub(crate) const fn days_in_month(leap: bool, month: u8) -> u8 {
    let month_idx = (month - 1) as usize;

    if leap {
        DAYS_IN_MONTH_LEAP[month_idx]
    } else {
        DAYS_IN_MONTH[month_idx]
    }
}

/// Calculates the 0-based day of the year.
pub(crate) const fn day_of_year(leap: bool, month: u8, day: u8) -> u32 {
    let month_idx = (month - 1) as usize;
    let table = if leap {
        &DOY_AT_MONTH_LEAP
    } else {
        &DOY_AT_MONTH
    };

    (day - 1) as u32 + table[month_idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: u64, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> CalendarDate {
        CalendarDate {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    #[test]
    fn parse_date_only() {
        assert_eq!(
            CalendarDate::parse("2023-06-15", '-'),
            Ok(date(2023, 6, 15, 0, 0, 0))
        );
        assert_eq!(
            CalendarDate::parse("7=1=2", '='),
            Ok(date(7, 1, 2, 0, 0, 0))
        );
    }

    #[test]
    fn parse_with_time() {
        assert_eq!(
            CalendarDate::parse("2023-06-15T12:30", '-'),
            Ok(date(2023, 6, 15, 12, 30, 0))
        );
        assert_eq!(
            CalendarDate::parse("2023*06*15t12:30:45", '*'),
            Ok(date(2023, 6, 15, 12, 30, 45))
        );
    }

    #[test]
    fn parse_unmatched() {
        for text in ["", "garbage", "2023", "2023-06", "2023-06-", "-2023-06-15", "2023=06-15"] {
            assert_eq!(CalendarDate::parse(text, '-'), Err(DecodeError::Unmatched), "{text}");
        }
    }

    #[test]
    fn parse_malformed_time() {
        for text in ["2023-01-01x", "2023-01-01T1", "2023-01-01T1:", "2023-01-01T1:2:", "2023-01-01T1:2:3x"] {
            assert_eq!(
                CalendarDate::parse(text, '-'),
                Err(DecodeError::OutOfRange(Field::TimeOfDay)),
                "{text}"
            );
        }
    }

    #[test]
    fn parse_out_of_range() {
        let cases = [
            ("2023-13-01", Field::Month),
            ("2023-00-01", Field::Month),
            ("2023-01-32", Field::Day),
            ("2023-01-00", Field::Day),
            ("2023-01-01T24:00", Field::Hour),
            ("2023-01-01T23:60", Field::Minute),
            ("2023-01-01T23:59:60", Field::Second),
            ("99999999999999999999-01-01", Field::Date),
            ("99999999999999999999-13-01", Field::Month),
        ];
        for (text, field) in cases {
            assert_eq!(
                CalendarDate::parse(text, '-'),
                Err(DecodeError::OutOfRange(field)),
                "{text}"
            );
        }
    }

    #[test]
    fn day_count_walks_into_next_year() {
        let never_leap = |_| false;

        assert_eq!(
            CalendarDate::from_day_count(1999, 0, 0, never_leap),
            date(1999, 1, 1, 0, 0, 0)
        );
        assert_eq!(
            CalendarDate::from_day_count(1999, 364, 86399, never_leap),
            date(1999, 12, 31, 23, 59, 59)
        );
        assert_eq!(
            CalendarDate::from_day_count(1999, 365 + 59, 3661, never_leap),
            date(2000, 3, 1, 1, 1, 1)
        );
        assert_eq!(
            CalendarDate::from_day_count(1999, 365 + 59, 0, |y| y % 4 == 0),
            date(2000, 2, 29, 0, 0, 0)
        );
    }

    #[test]
    fn time_of_day_range() {
        assert_eq!(date(2023, 6, 15, 23, 59, 59).check_time_of_day(), Ok(()));
        assert_eq!(
            date(2023, 6, 15, 99, 99, 99).check_time_of_day(),
            Err(DecodeError::OutOfRange(Field::Hour))
        );
        assert_eq!(
            date(2023, 6, 15, 0, 60, 0).check_time_of_day(),
            Err(DecodeError::OutOfRange(Field::Minute))
        );
        assert_eq!(
            date(2023, 6, 15, 0, 0, 60).check_time_of_day(),
            Err(DecodeError::OutOfRange(Field::Second))
        );
    }

    #[test]
    fn format_pads_fields() {
        assert_eq!(date(7, 1, 2, 3, 4, 5).format('='), "0007=01=02T03:04:05");
        assert_eq!(date(12345, 12, 31, 23, 59, 59).format('*'), "12345*12*31T23:59:59");
    }

    #[test]
    fn day_of_year_tables() {
        assert_eq!(day_of_year(false, 3, 1), 59);
        assert_eq!(day_of_year(true, 3, 1), 60);
        assert_eq!(day_of_year(true, 12, 31), 365);
        assert_eq!(days_in_month(true, 2), 29);
        assert_eq!(days_in_month(false, 2), 28);
    }
}
