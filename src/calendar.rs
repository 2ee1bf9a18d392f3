//! The proleptic Julian and Gregorian calendars.
//!
//! Julian dates are written `YYYY=MM=DD[Thh:mm[:ss]]` and Gregorian dates
//! `YYYY-MM-DD[Thh:mm[:ss]]`. Years start at 0 and have no upper bound other
//! than the range of [`IntermediateTime`].
//!
//! The internal epoch is 0001=01=01 in the Julian calendar, which is
//! 0000-12-30 in the Gregorian calendar. Gregorian year 0 is computed as year
//! 400 minus one 400-year cycle so that the closed-form day count never goes
//! negative.

use crate::date_time::{day_of_year, days_in_month, CalendarDate};
use crate::errors::{DecodeError, Field, DATE_OUT_OF_RANGE};
use crate::{IntermediateTime, DAYS_PER_QUADCENT, SECS_PER_DAY};

/// A calendar with a leap-year rule, either Julian or Gregorian.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Calendar {
    /// Every fourth year is a leap year.
    Julian,
    /// Every fourth year is a leap year, except centuries not divisible by
    /// 400.
    Gregorian,
}

impl Calendar {
    /// Returns the separator between the year, month and day fields.
    pub const fn separator(self) -> char {
        match self {
            Self::Julian => '=',
            Self::Gregorian => '-',
        }
    }

    /// Returns whether the year is a leap year.
    ///
    /// # Examples
    ///
    /// ```
    /// use stardate::calendar::Calendar;
    ///
    /// assert!(Calendar::Julian.is_leap_year(1900));
    /// assert!(!Calendar::Gregorian.is_leap_year(1900));
    /// assert!(Calendar::Gregorian.is_leap_year(2000));
    /// ```
    pub const fn is_leap_year(self, year: u64) -> bool {
        match self {
            Self::Julian => year % 4 == 0,
            Self::Gregorian => year % 4 == 0 && (year % 100 != 0 || year % 400 == 0),
        }
    }

    /// Number of days between the start of this calendar's year 1 and the
    /// internal epoch.
    const fn epoch_offset_days(self) -> u64 {
        match self {
            Self::Julian => 0,
            Self::Gregorian => 2,
        }
    }

    /// Parses a date in this calendar.
    ///
    /// # Examples
    ///
    /// ```
    /// use stardate::calendar::Calendar;
    /// use stardate::{DecodeError, Field, IntermediateTime};
    ///
    /// assert_eq!(
    ///     Calendar::Gregorian.decode("1970-01-01"),
    ///     Ok(IntermediateTime::UNIX_EPOCH)
    /// );
    /// assert_eq!(
    ///     Calendar::Gregorian.decode("1900-02-29"),
    ///     Err(DecodeError::OutOfRange(Field::Day))
    /// );
    /// assert_eq!(
    ///     Calendar::Julian.decode("1970-01-01"),
    ///     Err(DecodeError::Unmatched)
    /// );
    /// ```
    pub fn decode(self, text: &str) -> Result<IntermediateTime, DecodeError> {
        let date = CalendarDate::parse(text, self.separator())?;

        self.to_time(&date)
    }

    /// Converts a date in this calendar to a timestamp.
    ///
    /// Returns an error if the day does not exist in this month of this
    /// year, if the time of day is out of range, or if the date lies before
    /// the internal epoch or beyond the representable range.
    pub fn to_time(self, date: &CalendarDate) -> Result<IntermediateTime, DecodeError> {
        if !(1..=12).contains(&date.month) {
            return Err(DecodeError::OutOfRange(Field::Month));
        }
        let leap = self.is_leap_year(date.year);
        if date.day == 0 || date.day > days_in_month(leap, date.month) {
            return Err(DecodeError::OutOfRange(Field::Day));
        }
        date.check_time_of_day()?;

        // Count the elapsed years from year 1, borrowing a 400-year cycle
        // for Gregorian year 0.
        let (elapsed_years, borrowed_cycle) = match (self, date.year) {
            (Self::Gregorian, 0) => (399, true),
            (_, year) => (year.checked_sub(1).ok_or(DATE_OUT_OF_RANGE)?, false),
        };

        let mut days = elapsed_years
            .checked_mul(365)
            .and_then(|days| days.checked_add(elapsed_years / 4))
            .ok_or(DATE_OUT_OF_RANGE)?;
        if self == Self::Gregorian {
            days = days - elapsed_years / 100 + elapsed_years / 400;
        }
        days = days
            .checked_add(
                self.epoch_offset_days() + u64::from(day_of_year(leap, date.month, date.day)),
            )
            .ok_or(DATE_OUT_OF_RANGE)?;
        if borrowed_cycle {
            days = days.checked_sub(DAYS_PER_QUADCENT).ok_or(DATE_OUT_OF_RANGE)?;
        }

        let secs = days
            .checked_mul(SECS_PER_DAY)
            .and_then(|secs| secs.checked_add(u64::from(date.second_of_day())))
            .ok_or(DATE_OUT_OF_RANGE)?;

        Ok(IntermediateTime::new(secs, 0))
    }

    /// Converts a timestamp to a date in this calendar, discarding the
    /// fraction of a second.
    ///
    /// # Examples
    ///
    /// ```
    /// use stardate::calendar::Calendar;
    /// use stardate::{CalendarDate, IntermediateTime};
    ///
    /// assert_eq!(
    ///     Calendar::Julian.to_date(IntermediateTime::UNIX_EPOCH),
    ///     CalendarDate { year: 1969, month: 12, day: 19, hour: 0, minute: 0, second: 0 }
    /// );
    /// ```
    pub fn to_date(self, time: IntermediateTime) -> CalendarDate {
        let second_of_day = (time.as_secs() % SECS_PER_DAY) as u32;
        let mut days = time.as_secs() / SECS_PER_DAY;

        // The leap-year cycle must be counted from the first day of a year
        // numbered xx01. This is already the case for the Julian calendar,
        // but the Gregorian day 0 is 0000-12-30 so we move forward to the
        // equivalent day in year 400 and fix the year number at the end.
        if self == Self::Gregorian {
            days += DAYS_PER_QUADCENT - 2;
        }

        // Underestimate the year. `days / 366` drifts by a day for each
        // non-leap year; in the Julian calendar it loses a full year every
        // 488 years, which the second term compensates. In the Gregorian
        // calendar, whole 400-year cycles are counted exactly instead.
        let elapsed_years = match self {
            Self::Julian => days / 366 + days / (366 * 487),
            Self::Gregorian => {
                (days / DAYS_PER_QUADCENT) * 400 + (days % DAYS_PER_QUADCENT) / 366
            }
        };

        // The estimate is never more than two years short, so the remaining
        // day count is walked month by month.
        if self == Self::Gregorian {
            days = days + elapsed_years / 100 - elapsed_years / 400;
        }
        days -= elapsed_years * 365 + elapsed_years / 4;

        let year = match self {
            Self::Julian => elapsed_years + 1,
            Self::Gregorian => elapsed_years - 399,
        };

        CalendarDate::from_day_count(year, days, second_of_day, |y| self.is_leap_year(y))
    }

    /// Formats a timestamp as a date in this calendar.
    ///
    /// # Examples
    ///
    /// ```
    /// use stardate::calendar::Calendar;
    /// use stardate::IntermediateTime;
    ///
    /// assert_eq!(
    ///     Calendar::Gregorian.encode(IntermediateTime::UNIX_EPOCH),
    ///     "1970-01-01T00:00:00"
    /// );
    /// ```
    pub fn encode(self, time: IntermediateTime) -> String {
        self.to_date(time).format(self.separator())
    }
}
