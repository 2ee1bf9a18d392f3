//! The Quadcent calendar.
//!
//! Quadcent dates are written `YYYY*MM*DD[Thh:mm[:ss]]`. Every Quadcent year
//! lasts exactly one four-hundredth of a Gregorian 400-year cycle, that is
//! 365.2425 days, and the calendar coincides with the Gregorian calendar at
//! the start of 0323, 0723, 1123 and so on. Each year is nevertheless
//! displayed with the ordinary 365-day month table: the real time elapsed in
//! the year is rescaled by 146000/146097 into a nominal year of 365 days of
//! 86400 nominal seconds.

use crate::date_time::{day_of_year, days_in_month, CalendarDate};
use crate::errors::{DecodeError, Field, DATE_OUT_OF_RANGE};
use crate::{IntermediateTime, DAYS_PER_QUADCENT, SECS_PER_DAY};

/// The separator between the year, month and day fields.
pub const SEPARATOR: char = '*';

/// The length of a Quadcent year in seconds, 146097 × 86400 / 400.
pub const YEAR_SECS: u64 = 31_556_952;

/// The length of a nominal 365-day year in seconds.
const NOMINAL_YEAR_SECS: u64 = 31_536_000;

/// `YEAR_SECS / NOMINAL_YEAR_SECS` reduced to lowest terms.
const REAL_PER_NOMINAL: (u64, u64) = (146_097, 146_000);

/// The year of the Quadcent epoch.
const EPOCH_YEAR: u64 = 323;

const QUADCENT_SECS: u64 = DAYS_PER_QUADCENT * SECS_PER_DAY;

/// Parses a Quadcent date.
///
/// # Examples
///
/// ```
/// use stardate::{quadcent, IntermediateTime};
///
/// assert_eq!(
///     quadcent::decode("0323*01*01"),
///     Ok(IntermediateTime::QUADCENT_EPOCH)
/// );
/// ```
pub fn decode(text: &str) -> Result<IntermediateTime, DecodeError> {
    let date = CalendarDate::parse(text, SEPARATOR)?;

    to_time(&date)
}

/// Converts a Quadcent date to a timestamp.
///
/// The fraction of a second is rounded up so that [`to_date`] gives back the
/// same date.
pub fn to_time(date: &CalendarDate) -> Result<IntermediateTime, DecodeError> {
    if !(1..=12).contains(&date.month) {
        return Err(DecodeError::OutOfRange(Field::Month));
    }
    if date.day == 0 || date.day > days_in_month(false, date.month) {
        return Err(DecodeError::OutOfRange(Field::Day));
    }
    date.check_time_of_day()?;

    // Years before the epoch are shifted one 400-year cycle up.
    let (years, shifted) = if date.year < EPOCH_YEAR {
        (date.year + 400 - EPOCH_YEAR, true)
    } else {
        (date.year - EPOCH_YEAR, false)
    };
    let year_start = years
        .checked_mul(YEAR_SECS)
        .and_then(|secs| secs.checked_add(IntermediateTime::QUADCENT_EPOCH.as_secs()))
        .ok_or(DATE_OUT_OF_RANGE)?;

    let nominal_secs = u64::from(day_of_year(false, date.month, date.day)) * SECS_PER_DAY
        + u64::from(date.second_of_day());
    let (num, den) = REAL_PER_NOMINAL;
    let scaled = nominal_secs * num;
    let frac = (((scaled % den) << 32) + den - 1) / den;

    let mut secs = year_start
        .checked_add(scaled / den)
        .ok_or(DATE_OUT_OF_RANGE)?;
    if shifted {
        secs = secs.checked_sub(QUADCENT_SECS).ok_or(DATE_OUT_OF_RANGE)?;
    }

    Ok(IntermediateTime::new(secs, frac as u32))
}

/// Converts a timestamp to a Quadcent date, discarding the fraction of a
/// nominal second.
pub fn to_date(time: IntermediateTime) -> CalendarDate {
    let epoch = IntermediateTime::QUADCENT_EPOCH.as_secs();
    let (secs, shifted) = if time.as_secs() < epoch {
        (time.as_secs() + QUADCENT_SECS - epoch, true)
    } else {
        (time.as_secs() - epoch, false)
    };
    let years = secs / YEAR_SECS;
    let year = if shifted {
        years - (400 - EPOCH_YEAR)
    } else {
        years + EPOCH_YEAR
    };

    // Rescale the real seconds in the year, with their 32-bit fraction, to
    // nominal seconds.
    let real = (u128::from(secs % YEAR_SECS) << 32) | u128::from(time.subsec_fraction());
    let (den, num) = REAL_PER_NOMINAL;
    let nominal_secs = (((real * u128::from(num)) >> 32) / u128::from(den)) as u64;

    CalendarDate::from_day_count(
        year,
        nominal_secs / SECS_PER_DAY,
        (nominal_secs % SECS_PER_DAY) as u32,
        |_| false,
    )
}

/// Formats a timestamp as a Quadcent date.
///
/// # Examples
///
/// ```
/// use stardate::{quadcent, IntermediateTime};
///
/// assert_eq!(
///     quadcent::encode(IntermediateTime::UNIX_EPOCH),
///     "1970*01*01T14:27:01"
/// );
/// ```
pub fn encode(time: IntermediateTime) -> String {
    to_date(time).format(SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Calendar;

    #[test]
    fn constants() {
        assert_eq!(YEAR_SECS * 400, QUADCENT_SECS);
        assert_eq!(
            NOMINAL_YEAR_SECS * REAL_PER_NOMINAL.0,
            YEAR_SECS * REAL_PER_NOMINAL.1
        );
    }

    #[test]
    fn coincides_with_gregorian_at_cycle_start() {
        for year in ["0323", "0723", "1123", "2323", "2723"] {
            assert_eq!(
                decode(&format!("{year}*01*01")),
                Calendar::Gregorian.decode(&format!("{year}-01-01")),
                "{year}"
            );
        }
    }

    #[test]
    fn known_dates() {
        let t = Calendar::Gregorian.decode("1999-12-31T16:08:24").unwrap();
        assert_eq!(encode(t), "2000*01*01T00:00:00");

        let t = decode("2023*06*15T12:30:45").unwrap();
        assert_eq!(Calendar::Gregorian.encode(t), "2023-06-14T21:09:06");

        let t = decode("0001*01*01").unwrap();
        assert_eq!(t.as_secs(), 79_056);
    }

    #[test]
    fn round_trip_across_cycles() {
        let texts = [
            "0000*12*31T23:59:59",
            "0001*01*01T00:00:00",
            "0077*06*01T00:00:00",
            "0322*12*31T23:59:59",
            "0323*01*01T00:00:00",
            "0400*02*28T12:00:00",
            "0722*12*31T23:59:59",
            "0723*01*01T00:00:00",
            "1122*06*15T12:00:00",
            "2023*06*15T12:30:45",
            "2399*12*31T23:59:59",
            "2400*01*01T00:00:00",
            "9999*12*31T23:59:59",
        ];
        for text in texts {
            assert_eq!(encode(decode(text).unwrap()), text);
        }
    }

    #[test]
    fn every_second_of_a_cycle_boundary_day_round_trips() {
        for second in 0..SECS_PER_DAY as u32 {
            let date = CalendarDate {
                year: 722,
                month: 12,
                day: 31,
                hour: (second / 3600) as u8,
                minute: (second % 3600 / 60) as u8,
                second: (second % 60) as u8,
            };
            assert_eq!(to_date(to_time(&date).unwrap()), date);
        }
    }

    #[test]
    fn no_leap_day() {
        assert_eq!(decode("2000*02*29"), Err(DecodeError::OutOfRange(Field::Day)));
        assert_eq!(decode("2023*13*01"), Err(DecodeError::OutOfRange(Field::Month)));
    }

    #[test]
    fn time_of_day_is_checked() {
        let date = CalendarDate {
            year: 2023,
            month: 6,
            day: 15,
            hour: 12,
            minute: 99,
            second: 0,
        };
        assert_eq!(to_time(&date), Err(DecodeError::OutOfRange(Field::Minute)));
    }

    #[test]
    fn before_epoch() {
        assert_eq!(decode("0000*01*01"), Err(DecodeError::OutOfRange(Field::Date)));
    }

    #[test]
    fn wrong_separator_is_unmatched() {
        assert_eq!(decode("2023-06-15"), Err(DecodeError::Unmatched));
    }
}
