//! Stardates.
//!
//! A stardate is written `[issue]integer.fraction`, for instance
//! `[19]7340.25`, `[-30]0458.96` or `[41]12345.678`. The fraction has at most
//! six significant digits. Four rates have been in use:
//!
//! | Range | Rate |
//! |---|---|
//! | `[-∞]` to `[19]7340` | 5 units per day, 10000 units per issue |
//! | `[19]7340` to `[19]7840` | 1 unit per 10 days |
//! | `[19]7840` to `[20]5006` | 1 unit per 2 days |
//! | `[21]00000` onwards | 100000 units per issue of 146097/4 days |
//!
//! Stardate `[0]0000` falls on 2162-01-04 and `[21]00000` on 2323-01-01.
//! Negative issues count backwards from `[0]0000` at the original rate: the
//! last stardate before `[0]0000` is `[-1]9999.999999`.

use core::fmt;

use crate::date_time::pull_digits;
use crate::errors::{DecodeError, Field, DATE_OUT_OF_RANGE};
use crate::{IntermediateTime, DAYS_PER_QUADCENT, SECS_PER_DAY};

/// Length of an issue before TNG-style stardates.
const ISSUE_SECS: u64 = 2000 * SECS_PER_DAY;

/// Length of a unit at the original rate.
const UNIT_SECS: u64 = SECS_PER_DAY / 5;

/// Length of an issue of TNG-style stardates, a quarter of 400 Gregorian
/// years. This is just below 2^32.
const TNG_ISSUE_SECS: u64 = SECS_PER_DAY / 4 * DAYS_PER_QUADCENT;

/// `TNG_ISSUE_SECS / 100000` in lowest terms: one TNG unit lasts
/// 27 × 146097 / 125 seconds.
const TNG_UNIT_SECS: (u64, u64) = (27 * DAYS_PER_QUADCENT, 125);

/// Integer at which the 10 days/unit film rate starts in issue 19.
const FILM_START: u32 = 7340;

/// Integer at which the 2 days/unit film rate starts in issue 19.
const LATE_FILM_START: u32 = 7840;

/// `LATE_FILM_START` once the 10 days/unit span has been rescaled by 50 to
/// the original rate.
const LATE_FILM_START_RESCALED: u32 = FILM_START + (LATE_FILM_START - FILM_START) * 50;

/// Last issue in which the film rates are used.
const LAST_FILM_ISSUE: u64 = 20;

/// First issue of TNG-style stardates.
const FIRST_TNG_ISSUE: u64 = 21;

const MICROS: u32 = 1_000_000;

/// Number of fraction digits printed after a stardate.
///
/// Fraction digits are truncated, never rounded.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Precision(u8);

impl Precision {
    /// The maximum number of fraction digits.
    pub const MAX: Self = Self(6);

    /// Creates a precision, returning `None` if `digits` is more than 6.
    pub const fn new(digits: u8) -> Option<Self> {
        if digits <= Self::MAX.0 {
            Some(Self(digits))
        } else {
            None
        }
    }

    /// Returns the number of fraction digits.
    pub const fn digits(self) -> u8 {
        self.0
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self(2)
    }
}

/// The fields of a stardate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StardateValue {
    /// Whether the issue is negative, as in `[-30]0458.96`.
    pub negative: bool,
    /// The magnitude of the issue number.
    pub issue: u64,
    /// The integer part, below 10000 before TNG-style stardates and below
    /// 100000 afterwards.
    pub integer: u32,
    /// The fraction of a unit in millionths.
    pub fraction: u32,
}

impl StardateValue {
    /// Parses `[[-]issue]integer[.fraction]`.
    ///
    /// Fraction digits beyond the sixth are accepted and ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use stardate::stardate::StardateValue;
    ///
    /// assert_eq!(
    ///     StardateValue::parse("[-30]0458.96"),
    ///     Ok(StardateValue { negative: true, issue: 30, integer: 458, fraction: 960_000 })
    /// );
    /// ```
    pub fn parse(text: &str) -> Result<Self, DecodeError> {
        let rest = text.strip_prefix('[').ok_or(DecodeError::Unmatched)?;
        let (negative, rest) = match rest.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, rest),
        };
        let (issue, rest) = pull_digits(rest).ok_or(DecodeError::Unmatched)?;
        let rest = rest.strip_prefix(']').ok_or(DecodeError::Unmatched)?;
        let (integer, rest) = pull_digits(rest).ok_or(DecodeError::Unmatched)?;

        // An issue too large to parse is reported as an out-of-range
        // integer part, before the fraction is looked at.
        let (issue, integer) = issue
            .parse::<u64>()
            .ok()
            .zip(integer.parse::<u32>().ok())
            .filter(|&(issue, integer)| integer <= Self::integer_cap(negative, issue))
            .ok_or(DecodeError::OutOfRange(Field::Integer))?;

        let fraction = match rest.strip_prefix('.') {
            Some(digits) if digits.bytes().all(|b| b.is_ascii_digit()) => digits
                .bytes()
                .chain(core::iter::repeat(b'0'))
                .take(6)
                .fold(0, |acc, b| acc * 10 + u32::from(b - b'0')),
            None if rest.is_empty() => 0,
            _ => return Err(DecodeError::Unmatched),
        };

        Ok(Self {
            negative,
            issue,
            integer,
            fraction,
        })
    }

    /// Returns the largest integer part allowed in an issue.
    fn integer_cap(negative: bool, issue: u64) -> u32 {
        match (negative, issue) {
            (true, _) => 9999,
            (false, issue) if issue < LAST_FILM_ISSUE => 9999,
            // The film era ends at [20]5006, where TNG-style stardates take
            // over.
            (false, LAST_FILM_ISSUE) => 5005,
            (false, _) => 99999,
        }
    }

    /// Checks the integer part against the cap of its issue and the fraction
    /// against one unit.
    fn check_range(&self) -> Result<(), DecodeError> {
        if self.integer > Self::integer_cap(self.negative, self.issue) || self.fraction >= MICROS {
            return Err(DecodeError::OutOfRange(Field::Integer));
        }

        Ok(())
    }

    /// Returns whether this is a TNG-style stardate.
    pub const fn is_tng(&self) -> bool {
        !self.negative && self.issue >= FIRST_TNG_ISSUE
    }

    /// Converts the stardate to a timestamp.
    ///
    /// The fraction of a second is rounded up, so that
    /// [`from_time`](Self::from_time) gives back the same stardate.
    ///
    /// Fails with [`Field::Integer`] if the integer part exceeds the cap of
    /// its issue or the fraction is not below 1000000, and with
    /// [`Field::Date`] if the stardate is not representable.
    ///
    /// # Examples
    ///
    /// ```
    /// use stardate::stardate::StardateValue;
    /// use stardate::IntermediateTime;
    ///
    /// let value = StardateValue { negative: false, issue: 21, integer: 0, fraction: 0 };
    /// assert_eq!(value.to_time(), Ok(IntermediateTime::TNG_EPOCH));
    /// ```
    pub fn to_time(&self) -> Result<IntermediateTime, DecodeError> {
        self.check_range()?;

        if self.is_tng() {
            self.tng_to_time()
        } else {
            self.early_to_time()
        }
    }

    /// Converts a negative, original-rate or film-era stardate.
    fn early_to_time(&self) -> Result<IntermediateTime, DecodeError> {
        let epoch = IntermediateTime::STARDATE_EPOCH.as_secs();
        let mut issue = self.issue;
        let mut integer = self.integer;
        let mut fraction = self.fraction;

        let base = if self.negative {
            // Start one issue late so that the subtraction cannot underflow
            // before the units have been added, and take it back at the end.
            (epoch + ISSUE_SECS)
                .checked_sub(issue.checked_mul(ISSUE_SECS).ok_or(DATE_OUT_OF_RANGE)?)
                .ok_or(DATE_OUT_OF_RANGE)?
        } else {
            // Rescale film-era stardates to the original rate. Issue 20 is
            // treated as a continuation of issue 19.
            if issue == LAST_FILM_ISSUE {
                issue = 19;
                integer += 10_000;
            }
            if issue == 19 && integer >= FILM_START {
                // [19]7340 to [19]15006 becomes 7340 to 390640 ...
                integer = FILM_START + (integer - FILM_START) * 50 + fraction / (MICROS / 50);
                fraction = fraction * 50 % MICROS;
                // ... and the 2 days/unit part above 32340 is scaled back, so
                // the whole range ends at 104000.
                if integer >= LATE_FILM_START_RESCALED {
                    fraction = fraction / 5 + (integer % 5) * (MICROS / 5);
                    integer = LATE_FILM_START_RESCALED + (integer - LATE_FILM_START_RESCALED) / 5;
                }
            }
            epoch + issue * ISSUE_SECS
        };

        // A millionth of a unit is UNIT_SECS / 10^6 = 54 / 3125 seconds.
        let scaled = ((u64::from(fraction) << 32) * 54 + 3124) / 3125;
        let mut time = IntermediateTime::new(base, 0)
            .checked_add(UNIT_SECS * u64::from(integer) + (scaled >> 32), scaled as u32)
            .ok_or(DATE_OUT_OF_RANGE)?;
        if self.negative {
            time = time.checked_sub(ISSUE_SECS, 0).ok_or(DATE_OUT_OF_RANGE)?;
        }

        Ok(time)
    }

    /// Converts a TNG-style stardate.
    fn tng_to_time(&self) -> Result<IntermediateTime, DecodeError> {
        let issue_start = (self.issue - FIRST_TNG_ISSUE)
            .checked_mul(TNG_ISSUE_SECS)
            .and_then(|secs| secs.checked_add(IntermediateTime::TNG_EPOCH.as_secs()))
            .ok_or(DATE_OUT_OF_RANGE)?;

        // Millionths of a unit times the unit length in seconds.
        let (num, den) = TNG_UNIT_SECS;
        let den = den * u64::from(MICROS);
        let scaled = (u64::from(self.integer) * u64::from(MICROS) + u64::from(self.fraction)) * num;
        let frac = (((scaled % den) << 32) + den - 1) / den;

        IntermediateTime::new(issue_start, 0)
            .checked_add(scaled / den, frac as u32)
            .ok_or(DATE_OUT_OF_RANGE)
    }

    /// Converts a timestamp to a stardate, truncating to a millionth of a
    /// unit.
    ///
    /// The era is chosen from the timestamp alone: before 2162-01-04 the
    /// stardate is negative, from 2323-01-01 it is TNG-style.
    pub fn from_time(time: IntermediateTime) -> Self {
        let secs = time.as_secs();
        let frac = u64::from(time.subsec_fraction());

        if secs >= IntermediateTime::TNG_EPOCH.as_secs() {
            return Self::tng_from_time(time);
        }

        let epoch = IntermediateTime::STARDATE_EPOCH.as_secs();
        // `scaled` is the fraction of a unit in units of 2^-32 / 864000.
        let (negative, issue, integer, scaled) = if secs < epoch {
            let diff = epoch - secs - 1;
            let secs_in_issue = ISSUE_SECS - 1 - diff % ISSUE_SECS;
            (
                true,
                1 + diff / ISSUE_SECS,
                secs_in_issue / UNIT_SECS,
                ((secs_in_issue % UNIT_SECS) << 32 | frac) * 50,
            )
        } else {
            let diff = secs - epoch;
            let issue = diff / ISSUE_SECS;
            let secs_in_issue = diff % ISSUE_SECS;
            let film_start_secs = u64::from(FILM_START) * UNIT_SECS;

            if issue < 19 || (issue == 19 && secs_in_issue < film_start_secs) {
                (
                    false,
                    issue,
                    secs_in_issue / UNIT_SECS,
                    ((secs_in_issue % UNIT_SECS) << 32 | frac) * 50,
                )
            } else {
                let film_secs = secs_in_issue + (issue - 19) * ISSUE_SECS - film_start_secs;
                let early_film_secs = u64::from(LATE_FILM_START - FILM_START) * 10 * SECS_PER_DAY;

                if film_secs < early_film_secs {
                    let unit = 10 * SECS_PER_DAY;
                    (
                        false,
                        19,
                        u64::from(FILM_START) + film_secs / unit,
                        (film_secs % unit) << 32 | frac,
                    )
                } else {
                    let unit = 2 * SECS_PER_DAY;
                    let late_secs = film_secs - early_film_secs;
                    let integer = u64::from(LATE_FILM_START) + late_secs / unit;
                    let (issue, integer) = if integer >= 10_000 {
                        (LAST_FILM_ISSUE, integer - 10_000)
                    } else {
                        (19, integer)
                    };
                    (false, issue, integer, ((late_secs % unit) << 32 | frac) * 5)
                }
            }
        };

        // Convert to millionths: multiply by 10^6 / (2^32 × 864000), that is
        // by 125 / (2^32 × 108).
        let fraction = ((scaled * 125 / 108) >> 32) as u32;

        Self {
            negative,
            issue,
            integer: integer as u32,
            fraction,
        }
    }

    /// Converts a timestamp at or after the TNG epoch.
    fn tng_from_time(time: IntermediateTime) -> Self {
        let diff = time.as_secs() - IntermediateTime::TNG_EPOCH.as_secs();
        let secs_in_issue = diff % TNG_ISSUE_SECS;

        // Millionths of a unit: seconds with their 32-bit fraction, divided
        // by 27 × 146097 / (125 × 10^6).
        let (num, den) = TNG_UNIT_SECS;
        let secs = (u128::from(secs_in_issue) << 32) | u128::from(time.subsec_fraction());
        let micros = (((secs * u128::from(den * u64::from(MICROS))) >> 32) / u128::from(num)) as u64;

        Self {
            negative: false,
            issue: FIRST_TNG_ISSUE + diff / TNG_ISSUE_SECS,
            integer: (micros / u64::from(MICROS)) as u32,
            fraction: (micros % u64::from(MICROS)) as u32,
        }
    }

    /// Returns an object that formats the stardate with the provided number of
    /// fraction digits.
    ///
    /// # Examples
    ///
    /// ```
    /// use stardate::stardate::{Precision, StardateValue};
    ///
    /// let value = StardateValue { negative: false, issue: 19, integer: 7340, fraction: 123_456 };
    /// assert_eq!(value.display(Precision::new(0).unwrap()).to_string(), "[19]7340");
    /// assert_eq!(value.display(Precision::new(4).unwrap()).to_string(), "[19]7340.1234");
    /// ```
    pub fn display(&self, precision: Precision) -> impl fmt::Display + '_ {
        StardateDisplay {
            value: self,
            precision,
        }
    }
}

struct StardateDisplay<'a> {
    value: &'a StardateValue,
    precision: Precision,
}

impl fmt::Display for StardateDisplay<'_> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.value;
        let sign = if value.negative { "-" } else { "" };
        let width = if value.is_tng() { 5 } else { 4 };
        write!(
            fmt,
            "[{sign}{}]{:0width$}",
            value.issue,
            value.integer,
            width = width
        )?;

        let digits = usize::from(self.precision.digits());
        if digits > 0 {
            let fraction = format!("{:06}", value.fraction);
            write!(fmt, ".{}", &fraction[..digits])?;
        }

        Ok(())
    }
}

/// Parses a stardate.
///
/// # Examples
///
/// ```
/// use ::stardate::{stardate, IntermediateTime};
///
/// assert_eq!(stardate::decode("[0]0000"), Ok(IntermediateTime::STARDATE_EPOCH));
/// ```
pub fn decode(text: &str) -> Result<IntermediateTime, DecodeError> {
    StardateValue::parse(text)?.to_time()
}

/// Formats a timestamp as a stardate.
///
/// # Examples
///
/// ```
/// use ::stardate::stardate::{self, Precision};
/// use ::stardate::IntermediateTime;
///
/// assert_eq!(
///     stardate::encode(IntermediateTime::UNIX_EPOCH, Precision::default()),
///     "[-36]9350.00"
/// );
/// ```
pub fn encode(time: IntermediateTime, precision: Precision) -> String {
    StardateValue::from_time(time).display(precision).to_string()
}
