//! Exact conversions between stardates, the proleptic Julian and Gregorian
//! calendars, the Quadcent calendar and Unix time.
//!
//! # Overview
//!
//! Every date notation supported by this crate is converted to and from a
//! single internal timestamp, [`IntermediateTime`], so that any input format
//! can be printed in any output format. An [`IntermediateTime`] is a 64-bit
//! unsigned number of seconds counted from 0001=01=01 in the Julian calendar
//! (0000-12-30 in the proleptic Gregorian calendar) plus a 32-bit binary
//! fraction of a second.
//!
//! The supported notations are:
//!
//! - stardates such as `[19]7340.25`, `[-30]0458.96` or `[41]00000`, with the
//!   original series rate, the two film-era rates and the TNG rate
//!   (see [`stardate`]),
//! - Julian calendar dates such as `1969=12=19T00:00:00` (see [`calendar`]),
//! - Gregorian calendar dates such as `1970-01-01T00:00:00`,
//! - Quadcent calendar dates such as `1970*01*01T14:27:01` (see
//!   [`quadcent`]),
//! - Unix times such as `U0` or `U-0x10` (see [`unix`]).
//!
//! [`format::convert`] recognises the notation of a token and prints it in a
//! selection of output notations.
//!
//!
//! # Design choices and limitations
//!
//! No floating point is used anywhere: all rates are exact rationals and all
//! wide products are computed with 128-bit integers, so that conversions are
//! bit-exact and round-trip safe across the whole representable range.
//!
//! Time zones and leap seconds are not supported: calendar dates are treated
//! as UTC days of exactly 86400 seconds.
//!
//!
//! # Features flags
//!
//! ### Command-line tool
//!
//! The `stardate` binary is built with the `cli` feature, which is enabled by
//! default.
//!
//! ### Support for time-related crates
//!
//! Conversion from a `chrono::DateTime` is available with the `chrono`
//! feature.
//!
//! ### Serialization
//!
//! Value and error types can be (de)serialized with `serde` by activating the
//! `serde` feature.
//!
//!
//! # Examples
//!
//! ```
//! use stardate::format::{self, Encoder, OutputOptions, Selection};
//! use stardate::stardate::Precision;
//!
//! let options = OutputOptions {
//!     selection: Selection::new()
//!         .with(Encoder::Stardate)
//!         .with(Encoder::Gregorian),
//!     precision: Precision::default(),
//! };
//!
//! let conversion = format::convert("U0", &options).unwrap();
//! assert_eq!(conversion.to_string(), "[-36]9350.00 1970-01-01T00:00:00");
//! ```
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod calendar;
mod date_time;
mod errors;
pub mod format;
pub mod quadcent;
pub mod stardate;
pub mod unix;

pub use date_time::CalendarDate;
pub use errors::{ConvertError, DecodeError, Field};

/// Number of seconds in a day; there are no leap seconds.
pub(crate) const SECS_PER_DAY: u64 = 86_400;

/// Number of days in 400 Gregorian years.
pub(crate) const DAYS_PER_QUADCENT: u64 = 146_097;

/// A point in time counted from 0001=01=01T00:00:00 (Julian calendar).
///
/// The timestamp is a 64-bit number of seconds and a 32-bit binary fraction
/// of a second, so its resolution is 2^-32 s. Dates before the epoch cannot
/// be represented; the largest representable date lies some 584 billion years
/// in the future.
///
/// # Examples
///
/// ```
/// use stardate::IntermediateTime;
///
/// // 1970-01-01T00:00:00 plus half a second.
/// let t = IntermediateTime::UNIX_EPOCH
///     .checked_add(0, 1 << 31)
///     .unwrap();
///
/// assert_eq!(t.as_secs(), 62_135_769_600);
/// assert_eq!(t.subsec_fraction(), 1 << 31);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntermediateTime {
    /// The number of whole seconds since 0001=01=01T00:00:00.
    ///
    /// The automatic derivation of `PartialOrd` relies on lexicographical
    /// comparison so `secs` must appear before `frac`.
    secs: u64,
    /// The sub-second fraction, in units of 2^-32 s.
    frac: u32,
}

impl IntermediateTime {
    /// The internal epoch, 0001=01=01T00:00:00 (0000-12-30T00:00:00).
    pub const EPOCH: Self = Self { secs: 0, frac: 0 };

    /// The maximum representable time.
    pub const MAX: Self = Self {
        secs: u64::MAX,
        frac: u32::MAX,
    };

    /// The Unix epoch, 1970-01-01T00:00:00, 719164 days after the internal
    /// epoch.
    pub const UNIX_EPOCH: Self = Self::new(719_164 * SECS_PER_DAY, 0);

    /// The Quadcent epoch, 0323*01*01 (0323-01-01), 117609 days after the
    /// internal epoch.
    pub const QUADCENT_EPOCH: Self = Self::new(117_609 * SECS_PER_DAY, 0);

    /// The stardate epoch, 2162-01-04, 789294 days after the internal
    /// epoch. Stardate `[0]0000` falls on this instant.
    pub const STARDATE_EPOCH: Self = Self::new(789_294 * SECS_PER_DAY, 0);

    /// The epoch of TNG-style stardates, 2323-01-01, 848094 days after the
    /// internal epoch. Stardate `[21]00000` falls on this instant.
    pub const TNG_EPOCH: Self = Self::new(848_094 * SECS_PER_DAY, 0);

    /// Creates a timestamp from whole seconds since the internal epoch and a
    /// fraction of a second in units of 2^-32 s.
    pub const fn new(secs: u64, subsec_fraction: u32) -> Self {
        Self {
            secs,
            frac: subsec_fraction,
        }
    }

    /// Creates a timestamp from a signed number of seconds relative to the
    /// Unix epoch.
    ///
    /// Returns `None` if the date lies before the internal epoch.
    ///
    /// # Examples
    ///
    /// ```
    /// use stardate::IntermediateTime;
    ///
    /// assert_eq!(
    ///     IntermediateTime::from_unix_secs(0),
    ///     Some(IntermediateTime::UNIX_EPOCH)
    /// );
    /// assert_eq!(IntermediateTime::from_unix_secs(i64::MIN), None);
    /// ```
    pub const fn from_unix_secs(secs: i64) -> Option<Self> {
        let magnitude = secs.unsigned_abs();
        if secs < 0 {
            Self::UNIX_EPOCH.checked_sub(magnitude, 0)
        } else {
            Self::UNIX_EPOCH.checked_add(magnitude, 0)
        }
    }

    /// Creates a timestamp from a `chrono::DateTime`.
    ///
    /// Nanoseconds are rounded up to the next 2^-32 s so that truncating the
    /// fraction back to nanoseconds gives the original value.
    ///
    /// Returns `None` if the date lies before the internal epoch.
    ///
    /// # Examples
    ///
    /// ```
    /// use stardate::IntermediateTime;
    /// use chrono::DateTime;
    ///
    /// let date_time = DateTime::parse_from_rfc3339("1970-01-01T00:00:00.5Z").unwrap();
    /// assert_eq!(
    ///     IntermediateTime::from_chrono_date_time(&date_time),
    ///     IntermediateTime::UNIX_EPOCH.checked_add(0, 1 << 31)
    /// );
    /// ```
    #[cfg(feature = "chrono")]
    pub fn from_chrono_date_time<Tz: chrono::TimeZone>(
        date_time: &chrono::DateTime<Tz>,
    ) -> Option<Self> {
        const NANOS_PER_SEC: u64 = 1_000_000_000;

        let secs = date_time.timestamp();
        let nanos = u64::from(date_time.timestamp_subsec_nanos());

        // `chrono` represents a leap second as an extra second of nanoseconds.
        let (carry, nanos) = if nanos < NANOS_PER_SEC {
            (0, nanos)
        } else {
            (1, nanos - NANOS_PER_SEC)
        };
        let frac = ((nanos << 32) + NANOS_PER_SEC - 1) / NANOS_PER_SEC;

        Self::from_unix_secs(secs)?.checked_add(carry, frac as u32)
    }

    /// Returns the number of whole seconds since the internal epoch.
    ///
    /// # Examples
    ///
    /// ```
    /// use stardate::IntermediateTime;
    ///
    /// assert_eq!(IntermediateTime::new(123, 456).as_secs(), 123);
    /// ```
    pub const fn as_secs(&self) -> u64 {
        self.secs
    }

    /// Returns the sub-second fraction in units of 2^-32 s.
    pub const fn subsec_fraction(&self) -> u32 {
        self.frac
    }

    /// Returns the signed number of seconds relative to the Unix epoch,
    /// rounded towards the past.
    pub const fn to_unix_secs(&self) -> i128 {
        self.secs as i128 - Self::UNIX_EPOCH.secs as i128
    }

    /// Adds a number of seconds and a fraction of a second in units of
    /// 2^-32 s, checking for overflow.
    ///
    /// Returns `None` if the result cannot be represented.
    ///
    /// # Examples
    ///
    /// ```
    /// use stardate::IntermediateTime;
    ///
    /// let t = IntermediateTime::new(10, u32::MAX);
    /// assert_eq!(t.checked_add(1, 1), Some(IntermediateTime::new(12, 0)));
    /// assert_eq!(IntermediateTime::MAX.checked_add(0, 1), None);
    /// ```
    pub const fn checked_add(self, secs: u64, frac: u32) -> Option<Self> {
        let (frac, carry) = self.frac.overflowing_add(frac);
        let secs = match self.secs.checked_add(secs) {
            Some(s) => s,
            None => return None,
        };
        let secs = if carry {
            match secs.checked_add(1) {
                Some(s) => s,
                None => return None,
            }
        } else {
            secs
        };

        Some(Self { secs, frac })
    }

    /// Subtracts a number of seconds and a fraction of a second in units of
    /// 2^-32 s, checking for underflow.
    ///
    /// Returns `None` if the result would lie before the internal epoch.
    ///
    /// # Examples
    ///
    /// ```
    /// use stardate::IntermediateTime;
    ///
    /// let t = IntermediateTime::new(10, 0);
    /// assert_eq!(t.checked_sub(1, 1), Some(IntermediateTime::new(8, u32::MAX)));
    /// assert_eq!(t.checked_sub(10, 1), None);
    /// ```
    pub const fn checked_sub(self, secs: u64, frac: u32) -> Option<Self> {
        let (frac, borrow) = self.frac.overflowing_sub(frac);
        let secs = match self.secs.checked_sub(secs) {
            Some(s) => s,
            None => return None,
        };
        let secs = if borrow {
            match secs.checked_sub(1) {
                Some(s) => s,
                None => return None,
            }
        } else {
            secs
        };

        Some(Self { secs, frac })
    }

    /// Computes the time elapsed since an earlier timestamp, as whole seconds
    /// and a fraction of a second in units of 2^-32 s.
    ///
    /// Returns `None` if the argument lies in the future of `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// use stardate::IntermediateTime;
    ///
    /// let earlier = IntermediateTime::new(100, 3 << 30);
    /// let later = IntermediateTime::new(123, 1 << 30);
    /// assert_eq!(later.checked_since(earlier), Some((22, 1 << 31)));
    /// assert_eq!(earlier.checked_since(later), None);
    /// ```
    pub const fn checked_since(self, earlier: Self) -> Option<(u64, u32)> {
        match self.checked_sub(earlier.secs, earlier.frac) {
            Some(delta) => Some((delta.secs, delta.frac)),
            None => None,
        }
    }
}
