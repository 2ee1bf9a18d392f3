//! Error types.

use core::fmt;

/// The field or quantity that failed validation while decoding a date.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Field {
    /// The integer part of a stardate exceeds the cap of its issue.
    Integer,
    /// The month is not between 1 and 12.
    Month,
    /// The day is 0 or more than the number of days in the month.
    Day,
    /// The hour is more than 23.
    Hour,
    /// The minute is more than 59.
    Minute,
    /// The second is more than 59.
    Second,
    /// The date is followed by something that is not a valid time of day.
    TimeOfDay,
    /// A Unix date has a malformed magnitude.
    UnixTime,
    /// The date cannot be represented, either because a number overflowed
    /// or because it lies before 0001=01=01.
    Date,
}

impl Field {
    /// Returns the short name of the field.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Month => "month",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
            Self::TimeOfDay => "time of day",
            Self::UnixTime => "unix time",
            Self::Date => "date",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => "integer part is out of range".fmt(fmt),
            Self::Month | Self::Day | Self::Hour | Self::Minute | Self::Second => {
                write!(fmt, "{} is out of range", self.name())
            }
            Self::TimeOfDay => "malformed time of day".fmt(fmt),
            Self::UnixTime => "malformed Unix date".fmt(fmt),
            Self::Date => "date is out of acceptable range".fmt(fmt),
        }
    }
}

/// The outcome of a single decoder that did not produce a time.
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecodeError {
    /// The text is not written in this format; the next decoder should be
    /// tried.
    #[error("text does not match this date format")]
    Unmatched,
    /// The text is written in this format but one of its fields is invalid.
    /// No other decoder should be tried.
    #[error("{0}")]
    OutOfRange(Field),
}

/// Shorthand for the most common range failure.
pub(crate) const DATE_OUT_OF_RANGE: DecodeError = DecodeError::OutOfRange(Field::Date);

/// The error returned when an input token could not be converted.
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ConvertError {
    /// No decoder recognised the token.
    #[error("date format unrecognised: {token}")]
    Unrecognised { token: String },
    /// A decoder recognised the token but rejected one of its fields.
    #[error("{field}: {token}")]
    OutOfRange { field: Field, token: String },
}

impl ConvertError {
    /// Returns the original token.
    pub fn token(&self) -> &str {
        match self {
            Self::Unrecognised { token } | Self::OutOfRange { token, .. } => token,
        }
    }

    /// Returns the offending field, if the token was recognised.
    pub fn field(&self) -> Option<Field> {
        match self {
            Self::Unrecognised { .. } => None,
            Self::OutOfRange { field, .. } => Some(*field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_messages() {
        assert_eq!(Field::Month.to_string(), "month is out of range");
        assert_eq!(Field::Integer.to_string(), "integer part is out of range");
        assert_eq!(Field::TimeOfDay.to_string(), "malformed time of day");
        assert_eq!(Field::Date.to_string(), "date is out of acceptable range");
    }

    #[test]
    fn convert_error_display() {
        let err = ConvertError::OutOfRange {
            field: Field::Day,
            token: "1900-02-29".into(),
        };
        assert_eq!(err.to_string(), "day is out of range: 1900-02-29");
        assert_eq!(err.field(), Some(Field::Day));
        assert_eq!(err.token(), "1900-02-29");

        let err = ConvertError::Unrecognised {
            token: "garbage".into(),
        };
        assert_eq!(err.to_string(), "date format unrecognised: garbage");
        assert_eq!(err.field(), None);
    }
}
