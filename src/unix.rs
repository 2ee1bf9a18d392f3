//! Unix time.
//!
//! Unix dates are written `U` (or `u`) followed by an optionally negative
//! number of seconds since 1970-01-01T00:00:00, in decimal or, with a `0x`
//! prefix, in hexadecimal: `U0`, `U1686832245`, `U-0x10`.

use core::num::IntErrorKind;

use crate::errors::{DecodeError, Field, DATE_OUT_OF_RANGE};
use crate::IntermediateTime;

/// The radix of an encoded Unix time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Radix {
    /// Plain decimal seconds, as in `U1686832245`.
    Decimal,
    /// Lowercase hexadecimal seconds with a `0x` prefix, as in `U0x648b0475`.
    Hexadecimal,
}

/// Parses a Unix date.
///
/// Text starting with `U` or `u` always matches; anything that does not
/// follow with a well-formed magnitude is an error.
///
/// # Examples
///
/// ```
/// use stardate::{unix, IntermediateTime};
///
/// assert_eq!(unix::decode("U0"), Ok(IntermediateTime::UNIX_EPOCH));
/// assert_eq!(unix::decode("U-0x10"), unix::decode("u-16"));
/// ```
pub fn decode(text: &str) -> Result<IntermediateTime, DecodeError> {
    let rest = text
        .strip_prefix(|c: char| c == 'U' || c == 'u')
        .ok_or(DecodeError::Unmatched)?;
    let (negative, rest) = match rest.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, rest),
    };
    let (radix, digits) = match rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        Some(digits) => (16, digits),
        None => (10, rest),
    };

    // `from_str_radix` would accept a leading sign.
    if !digits.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        return Err(DecodeError::OutOfRange(Field::UnixTime));
    }
    let magnitude = u64::from_str_radix(digits, radix).map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => DATE_OUT_OF_RANGE,
        _ => DecodeError::OutOfRange(Field::UnixTime),
    })?;

    let epoch = IntermediateTime::UNIX_EPOCH;
    let time = if negative {
        epoch.checked_sub(magnitude, 0)
    } else {
        epoch.checked_add(magnitude, 0)
    };

    time.ok_or(DATE_OUT_OF_RANGE)
}

/// Formats a timestamp as a Unix date, discarding the fraction of a second.
///
/// # Examples
///
/// ```
/// use stardate::unix::{self, Radix};
/// use stardate::IntermediateTime;
///
/// let t = IntermediateTime::from_unix_secs(-16).unwrap();
///
/// assert_eq!(unix::encode(t, Radix::Decimal), "U-16");
/// assert_eq!(unix::encode(t, Radix::Hexadecimal), "U-0x10");
/// ```
pub fn encode(time: IntermediateTime, radix: Radix) -> String {
    let secs = time.to_unix_secs();
    let sign = if secs < 0 { "-" } else { "" };
    let magnitude = secs.unsigned_abs();

    match radix {
        Radix::Decimal => format!("U{sign}{magnitude}"),
        Radix::Hexadecimal => format!("U{sign}0x{magnitude:x}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unix(secs: i64) -> IntermediateTime {
        IntermediateTime::from_unix_secs(secs).unwrap()
    }

    #[test]
    fn decode_decimal_and_hexadecimal() {
        assert_eq!(decode("U1686832245"), Ok(unix(1_686_832_245)));
        assert_eq!(decode("u5"), Ok(unix(5)));
        assert_eq!(decode("U007"), Ok(unix(7)));
        assert_eq!(decode("U255"), decode("U0xff"));
        assert_eq!(decode("U0X1F"), Ok(unix(31)));
        assert_eq!(decode("U-0x10"), Ok(unix(-16)));
        assert_eq!(decode("U-0"), Ok(IntermediateTime::UNIX_EPOCH));
    }

    #[test]
    fn decode_unmatched() {
        for text in ["", "0", "X5", "2023-06-15", "[0]0000"] {
            assert_eq!(decode(text), Err(DecodeError::Unmatched), "{text}");
        }
    }

    #[test]
    fn decode_malformed() {
        for text in ["U", "U-", "U+5", "U 5", "U0x", "U0xg", "U12a", "Ufoo", "U_1", "U--1", "U0x-1"] {
            assert_eq!(
                decode(text),
                Err(DecodeError::OutOfRange(Field::UnixTime)),
                "{text}"
            );
        }
    }

    #[test]
    fn decode_limits() {
        assert_eq!(decode("U-62135769600"), Ok(IntermediateTime::EPOCH));
        assert_eq!(
            decode("U18446744011573782015"),
            Ok(IntermediateTime::new(u64::MAX, 0))
        );
        for text in [
            "U-62135769601",
            "U18446744011573782016",
            "U18446744073709551616",
            "U0x10000000000000000",
        ] {
            assert_eq!(decode(text), Err(DATE_OUT_OF_RANGE), "{text}");
        }
    }

    #[test]
    fn encode_values() {
        assert_eq!(encode(unix(0), Radix::Decimal), "U0");
        assert_eq!(encode(unix(0), Radix::Hexadecimal), "U0x0");
        assert_eq!(encode(unix(1_686_832_245), Radix::Hexadecimal), "U0x648b0475");
        assert_eq!(encode(IntermediateTime::EPOCH, Radix::Decimal), "U-62135769600");
        assert_eq!(
            encode(IntermediateTime::EPOCH, Radix::Hexadecimal),
            "U-0xe77949a00"
        );
        assert_eq!(
            encode(IntermediateTime::new(u64::MAX, 0), Radix::Hexadecimal),
            "U0xfffffff1886b65ff"
        );
    }

    #[test]
    fn encode_truncates_towards_earlier_second() {
        let half = 1 << 31;

        let t = unix(10).checked_add(0, half).unwrap();
        assert_eq!(encode(t, Radix::Decimal), "U10");

        let t = unix(-1).checked_add(0, half).unwrap();
        assert_eq!(encode(t, Radix::Decimal), "U-1");
    }
}
