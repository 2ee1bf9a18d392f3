//! Recognition of date notations and conversion between them.
//!
//! A token is recognised by trying each decoder in turn in
//! [`Format::DECODE_ORDER`]. A decoder either does not recognise the token at
//! all, in which case the next one is tried, or recognises it and accepts or
//! rejects it, which settles the outcome. The resulting time is then printed
//! by every encoder of a [`Selection`], always in the order of [`FORMATS`].

use core::fmt;

use tracing::{debug, trace};

use crate::calendar::Calendar;
use crate::errors::{ConvertError, DecodeError};
use crate::stardate::Precision;
use crate::unix::Radix;
use crate::{quadcent, stardate, unix, IntermediateTime};

/// A date notation that can be decoded.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Format {
    /// Stardates, as in `[-30]0458.96`.
    Stardate,
    /// Julian calendar dates, as in `1969=12=19T00:00:00`.
    Julian,
    /// Gregorian calendar dates, as in `1970-01-01T00:00:00`.
    Gregorian,
    /// Quadcent calendar dates, as in `1970*01*01T14:27:01`.
    Quadcent,
    /// Unix times, as in `U0` or `U0x648b0475`.
    Unix,
}

impl Format {
    /// The order in which decoders are tried.
    pub const DECODE_ORDER: [Self; 5] = [
        Self::Stardate,
        Self::Julian,
        Self::Gregorian,
        Self::Quadcent,
        Self::Unix,
    ];

    /// Returns the name of the notation.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Stardate => "stardate",
            Self::Julian => "Julian",
            Self::Gregorian => "Gregorian",
            Self::Quadcent => "Quadcent",
            Self::Unix => "Unix",
        }
    }

    /// Decodes a token written in this notation.
    pub fn decode(self, text: &str) -> Result<IntermediateTime, DecodeError> {
        match self {
            Self::Stardate => stardate::decode(text),
            Self::Julian => Calendar::Julian.decode(text),
            Self::Gregorian => Calendar::Gregorian.decode(text),
            Self::Quadcent => quadcent::decode(text),
            Self::Unix => unix::decode(text),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name().fmt(fmt)
    }
}

/// An output notation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Encoder {
    /// Stardates, with a configurable number of fraction digits.
    Stardate,
    /// Julian calendar dates.
    Julian,
    /// Gregorian calendar dates.
    Gregorian,
    /// Quadcent calendar dates.
    Quadcent,
    /// Unix time in decimal, as in `U1686832245`.
    UnixDecimal,
    /// Unix time in hexadecimal, as in `U0x648b0475`.
    UnixHexadecimal,
}

impl Encoder {
    /// Formats a timestamp in this notation.
    ///
    /// The precision only applies to stardates.
    pub fn encode(self, time: IntermediateTime, precision: Precision) -> String {
        match self {
            Self::Stardate => stardate::encode(time, precision),
            Self::Julian => Calendar::Julian.encode(time),
            Self::Gregorian => Calendar::Gregorian.encode(time),
            Self::Quadcent => quadcent::encode(time),
            Self::UnixDecimal => unix::encode(time, Radix::Decimal),
            Self::UnixHexadecimal => unix::encode(time, Radix::Hexadecimal),
        }
    }

    /// Returns the position of the encoder in [`FORMATS`].
    const fn index(self) -> usize {
        match self {
            Self::Stardate => 0,
            Self::Julian => 1,
            Self::Gregorian => 2,
            Self::Quadcent => 3,
            Self::UnixDecimal => 4,
            Self::UnixHexadecimal => 5,
        }
    }
}

/// A row of the format table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FormatDescriptor {
    /// The single-letter option selecting the format for output.
    pub selector: char,
    /// The decoder for this notation, if it can be read back.
    pub decoder: Option<Format>,
    /// The encoder for this notation.
    pub encoder: Encoder,
}

/// The format table, in output order.
///
/// Hexadecimal Unix time shares its decoder with decimal Unix time, so it is
/// output-only.
pub const FORMATS: [FormatDescriptor; 6] = [
    FormatDescriptor {
        selector: 's',
        decoder: Some(Format::Stardate),
        encoder: Encoder::Stardate,
    },
    FormatDescriptor {
        selector: 'j',
        decoder: Some(Format::Julian),
        encoder: Encoder::Julian,
    },
    FormatDescriptor {
        selector: 'g',
        decoder: Some(Format::Gregorian),
        encoder: Encoder::Gregorian,
    },
    FormatDescriptor {
        selector: 'q',
        decoder: Some(Format::Quadcent),
        encoder: Encoder::Quadcent,
    },
    FormatDescriptor {
        selector: 'u',
        decoder: Some(Format::Unix),
        encoder: Encoder::UnixDecimal,
    },
    FormatDescriptor {
        selector: 'x',
        decoder: None,
        encoder: Encoder::UnixHexadecimal,
    },
];

/// Looks up a format by its selector letter.
///
/// # Examples
///
/// ```
/// use stardate::format::{self, Encoder};
///
/// assert_eq!(format::from_selector('x').map(|d| d.encoder), Some(Encoder::UnixHexadecimal));
/// assert_eq!(format::from_selector('z'), None);
/// ```
pub fn from_selector(selector: char) -> Option<FormatDescriptor> {
    FORMATS.into_iter().find(|d| d.selector == selector)
}

/// A set of output encoders.
///
/// Iteration always follows the order of [`FORMATS`], whatever the order in
/// which encoders were inserted.
///
/// # Examples
///
/// ```
/// use stardate::format::{Encoder, Selection};
///
/// let selection = Selection::new()
///     .with(Encoder::UnixDecimal)
///     .with(Encoder::Julian);
///
/// assert_eq!(
///     selection.iter().collect::<Vec<_>>(),
///     [Encoder::Julian, Encoder::UnixDecimal]
/// );
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Selection(u8);

impl Selection {
    /// Creates an empty selection.
    pub const fn new() -> Self {
        Self(0)
    }

    /// Returns the selection with an encoder added.
    pub const fn with(self, encoder: Encoder) -> Self {
        Self(self.0 | (1 << encoder.index()))
    }

    /// Adds an encoder.
    pub fn insert(&mut self, encoder: Encoder) {
        *self = self.with(encoder);
    }

    /// Checks whether an encoder is selected.
    pub const fn contains(self, encoder: Encoder) -> bool {
        self.0 & (1 << encoder.index()) != 0
    }

    /// Checks whether no encoder is selected.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns an iterator over the selected encoders in table order.
    pub fn iter(self) -> impl Iterator<Item = Encoder> {
        FORMATS
            .into_iter()
            .map(|d| d.encoder)
            .filter(move |&encoder| self.contains(encoder))
    }
}

impl FromIterator<Encoder> for Selection {
    fn from_iter<I: IntoIterator<Item = Encoder>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::with)
    }
}

impl Extend<Encoder> for Selection {
    fn extend<I: IntoIterator<Item = Encoder>>(&mut self, iter: I) {
        for encoder in iter {
            self.insert(encoder);
        }
    }
}

/// What to print for each converted token.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutputOptions {
    /// The output notations.
    pub selection: Selection,
    /// The number of stardate fraction digits.
    pub precision: Precision,
}

/// A decoded token together with its formatted outputs.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Conversion {
    /// The notation in which the token was written.
    pub format: Format,
    /// The decoded time.
    pub time: IntermediateTime,
    /// The time in each selected notation, in table order.
    pub outputs: Vec<String>,
}

impl fmt::Display for Conversion {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut outputs = self.outputs.iter();
        if let Some(first) = outputs.next() {
            fmt.write_str(first)?;
            for output in outputs {
                write!(fmt, " {output}")?;
            }
        }

        Ok(())
    }
}

/// Recognises the notation of a token and decodes it.
///
/// # Examples
///
/// ```
/// use stardate::format::{self, Format};
/// use stardate::{ConvertError, Field, IntermediateTime};
///
/// assert_eq!(
///     format::decode("1970-01-01"),
///     Ok((Format::Gregorian, IntermediateTime::UNIX_EPOCH))
/// );
/// assert_eq!(format::decode("2023-13-01").unwrap_err().field(), Some(Field::Month));
/// assert!(matches!(format::decode("garbage"), Err(ConvertError::Unrecognised { .. })));
/// ```
pub fn decode(token: &str) -> Result<(Format, IntermediateTime), ConvertError> {
    for format in Format::DECODE_ORDER {
        trace!(%format, token, "trying decoder");
        match format.decode(token) {
            Ok(time) => {
                debug!(%format, token, secs = time.as_secs(), "token decoded");
                return Ok((format, time));
            }
            Err(DecodeError::Unmatched) => {}
            Err(DecodeError::OutOfRange(field)) => {
                debug!(%format, token, field = field.name(), "token rejected");
                return Err(ConvertError::OutOfRange {
                    field,
                    token: token.to_owned(),
                });
            }
        }
    }

    debug!(token, "no decoder recognised the token");
    Err(ConvertError::Unrecognised {
        token: token.to_owned(),
    })
}

/// Formats a timestamp with every selected encoder, in table order.
pub fn encode(time: IntermediateTime, options: &OutputOptions) -> Vec<String> {
    options
        .selection
        .iter()
        .map(|encoder| encoder.encode(time, options.precision))
        .collect()
}

/// Decodes a token and formats it with every selected encoder.
pub fn convert(token: &str, options: &OutputOptions) -> Result<Conversion, ConvertError> {
    let (format, time) = decode(token)?;

    Ok(Conversion {
        format,
        time,
        outputs: encode(time, options),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Field;

    fn all() -> OutputOptions {
        OutputOptions {
            selection: FORMATS.iter().map(|d| d.encoder).collect(),
            precision: Precision::MAX,
        }
    }

    #[test]
    fn table_is_consistent() {
        for (idx, descriptor) in FORMATS.iter().enumerate() {
            assert_eq!(descriptor.encoder.index(), idx);
            assert_eq!(from_selector(descriptor.selector), Some(*descriptor));
        }
        let decoders: Vec<_> = FORMATS.iter().filter_map(|d| d.decoder).collect();
        assert_eq!(decoders, Format::DECODE_ORDER);
    }

    #[test]
    fn decode_recognises_each_format() {
        let cases = [
            ("[-36]9350", Format::Stardate),
            ("1969=12=19", Format::Julian),
            ("1970-01-01T00:00", Format::Gregorian),
            ("1970*01*01T14:27:02", Format::Quadcent),
            ("U0", Format::Unix),
            ("u0x0", Format::Unix),
        ];
        for (token, format) in cases {
            let (found, time) = decode(token).unwrap();
            assert_eq!(found, format, "{token}");
            // All of them fall within the first second of 1970.
            assert_eq!(
                time.as_secs(),
                IntermediateTime::UNIX_EPOCH.as_secs(),
                "{token}"
            );
        }
    }

    #[test]
    fn decode_errors() {
        let cases = [
            ("[19]10000", Field::Integer),
            ("[20]5006", Field::Integer),
            ("2023-13-01", Field::Month),
            ("1900-02-29", Field::Day),
            ("2023-06-15T25:00", Field::Hour),
            ("2023-06-15X", Field::TimeOfDay),
            ("Ufoo", Field::UnixTime),
            ("U0x", Field::UnixTime),
            ("U18446744073709551616", Field::Date),
        ];
        for (token, field) in cases {
            assert_eq!(
                decode(token),
                Err(ConvertError::OutOfRange {
                    field,
                    token: token.into()
                }),
                "{token}"
            );
        }
    }

    #[test]
    fn decode_unrecognised() {
        for token in ["garbage", "", "[19]7340x", "2023/06/15", "12345"] {
            assert_eq!(
                decode(token),
                Err(ConvertError::Unrecognised {
                    token: token.into()
                }),
                "{token}"
            );
        }
    }

    #[test]
    fn convert_to_every_format() {
        let conversion = convert("2023-06-15T12:30:45", &all()).unwrap();

        assert_eq!(conversion.format, Format::Gregorian);
        assert_eq!(
            conversion.outputs,
            [
                "[-26]6967.606770",
                "2023=06=02T12:30:45",
                "2023-06-15T12:30:45",
                "2023*06*16T03:51:46",
                "U1686832245",
                "U0x648b0475",
            ]
        );
    }

    #[test]
    fn outputs_follow_table_order() {
        let options = OutputOptions {
            selection: [Encoder::UnixHexadecimal, Encoder::Julian, Encoder::Stardate]
                .into_iter()
                .collect(),
            precision: Precision::default(),
        };
        let conversion = convert("U0", &options).unwrap();

        assert_eq!(
            conversion.to_string(),
            "[-36]9350.00 1969=12=19T00:00:00 U0x0"
        );
    }

    #[test]
    fn empty_selection_prints_nothing() {
        let conversion = convert("U0", &OutputOptions::default()).unwrap();

        assert!(conversion.outputs.is_empty());
        assert_eq!(conversion.to_string(), "");
    }

    #[test]
    fn selection_set_operations() {
        let mut selection = Selection::new();
        assert!(selection.is_empty());

        selection.insert(Encoder::Quadcent);
        selection.extend([Encoder::Gregorian, Encoder::Quadcent]);

        assert!(selection.contains(Encoder::Quadcent));
        assert!(selection.contains(Encoder::Gregorian));
        assert!(!selection.contains(Encoder::UnixDecimal));
        assert_eq!(selection.iter().count(), 2);
    }

    #[test]
    fn format_names() {
        assert_eq!(Format::Stardate.to_string(), "stardate");
        assert_eq!(Format::Quadcent.to_string(), "Quadcent");
    }
}
