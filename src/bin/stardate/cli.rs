use clap::Parser;

use stardate::format::{Encoder, OutputOptions, Selection};
use stardate::stardate::Precision;

/// Convert dates between stardates, the Julian, Gregorian and Quadcent
/// calendars and Unix time.
///
/// Each DATE is recognised from its notation: `[19]7340.25` (stardate),
/// `1969=12=19T00:00:00` (Julian), `1970-01-01T00:00:00` (Gregorian),
/// `1970*01*01T14:27:01` (Quadcent) or `U0`, `U0x648b0475` (Unix). Without
/// any DATE, the current time is converted.
///
/// Outputs are printed in the order stardate, Julian, Gregorian, Quadcent,
/// Unix, hexadecimal Unix, whatever the order of the options. Without any
/// output option, only the stardate is printed.
#[derive(Parser, Debug)]
#[command(name = "stardate", version, verbatim_doc_comment)]
pub struct Cli {
    /// Print the stardate.
    #[arg(short, long)]
    pub stardate: bool,

    /// Number of stardate fraction digits, from 0 to 6 (implies -s).
    #[arg(short, long, value_parser = parse_precision, value_name = "digits")]
    pub precision: Option<Precision>,

    /// Print the Julian date.
    #[arg(short, long)]
    pub julian: bool,

    /// Print the Gregorian date.
    #[arg(short, long)]
    pub gregorian: bool,

    /// Print the Quadcent date.
    #[arg(short, long)]
    pub quadcent: bool,

    /// Print the Unix time in decimal.
    #[arg(short, long)]
    pub unix: bool,

    /// Print the Unix time in hexadecimal.
    #[arg(short = 'x', long)]
    pub hex: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Dates to convert.
    #[arg(value_name = "DATE")]
    pub dates: Vec<String>,
}

impl Cli {
    /// Builds the output options from the selection flags.
    pub fn output_options(&self) -> OutputOptions {
        let flags = [
            (self.stardate || self.precision.is_some(), Encoder::Stardate),
            (self.julian, Encoder::Julian),
            (self.gregorian, Encoder::Gregorian),
            (self.quadcent, Encoder::Quadcent),
            (self.unix, Encoder::UnixDecimal),
            (self.hex, Encoder::UnixHexadecimal),
        ];
        let mut selection: Selection = flags
            .into_iter()
            .filter_map(|(set, encoder)| set.then_some(encoder))
            .collect();
        if selection.is_empty() {
            selection.insert(Encoder::Stardate);
        }

        OutputOptions {
            selection,
            precision: self.precision.unwrap_or_default(),
        }
    }
}

fn parse_precision(s: &str) -> Result<Precision, String> {
    s.parse::<u8>()
        .ok()
        .and_then(Precision::new)
        .ok_or_else(|| format!("expected a number of digits from 0 to 6, got '{s}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("stardate").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn stardate_only_by_default() {
        let cli = parse(&["2023-06-15"]);
        let options = cli.output_options();

        assert_eq!(options.selection, Selection::new().with(Encoder::Stardate));
        assert_eq!(options.precision, Precision::default());
        assert_eq!(cli.dates, ["2023-06-15"]);
    }

    #[test]
    fn selection_flags() {
        let options = parse(&["-x", "-j", "-u", "U0"]).output_options();

        assert_eq!(
            options.selection.iter().collect::<Vec<_>>(),
            [Encoder::Julian, Encoder::UnixDecimal, Encoder::UnixHexadecimal]
        );
    }

    #[test]
    fn combined_short_flags() {
        let options = parse(&["-sgq"]).output_options();

        assert_eq!(
            options.selection.iter().collect::<Vec<_>>(),
            [Encoder::Stardate, Encoder::Gregorian, Encoder::Quadcent]
        );
    }

    #[test]
    fn precision_implies_stardate() {
        let options = parse(&["-g", "-p", "6", "U0"]).output_options();

        assert!(options.selection.contains(Encoder::Stardate));
        assert!(options.selection.contains(Encoder::Gregorian));
        assert_eq!(options.precision, Precision::MAX);
    }

    #[test]
    fn precision_out_of_range() {
        assert!(Cli::try_parse_from(["stardate", "-p", "7"]).is_err());
        assert!(Cli::try_parse_from(["stardate", "-p", "x"]).is_err());
    }

    #[test]
    fn negative_stardates_are_dates() {
        let cli = parse(&["[-30]0458.96", "U-16"]);

        assert_eq!(cli.dates, ["[-30]0458.96", "U-16"]);
    }

    #[test]
    fn verbosity() {
        assert_eq!(parse(&[]).verbose, 0);
        assert_eq!(parse(&["-vv"]).verbose, 2);
    }
}
