mod cli;
mod logging;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::{debug, info};

use stardate::calendar::Calendar;
use stardate::format::{self, OutputOptions};
use stardate::IntermediateTime;

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let options = cli.output_options();
    let tokens = if cli.dates.is_empty() {
        now().map(|now| vec![now])
    } else {
        Ok(cli.dates)
    };

    match tokens.and_then(|tokens| run(&tokens, &options)) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("stardate: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// The current time as a Gregorian date, truncated to the second.
fn now() -> Result<String> {
    let time = IntermediateTime::from_chrono_date_time(&chrono::Utc::now())
        .ok_or_else(|| anyhow!("system clock is set before 0001=01=01"))?;
    let now = Calendar::Gregorian.encode(time);
    debug!(%now, "no date given, converting the current time");

    Ok(now)
}

/// Converts every token, reporting failed tokens on stderr.
///
/// Returns whether all tokens were converted.
fn run(tokens: &[String], options: &OutputOptions) -> Result<bool> {
    let mut stdout = io::stdout().lock();
    let mut all_ok = true;

    for token in tokens {
        match format::convert(token, options) {
            Ok(conversion) => {
                info!(token = token.as_str(), format = %conversion.format, "converted");
                writeln!(stdout, "{conversion}").context("failed to write to stdout")?;
            }
            Err(e) => {
                eprintln!("stardate: {e}");
                all_ok = false;
            }
        }
    }
    stdout.flush().context("failed to write to stdout")?;

    Ok(all_ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stardate::format::Format;

    #[test]
    fn current_time_is_a_gregorian_token() {
        let now = now().unwrap();
        let (format, time) = format::decode(&now).unwrap();

        assert_eq!(format, Format::Gregorian);
        assert!(time > IntermediateTime::UNIX_EPOCH);
    }
}
