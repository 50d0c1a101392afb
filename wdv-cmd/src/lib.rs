//! Command implementations for the WDV CLI.
//!
//! Provides subcommands that run the time-series preparation pipeline over
//! local JSON/RDB files or data fetched live from the NWIS services.

use clap::Subcommand;
use serde::Serialize;

pub mod fetch;
pub mod local;

#[derive(Subcommand)]
pub enum Command {
    /// Normalize a time-series JSON document into keyed entity tables
    Normalize {
        /// Path to the WaterML JSON document
        #[arg(short = 'i', long)]
        input: String,

        /// Request key the document was fetched under
        #[arg(short = 'k', long, default_value = "current:P7D")]
        request_key: String,

        /// Write JSON here instead of stdout
        #[arg(short = 'o', long)]
        output: Option<String>,
    },

    /// Build line segments for every time series in a JSON document
    Segments {
        /// Path to the WaterML JSON document
        #[arg(short = 'i', long)]
        input: String,

        /// Request key the document was fetched under
        #[arg(short = 'k', long, default_value = "current:P7D")]
        request_key: String,

        /// Write JSON here instead of stdout
        #[arg(short = 'o', long)]
        output: Option<String>,
    },

    /// Project daily median statistics (RDB) onto a display window
    Medians {
        /// Path to the statistics RDB file
        #[arg(short = 'i', long)]
        input: String,

        /// Window length: P<N>D, P<N>Y, or custom
        #[arg(short = 'p', long, default_value = "P7D")]
        period: String,

        /// Window end, ISO-8601 timestamp or YYYY-MM-DD
        #[arg(short = 'e', long)]
        end: String,

        /// IANA time zone of the monitoring location
        #[arg(short = 'z', long, default_value = "America/Chicago")]
        time_zone: String,

        /// Write JSON here instead of stdout
        #[arg(short = 'o', long)]
        output: Option<String>,
    },

    /// Find the point of a time series nearest an instant
    Nearest {
        /// Path to the WaterML JSON document
        #[arg(short = 'i', long)]
        input: String,

        /// Request key the document was fetched under
        #[arg(short = 'k', long, default_value = "current:P7D")]
        request_key: String,

        /// Time series id, e.g. 69928:current:P7D
        #[arg(long)]
        time_series: String,

        /// Instant to look up, ISO-8601 timestamp or YYYY-MM-DD
        #[arg(short = 't', long)]
        time: String,

        /// IANA time zone used for bare dates
        #[arg(short = 'z', long, default_value = "America/Chicago")]
        time_zone: String,
    },

    /// Fetch recent values and medians for a site and prepare them for plotting
    Fetch {
        /// USGS site number
        #[arg(short = 's', long)]
        site: String,

        /// Parameter code, e.g. 00060 for discharge
        #[arg(short = 'c', long, default_value = "00060")]
        parameter_code: String,

        /// Period code for the current window
        #[arg(short = 'p', long, default_value = "P7D")]
        period: String,

        /// IANA time zone of the monitoring location
        #[arg(short = 'z', long, default_value = "America/Chicago")]
        time_zone: String,

        /// Write JSON here instead of stdout
        #[arg(short = 'o', long)]
        output: Option<String>,
    },
}

/// Serialize `value` as pretty JSON to `output`, or stdout when `None`.
pub(crate) fn write_json<T: Serialize>(value: &T, output: Option<&str>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            log::info!("Wrote {}", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Normalize {
            input,
            request_key,
            output,
        } => local::run_normalize(&input, &request_key, output.as_deref()),
        Command::Segments {
            input,
            request_key,
            output,
        } => local::run_segments(&input, &request_key, output.as_deref()),
        Command::Medians {
            input,
            period,
            end,
            time_zone,
            output,
        } => local::run_medians(&input, &period, &end, &time_zone, output.as_deref()),
        Command::Nearest {
            input,
            request_key,
            time_series,
            time,
            time_zone,
        } => local::run_nearest(&input, &request_key, &time_series, &time, &time_zone),
        Command::Fetch {
            site,
            parameter_code,
            period,
            time_zone,
            output,
        } => {
            fetch::run_fetch(&site, &parameter_code, &period, &time_zone, output.as_deref()).await
        }
    }
}
