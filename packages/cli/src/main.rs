#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the MISLAND result pipeline.
//!
//! Normalizes saved analysis responses into chart data, computes summary
//! percentages, classifies raster pixel values, and submits analyses to a
//! live backend configured through `MISLAND_API_URL` and
//! `MISLAND_AUTH_TOKEN`.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use misland_indicator_models::AnalysisEndpoint;

#[derive(Parser)]
#[command(name = "misland", about = "MISLAND analysis result toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a saved analysis response into chart series
    Normalize {
        /// Analysis response JSON file
        input: PathBuf,
        /// Indicator JSON file (`{"name": ..., "colors": [...]}`) with the
        /// change-type legend
        #[arg(long)]
        legend: Option<PathBuf>,
        /// Indicator name when no legend file is given
        #[arg(long)]
        indicator: Option<String>,
    },
    /// Share of a value in a saved analysis response
    Summary {
        /// Analysis response JSON file
        input: PathBuf,
        /// Selected indicator
        #[arg(long)]
        indicator: Option<String>,
        /// Value to express as a share; looked up by label or change
        /// type when omitted
        #[arg(long, allow_negative_numbers = true)]
        value: Option<f64>,
        /// Row label to look up
        #[arg(long)]
        label: Option<String>,
        /// Change type to look up
        #[arg(long, allow_negative_numbers = true)]
        change_type: Option<String>,
    },
    /// Colors for raster pixel values
    Classify {
        /// Indicator whose rules apply
        #[arg(long)]
        indicator: String,
        /// JSON file with the `raster_colors` table
        #[arg(long)]
        colors: Option<PathBuf>,
        /// Raster no-data value
        #[arg(long, allow_negative_numbers = true)]
        no_data: Option<f64>,
        /// Pixel values
        #[arg(required = true, allow_negative_numbers = true)]
        pixels: Vec<f64>,
    },
    /// Run an analysis on the backend
    Submit {
        /// Analysis endpoint (e.g. `lulc`, `forestfire`)
        endpoint: AnalysisEndpoint,
        /// Request parameters as inline JSON
        #[arg(long, default_value = "{}")]
        payload: String,
        /// JSON file with the selected admin boundary
        #[arg(long, conflicts_with = "custom")]
        admin: Option<PathBuf>,
        /// JSON file with a user-drawn `GeoJSON` geometry
        #[arg(long)]
        custom: Option<PathBuf>,
        /// Indicator recorded with the result
        #[arg(long)]
        indicator: Option<String>,
    },
    /// Published years for a computation type
    Years {
        /// Computation type (e.g. `lulc`)
        computation_type: String,
        /// Consult the precomputed results catalog
        #[arg(long)]
        precomputed: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    match cli.command {
        Commands::Normalize {
            input,
            legend,
            indicator,
        } => commands::normalize(&input, legend.as_deref(), indicator.as_deref())?,
        Commands::Summary {
            input,
            indicator,
            value,
            label,
            change_type,
        } => commands::summary(
            &input,
            indicator.as_deref(),
            value,
            label.as_deref(),
            change_type.as_deref(),
        )?,
        Commands::Classify {
            indicator,
            colors,
            no_data,
            pixels,
        } => commands::classify(&indicator, colors.as_deref(), no_data, pixels)?,
        Commands::Submit {
            endpoint,
            payload,
            admin,
            custom,
            indicator,
        } => {
            commands::submit(
                endpoint,
                &payload,
                admin.as_deref(),
                custom.as_deref(),
                indicator.as_deref(),
            )
            .await?;
        }
        Commands::Years {
            computation_type,
            precomputed,
        } => commands::years(&computation_type, precomputed).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory as _;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn submit_parses_endpoint_names() {
        let cli = Cli::try_parse_from(["misland", "submit", "forestfirerisk", "--payload", "{}"])
            .unwrap();
        let Commands::Submit { endpoint, .. } = cli.command else {
            panic!("expected submit");
        };
        assert_eq!(endpoint, AnalysisEndpoint::ForestFireRisk);

        assert!(Cli::try_parse_from(["misland", "submit", "nosuchanalysis"]).is_err());
    }

    #[test]
    fn classify_accepts_negative_pixels() {
        let cli = Cli::try_parse_from([
            "misland",
            "classify",
            "--indicator",
            "forest_fire",
            "--no-data",
            "-32768",
            "-300",
            "150",
        ])
        .unwrap();
        let Commands::Classify { pixels, no_data, .. } = cli.command else {
            panic!("expected classify");
        };
        assert_eq!(pixels, vec![-300.0, 150.0]);
        assert_eq!(no_data, Some(-32768.0));
    }
}
