use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::geometry::{DEFAULT_GEOJSON, DEFAULT_NAME_PROPERTY};
use crate::stat::DEFAULT_API_URL;
use crate::types::GenderSelection;

#[derive(Parser, Debug)]
#[command(name = "iive-map")]
#[command(version, about = "Natural increase in Estonian counties by year")]
pub struct Cli {
    /// Statistics service endpoint
    #[arg(long, env = "IIVE_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// County boundary GeoJSON file
    #[arg(long, env = "IIVE_GEOJSON", default_value = DEFAULT_GEOJSON, global = true)]
    pub geojson: PathBuf,

    /// Feature property holding the county name
    #[arg(long, default_value = DEFAULT_NAME_PROPERTY, global = true)]
    pub name_property: String,

    /// Write logs to this file instead of the default location
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive map and table (default)
    Dashboard,

    /// Print the table for one year
    Table {
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Write the joined view as a GeoJSON FeatureCollection
    Export {
        #[command(flatten)]
        view: ViewArgs,

        /// Output GeoJSON path
        output: PathBuf,
    },

    /// List years available from the statistics service
    Years,
}

#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    /// Statistics year
    #[arg(short, long)]
    pub year: i32,

    /// all, male or female
    #[arg(short, long, default_value = "all")]
    pub gender: GenderSelection,

    /// Only this county (canonical name, e.g. "Tartu")
    #[arg(short, long)]
    pub region: Option<String>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
