use crate::engine::{Metric, Normalization, Selection};
use clap::Parser;
use std::path::PathBuf;

/// Proportional-symbol map of a daily outbreak dataset
#[derive(Debug, Parser)]
#[command(name = "outbreak-map", version, about)]
pub struct Cli {
    /// CSV export with one row per country and day (the demo dataset is used if missing)
    #[arg(long, env = "OUTBREAK_MAP_DATA", default_value = "data/covid.csv")]
    pub data: PathBuf,

    /// Directory holding Natural Earth coastline GeoJSON
    #[arg(long, env = "OUTBREAK_MAP_BASEMAP", default_value = "data")]
    pub basemap: PathBuf,

    /// confirmed_cases, deaths, recovered or active
    #[arg(long, default_value = "confirmed_cases")]
    pub metric: Metric,

    /// Plot the rate column (per million for cases, share of cases otherwise)
    #[arg(long)]
    pub per_capita: bool,

    /// Hide countries below 300K inhabitants
    #[arg(long)]
    pub exclude_small: bool,

    /// Day offset from the first comparable day; defaults to the last day
    #[arg(long)]
    pub day: Option<u32>,

    /// Print the selection to stdout instead of starting the map
    #[arg(long)]
    pub print: bool,

    /// Write logs here (interactive mode logs nowhere otherwise)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Initial selection; the day is limited to the valid offset range
    pub fn selection(&self, total_days: u32) -> Selection {
        Selection {
            metric: self.metric,
            normalization: if self.per_capita {
                Normalization::Rate
            } else {
                Normalization::Absolute
            },
            day_offset: self.day.unwrap_or(total_days).min(total_days),
            population_filter: self.exclude_small,
        }
    }
}
