use std::path::PathBuf;

use chrono_tz::Tz;
use clap::{Parser, Subcommand};

use crate::quantity::WattHours;

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: derive all reports and write the CSV and chart files.
    #[clap(name = "report")]
    Report(Box<ReportArgs>),

    /// Print production tables to the terminal without producing any files.
    #[clap(name = "gnomon")]
    Gnomon(Box<GnomonArgs>),
}

#[derive(Parser)]
pub struct ReportArgs {
    #[clap(flatten)]
    pub source: SourceArgs,

    /// Directory the CSV files and charts are written into.
    #[clap(long = "output-directory", default_value = "out", env = "OUTPUT_DIRECTORY")]
    pub output_directory: PathBuf,

    /// Watt-hour targets for the goal-reached reports.
    #[clap(
        long = "goal-watt-hours",
        env = "GOAL_WATT_HOURS",
        value_delimiter = ',',
        num_args = 1..,
        default_value = "50,100,200",
    )]
    pub goal_thresholds: Vec<WattHours>,

    /// Length of the small-multiples window in days.
    #[clap(long = "recent-days", default_value = "14", env = "RECENT_DAYS")]
    pub recent_days: u32,

    /// Hourly own-use capacity: production beyond it counts as fed into the
    /// grid.
    #[clap(long = "own-use-watt-hours", default_value = "150", env = "OWN_USE_WATT_HOURS")]
    pub own_use: WattHours,
}

#[derive(Parser)]
pub struct GnomonArgs {
    #[clap(flatten)]
    pub source: SourceArgs,

    #[command(subcommand)]
    pub command: GnomonCommand,
}

#[derive(Subcommand)]
pub enum GnomonCommand {
    /// Daily production.
    Days,

    /// Weekly production.
    Weeks,

    /// Monthly production.
    Months,

    /// Hours per day that reached the watt-hour target.
    Goal(GoalArgs),
}

#[derive(Parser)]
pub struct GoalArgs {
    /// Watt-hour target.
    #[clap(long = "watt-hours", default_value = "100")]
    pub threshold: WattHours,
}

#[derive(Parser)]
pub struct SourceArgs {
    /// Path to the Home Assistant SQLite database.
    #[clap(long = "database", default_value = "home-assistant_v2.db", env = "DATABASE_PATH")]
    pub database: PathBuf,

    #[clap(flatten)]
    pub sensor: SensorArgs,

    /// IANA time zone the reports are localized to.
    #[clap(long = "time-zone", default_value = "Europe/Berlin", env = "TIME_ZONE")]
    pub time_zone: Tz,
}

/// Exactly one way to identify the production sensor.
#[derive(Parser)]
#[group(required = true, multiple = false)]
pub struct SensorArgs {
    /// Entity id of the production sensor, for example
    /// `sensor.plug1_pv_energy`.
    #[clap(long = "entity-id", env = "SENSOR_ENTITY_ID")]
    pub entity_id: Option<String>,

    /// Numeric metadata id of the sensor in the statistics tables.
    #[clap(long = "metadata-id", env = "SENSOR_METADATA_ID")]
    pub metadata_id: Option<i64>,
}
