#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod charts;
mod cli;
mod db;
mod export;
mod prelude;
mod quantity;
mod series;
mod statistics;
mod tables;

use clap::{Parser, crate_version};
use tracing_subscriber::EnvFilter;

use crate::{
    charts::ReportCharts,
    cli::{Args, Command, GnomonArgs, GnomonCommand, ReportArgs, SourceArgs},
    db::StatisticsDb,
    prelude::*,
    quantity::{KilowattHours, WattHours},
    statistics::{
        DailyProduction,
        GoalDay,
        HourlyProduction,
        PeriodProduction,
        ProductionSummary,
        RecentHour,
    },
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .without_time()
        .compact()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Report(args) => report(&args),
        Command::Gnomon(args) => gnomon(&args),
    }
}

/// Read the meter history and turn it into hourly production.
///
/// The database connection only lives for the two queries and is closed
/// before any reshaping starts.
fn read_production(source: &SourceArgs) -> Result<Vec<HourlyProduction>> {
    let observations = {
        let db = StatisticsDb::open(&source.database)?;
        let metadata_id = match (&source.sensor.entity_id, source.sensor.metadata_id) {
            (Some(entity_id), _) => db.resolve_metadata_id(entity_id)?,
            (None, Some(metadata_id)) => metadata_id,
            (None, None) => bail!("either `--entity-id` or `--metadata-id` is required"),
        };
        db.meter_readings(metadata_id)?
    };
    Ok(HourlyProduction::derive(observations, source.time_zone))
}

fn report(args: &ReportArgs) -> Result {
    let hourly = read_production(&args.source)?;
    let daily = DailyProduction::aggregate(&hourly);
    let weekly = PeriodProduction::by_week(&daily)?;
    let monthly = PeriodProduction::by_month(&daily)?;
    let summary = ProductionSummary::new(&hourly, &daily, KilowattHours::from(args.own_use));
    info!(
        total = ?summary.total,
        max_hour = ?summary.max_hour,
        max_day = ?summary.max_day,
        used = ?summary.used,
        fed_in = ?summary.fed_in,
    );

    let goals: Vec<(WattHours, Vec<GoalDay>)> = args
        .goal_thresholds
        .iter()
        .map(|&threshold| (threshold, GoalDay::analyze(&hourly, threshold)))
        .collect();
    let recent = RecentHour::window(&hourly, args.recent_days);

    export::write_csv_reports(&args.output_directory, &daily, &weekly, &monthly)?;
    ReportCharts {
        hourly: &hourly,
        daily: &daily,
        weekly: &weekly,
        monthly: &monthly,
        goals: &goals,
        recent: &recent,
        recent_window: args.recent_days,
        summary,
    }
    .render_to(&args.output_directory)?;

    info!("Done");
    Ok(())
}

fn gnomon(args: &GnomonArgs) -> Result {
    let hourly = read_production(&args.source)?;
    let daily = DailyProduction::aggregate(&hourly);
    let table = match &args.command {
        GnomonCommand::Days => tables::build_days_table(&daily),
        GnomonCommand::Weeks => {
            tables::build_periods_table(&PeriodProduction::by_week(&daily)?, "Week", "%Y-%m-%d")
        }
        GnomonCommand::Months => {
            tables::build_periods_table(&PeriodProduction::by_month(&daily)?, "Month", "%Y-%m")
        }
        GnomonCommand::Goal(goal) => {
            tables::build_goal_table(&GoalDay::analyze(&hourly, goal.threshold))
        }
    };
    println!("{table}");
    Ok(())
}
