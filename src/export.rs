use std::{
    fs::{self, File},
    path::Path,
};

use chrono::NaiveDate;
use csv::WriterBuilder;
use serde::Serialize;

use crate::{
    prelude::*,
    statistics::{DailyProduction, PeriodProduction},
};

#[derive(Serialize)]
struct DailyRow {
    date: NaiveDate,
    kwh: f64,
}

#[derive(Serialize)]
struct PeriodRow {
    date: NaiveDate,
    kwh_sum: f64,
    kwh_mean: f64,
}

/// Write `day.csv`, `week.csv` and `month.csv` under the output directory,
/// creating it first if needed. Values are rounded to whole watt-hours.
#[instrument(skip_all, fields(directory = %directory.display()), name = "Exporting CSV files…")]
pub fn write_csv_reports(
    directory: &Path,
    daily: &[DailyProduction],
    weekly: &[PeriodProduction],
    monthly: &[PeriodProduction],
) -> Result {
    fs::create_dir_all(directory)
        .with_context(|| format!("failed to create `{}`", directory.display()))?;

    let mut writer = new_writer(&directory.join("day.csv"), &["date", "kWh"])?;
    for day in daily {
        writer.serialize(DailyRow { date: day.date, kwh: day.energy.round_to_watt_hours() })?;
    }
    writer.flush()?;

    write_period_csv(&directory.join("week.csv"), weekly)?;
    write_period_csv(&directory.join("month.csv"), monthly)?;
    Ok(())
}

/// The header goes out immediately: a series without rows still produces
/// a header-only file.
fn new_writer(path: &Path, header: &[&str]) -> Result<csv::Writer<File>> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("failed to create `{}`", path.display()))?;
    writer.write_record(header)?;
    Ok(writer)
}

fn write_period_csv(path: &Path, periods: &[PeriodProduction]) -> Result {
    let mut writer = new_writer(path, &["date", "kWh_sum", "kWh_mean"])?;
    for period in periods {
        writer.serialize(PeriodRow {
            date: period.starts_on,
            kwh_sum: period.total.round_to_watt_hours(),
            kwh_mean: period.per_day_mean.round_to_watt_hours(),
        })?;
    }
    Ok(writer.flush()?)
}
