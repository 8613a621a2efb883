use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OpenFlags, OptionalExtension};

use crate::{prelude::*, quantity::KilowattHours};

/// One row of the long-term statistics table: a cumulative meter reading
/// and the start of the hour it was recorded for.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Observation {
    pub read_at: DateTime<Utc>,
    pub meter: KilowattHours,
}

/// Read-only view on the Home Assistant SQLite database.
pub struct StatisticsDb {
    connection: Connection,
}

impl StatisticsDb {
    #[instrument(skip_all, name = "Opening the database…", fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        let connection = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("failed to open the database at `{}`", path.display()))?;
        Ok(Self { connection })
    }

    /// Look up the numeric metadata id behind an entity id.
    ///
    /// An unknown entity id is an error: the statistics query would silently
    /// return nothing for it otherwise.
    pub fn resolve_metadata_id(&self, entity_id: &str) -> Result<i64> {
        self.connection
            .query_row(
                "SELECT id FROM statistics_meta WHERE statistic_id = ?1",
                [entity_id],
                |row| row.get(0),
            )
            .optional()
            .context("failed to query `statistics_meta`")?
            .with_context(|| format!("no statistics are recorded for `{entity_id}`"))
    }

    /// Cumulative meter readings for one sensor, in insertion order.
    ///
    /// The `state` column resets from time to time, hence `sum`. Rows
    /// without a sum (sensor unavailable) are skipped.
    #[instrument(skip_all, name = "Reading the meter history…", fields(metadata_id = metadata_id))]
    pub fn meter_readings(&self, metadata_id: i64) -> Result<Vec<Observation>> {
        let mut statement = self.connection.prepare(
            "SELECT start_ts, \"sum\" FROM statistics WHERE metadata_id = ?1 ORDER BY created_ts ASC",
        )?;
        let mut rows = statement.query([metadata_id])?;

        let mut readings = Vec::new();
        while let Some(row) = rows.next()? {
            let start_ts: f64 = row.get(0)?;
            let Some(meter) = row.get::<_, Option<f64>>(1)? else {
                continue;
            };
            #[allow(clippy::cast_possible_truncation)]
            let read_at = DateTime::from_timestamp(start_ts as i64, 0)
                .with_context(|| format!("reading timestamp {start_ts} is out of range"))?;
            readings.push(Observation { read_at, meter: KilowattHours(meter) });
        }
        ensure!(!readings.is_empty(), "no readings found for metadata id {metadata_id}");
        info!(n_readings = readings.len(), "Done");
        Ok(readings)
    }
}
